//! Cryptographic primitives for EduCrypt.
//!
//! Wraps RSA PKCS#1 v1.5 signing over SHA-256 and SHA-256 hashing with
//! strong types. Private keys travel as PKCS#1 PEM, public keys as SPKI PEM.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPrivateKey};
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;

use crate::error::CoreError;
use crate::types::ContentHash;

/// Default RSA modulus size in bits.
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Public exponent used for every generated key.
pub const PUBLIC_EXPONENT: u32 = 65_537;

/// SHA-256 over the UTF-8 bytes of `data`, as 64 lowercase hex characters.
pub fn hash_hex(data: &str) -> String {
    ContentHash::hash(data.as_bytes()).to_hex()
}

/// Encode raw signature bytes as standard (padded) base64.
pub fn encode_signature(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode a standard base64 signature.
pub fn decode_signature(encoded: &str) -> Result<Vec<u8>, CoreError> {
    STANDARD
        .decode(encoded.trim())
        .map_err(|e| CoreError::SignatureEncoding(e.to_string()))
}

/// The issuer's RSA private key.
///
/// Signing is RSASSA-PKCS1-v1_5 with a SHA-256 DigestInfo prefix, which is
/// deterministic: the same key and message always give the same signature.
#[derive(Clone)]
pub struct IssuerKey {
    private: RsaPrivateKey,
}

impl IssuerKey {
    /// Generate a fresh key from the operating system's entropy source.
    pub fn generate(bits: usize) -> Result<Self, CoreError> {
        Self::generate_with_rng(&mut OsRng, bits)
    }

    /// Generate a key from the supplied RNG.
    ///
    /// Seeded RNGs give reproducible keys, which tests rely on.
    pub fn generate_with_rng<R>(rng: &mut R, bits: usize) -> Result<Self, CoreError>
    where
        R: rand::CryptoRng + rand::RngCore,
    {
        let exp = BigUint::from(PUBLIC_EXPONENT);
        let private = RsaPrivateKey::new_with_exp(rng, bits, &exp)
            .map_err(|e| CoreError::KeyGeneration(e.to_string()))?;
        Ok(Self { private })
    }

    /// Parse a PKCS#1 (`BEGIN RSA PRIVATE KEY`) PEM document.
    pub fn from_pkcs1_pem(pem: &str) -> Result<Self, CoreError> {
        let private = RsaPrivateKey::from_pkcs1_pem(pem)
            .map_err(|e| CoreError::KeyDecoding(e.to_string()))?;
        private
            .validate()
            .map_err(|e| CoreError::KeyDecoding(e.to_string()))?;
        Ok(Self { private })
    }

    /// Encode as a PKCS#1 PEM document with LF line endings.
    pub fn to_pkcs1_pem(&self) -> Result<String, CoreError> {
        let pem = self
            .private
            .to_pkcs1_pem(LineEnding::LF)
            .map_err(|e| CoreError::KeyEncoding(e.to_string()))?;
        Ok(pem.to_string())
    }

    /// Get the public half.
    pub fn public_key(&self) -> IssuerPublicKey {
        IssuerPublicKey {
            inner: self.private.to_public_key(),
        }
    }

    /// Modulus size in bits.
    pub fn bits(&self) -> usize {
        self.private.size() * 8
    }

    /// Sign a message, returning the raw signature bytes.
    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>, CoreError> {
        let signing_key = SigningKey::<Sha256>::new(self.private.clone());
        let signature = signing_key
            .try_sign(message)
            .map_err(|e| CoreError::Signing(e.to_string()))?;
        Ok(signature.to_vec())
    }

    /// Sign a canonical string, returning the base64 signature.
    pub fn sign_base64(&self, canonical: &str) -> Result<String, CoreError> {
        self.sign(canonical.as_bytes()).map(|sig| encode_signature(&sig))
    }
}

impl fmt::Debug for IssuerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IssuerKey({:?})", self.public_key())
    }
}

/// The issuer's RSA public key, shareable with verifiers.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuerPublicKey {
    inner: RsaPublicKey,
}

impl IssuerPublicKey {
    /// Parse an SPKI (`BEGIN PUBLIC KEY`) PEM document.
    pub fn from_pem(pem: &str) -> Result<Self, CoreError> {
        let inner = RsaPublicKey::from_public_key_pem(pem)
            .map_err(|e| CoreError::KeyDecoding(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Encode as an SPKI PEM document with LF line endings.
    pub fn to_pem(&self) -> Result<String, CoreError> {
        self.inner
            .to_public_key_pem(LineEnding::LF)
            .map_err(|e| CoreError::KeyEncoding(e.to_string()))
    }

    /// Short fingerprint: first 16 hex chars of SHA-256 over the modulus.
    pub fn fingerprint(&self) -> String {
        let hash = ContentHash::hash(&self.inner.n().to_bytes_be());
        hash.to_hex()[..16].to_string()
    }

    /// Verify raw signature bytes over a message.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), CoreError> {
        let verifying_key = VerifyingKey::<Sha256>::new(self.inner.clone());
        let sig = Signature::try_from(signature).map_err(|_| CoreError::InvalidSignature)?;
        verifying_key
            .verify(message, &sig)
            .map_err(|_| CoreError::InvalidSignature)
    }

    /// Verify a base64 signature over a canonical string.
    pub fn verify_base64(&self, canonical: &str, signature_b64: &str) -> Result<(), CoreError> {
        let sig = decode_signature(signature_b64)?;
        self.verify(canonical.as_bytes(), &sig)
    }
}

impl fmt::Debug for IssuerPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IssuerPublicKey({})", self.fingerprint())
    }
}

/// Verify a base64 signature using only the issuer's public key PEM.
pub fn verify_signature(
    public_pem: &str,
    canonical: &str,
    signature_b64: &str,
) -> Result<(), CoreError> {
    IssuerPublicKey::from_pem(public_pem)?.verify_base64(canonical, signature_b64)
}

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use educrypt::store::SqliteStore;
use educrypt::{
    export_credential, export_snapshot, CredentialRecord, Issuer, IssuerConfig, ReadPolicy,
    RecoveryOutcome, SignedCredential,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// EduCrypt issuer: sign academic credentials and keep a local ledger.
#[derive(Parser, Debug)]
#[command(name = "educrypt", version)]
struct Cli {
    /// SQLite database holding the issuer key and both logs.
    #[arg(long, global = true, env = "EDUCRYPT_DB", default_value = "educrypt.db")]
    db: PathBuf,

    /// Fail on unreadable logs instead of listing them as empty.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign a credential and record it in both logs.
    Issue {
        #[arg(long)]
        name: String,
        #[arg(long)]
        degree: String,
        /// Graduation date, YYYY-MM-DD.
        #[arg(long)]
        graduation_date: String,
        #[arg(long)]
        issuer: String,
        /// Also write the credential to DIR/credential_<hash>.json.
        #[arg(long, value_name = "DIR")]
        export: Option<PathBuf>,
    },
    /// Print every issued credential as JSON.
    List,
    /// Print the snapshot hashes, one per line.
    Hashes,
    /// Print the issuer public key (PEM).
    PublicKey,
    /// Write the snapshot hashes to DIR/snapshot_<millis>.json.
    ExportSnapshot {
        dir: PathBuf,
    },
    /// Verify an exported credential file against this issuer's key.
    Verify {
        file: PathBuf,
    },
    /// Delete logs. Irreversible.
    Clear {
        #[arg(long)]
        credentials: bool,
        #[arg(long)]
        hashes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let store = SqliteStore::open(&cli.db)
        .with_context(|| format!("opening {}", cli.db.display()))?;
    let policy = if cli.strict { ReadPolicy::Strict } else { ReadPolicy::Lenient };
    let issuer = Issuer::new(Arc::new(store), IssuerConfig::default().with_read_policy(policy));

    match issuer.recover().await? {
        RecoveryOutcome::Clean => {}
        RecoveryOutcome::Completed(credential) => {
            info!(hash = %credential.hash, "finished an interrupted issuance")
        }
        RecoveryOutcome::Discarded => warn!("discarded an unreadable pending issuance"),
    }

    match cli.command {
        Commands::Issue {
            name,
            degree,
            graduation_date,
            issuer: institution,
            export,
        } => {
            let record = CredentialRecord::new(name, degree, graduation_date, institution);
            let credential = issuer.issue(record).await?;
            println!("{}", serde_json::to_string_pretty(&credential)?);
            if let Some(dir) = export {
                let path = export_credential(&dir, &credential)?;
                info!(path = %path.display(), "credential written");
            }
        }
        Commands::List => {
            let credentials = issuer.ledger().list_credentials().await?;
            println!("{}", serde_json::to_string_pretty(&credentials)?);
        }
        Commands::Hashes => {
            for hash in issuer.ledger().list_hashes().await? {
                println!("{hash}");
            }
        }
        Commands::PublicKey => {
            print!("{}", issuer.keys().get_public_key().await?);
        }
        Commands::ExportSnapshot { dir } => {
            let hashes = issuer.ledger().list_hashes().await?;
            let path = export_snapshot(&dir, &hashes)?;
            println!("{}", path.display());
        }
        Commands::Verify { file } => {
            let raw = fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let credential: SignedCredential = serde_json::from_str(&raw)
                .with_context(|| format!("parsing {}", file.display()))?;
            issuer.verify(&credential).await?;
            println!("valid: {}", credential.hash);
        }
        Commands::Clear { credentials, hashes } => {
            if !credentials && !hashes {
                anyhow::bail!("nothing to clear: pass --credentials and/or --hashes");
            }
            if credentials {
                issuer.ledger().clear_credentials().await?;
            }
            if hashes {
                issuer.ledger().clear_hashes().await?;
            }
        }
    }

    Ok(())
}

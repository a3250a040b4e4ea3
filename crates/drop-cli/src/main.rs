//! Codedrop CLI - drop a file, share the code, fetch it once

use anyhow::Context;
use clap::{Parser, Subcommand};
use drop_core::{format_file_size, format_remaining, DropConfig, DropService};
use drop_crypto::MasterKey;
use drop_store::{RestConfig, RestStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "codedrop")]
#[command(about = "Ephemeral file sharing: upload a file, share a 6-character code")]
#[command(version)]
struct Args {
    /// Base URL of the remote key-value store
    #[arg(long, env = "DROP_STORE_URL")]
    store_url: String,

    /// Top-level tree records live under
    #[arg(long, default_value = "files", env = "DROP_STORE_TREE")]
    tree: String,

    /// Auth token for the remote store
    #[arg(long, env = "DROP_STORE_TOKEN")]
    store_token: Option<String>,

    /// Master key passphrase for envelope encryption
    #[arg(long, env = "DROP_MASTER_KEY")]
    master_key: Option<String>,

    /// Store payloads without encryption
    #[arg(long)]
    plain: bool,

    /// Enable debug logging
    #[arg(short, long, env = "DROP_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a file and print its share code
    Upload {
        /// Path of the file to upload
        path: PathBuf,

        /// MIME type override (guessed from the extension otherwise)
        #[arg(long)]
        mime: Option<String>,
    },
    /// Retrieve a file by share code
    Retrieve {
        /// The 6-character share code
        code: String,

        /// Directory to write the file into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("codedrop={0},drop_core={0},drop_store={0}", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = build_config(&args)?;
    tracing::debug!(
        store = %args.store_url,
        tree = %args.tree,
        encrypted = config.encryption_enabled(),
        "connecting to remote store"
    );
    let store_config = match args.store_token {
        Some(ref token) => RestConfig::with_url(&args.store_url).with_auth_token(token),
        None => RestConfig::with_url(&args.store_url),
    };
    let store_config = RestConfig {
        tree: args.tree.clone(),
        ..store_config
    };
    let store = RestStore::new(store_config).context("failed to set up the remote store")?;
    let service = DropService::new(store, config);

    match args.command {
        Command::Upload { path, mime } => upload(&service, &path, mime).await,
        Command::Retrieve { code, output } => retrieve(&service, &code, &output).await,
    }
}

fn build_config(args: &Args) -> anyhow::Result<DropConfig> {
    if args.plain {
        return Ok(DropConfig::new());
    }
    // Encryption is the default; a missing master key is fatal at startup
    let passphrase = args.master_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!("DROP_MASTER_KEY is not set; pass --plain to store without encryption")
    })?;
    let master_key = MasterKey::from_passphrase(passphrase).context("invalid master key")?;
    Ok(DropConfig::new().with_master_key(master_key))
}

async fn upload(
    service: &DropService<RestStore>,
    path: &Path,
    mime: Option<String>,
) -> anyhow::Result<()> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("file")
        .to_string();
    let mime_type = mime.unwrap_or_else(|| {
        mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    });

    let receipt = service.upload(&bytes, &file_name, &mime_type).await?;

    let expires = chrono::DateTime::from_timestamp_millis(receipt.expires_at)
        .map(|t| t.format("%b %e, %H:%M UTC").to_string())
        .unwrap_or_else(|| receipt.expires_at.to_string());

    println!(
        "Uploaded {} ({}) as {}",
        file_name,
        format_file_size(bytes.len() as u64),
        mime_type
    );
    println!("Share code: {}", receipt.code);
    println!(
        "Expires at: {} ({} from now, one retrieval only)",
        expires,
        format_remaining(receipt.expires_at - receipt.uploaded_at)
    );
    Ok(())
}

async fn retrieve(
    service: &DropService<RestStore>,
    code: &str,
    output: &Path,
) -> anyhow::Result<()> {
    let file = service.retrieve(code).await?;

    let name = if file.file_name.is_empty() {
        "downloaded-file".to_string()
    } else {
        file.file_name.clone()
    };
    let target = output.join(&name);
    tokio::fs::write(&target, &file.bytes)
        .await
        .with_context(|| format!("failed to write {}", target.display()))?;

    println!(
        "Retrieved {} ({}, {})",
        target.display(),
        format_file_size(file.bytes.len() as u64),
        file.mime_type
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    // Built directly so the tests never depend on ambient environment
    // variables clap would otherwise read through `env = ...`
    fn args(master_key: Option<&str>, plain: bool) -> Args {
        Args {
            store_url: "http://localhost:9000".to_string(),
            tree: "files".to_string(),
            store_token: None,
            master_key: master_key.map(str::to_string),
            plain,
            debug: false,
            command: Command::Upload {
                path: PathBuf::from("file.txt"),
                mime: None,
            },
        }
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_plain_flag_skips_master_key() {
        let config = build_config(&args(None, true)).unwrap();
        assert!(!config.encryption_enabled());
    }

    #[test]
    fn test_missing_master_key_is_fatal() {
        assert!(build_config(&args(None, false)).is_err());
    }

    #[test]
    fn test_master_key_enables_encryption() {
        let config = build_config(&args(Some("hunter2"), false)).unwrap();
        assert!(config.encryption_enabled());
    }
}

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

use snapads::credentials::{CredentialStore, TokenSource};
use snapads::{split_file, AuthenticatedClient, ClientConfig, MediaKind};

/// Snapchat Marketing API media uploader
#[derive(Parser)]
#[command(name = "snapads")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding credentials.json. Defaults to ~/.snapads
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a large file in parts
    UploadLarge {
        /// File to upload
        file: PathBuf,

        /// Media object that receives the content
        #[arg(long)]
        media_id: String,

        /// Name of the assembled file; defaults to the local file name
        #[arg(long)]
        name: Option<String>,

        /// Part size in bytes; defaults to the configured maximum
        #[arg(long)]
        chunk_size: Option<u64>,
    },
    /// Upload a small file in one request
    Upload {
        /// File to upload
        file: PathBuf,

        /// Media object that receives the content
        #[arg(long)]
        media_id: String,

        /// Apply the image size limit
        #[arg(long)]
        image: bool,
    },
    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store an access token
    Set { token: String },
    /// Remove the stored access token
    Clear,
    /// Show where the access token comes from
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = CredentialStore::new(cli.config_dir)?;

    match cli.command {
        Commands::UploadLarge {
            file,
            media_id,
            name,
            chunk_size,
        } => run_upload_large(&store, file, media_id, name, chunk_size).await,
        Commands::Upload {
            file,
            media_id,
            image,
        } => run_upload(&store, file, media_id, image).await,
        Commands::Token { action } => run_token(&store, action),
    }
}

fn authenticated_client(store: &CredentialStore) -> Result<AuthenticatedClient> {
    let config = ClientConfig::from_env()?;
    let Some((token, _)) = store.access_token()? else {
        bail!("No access token. Run 'snapads token set <token>' or set SNAPADS_ACCESS_TOKEN.");
    };
    AuthenticatedClient::new(config, token).context("Failed to build HTTP client")
}

async fn run_upload_large(
    store: &CredentialStore,
    file: PathBuf,
    media_id: String,
    name: Option<String>,
    chunk_size: Option<u64>,
) -> Result<()> {
    let client = authenticated_client(store)?;
    let chunk_size = chunk_size.unwrap_or(client.inner().config().max_chunk_size);
    let name = match name {
        Some(name) => name,
        None => file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .context("Cannot derive a file name; pass --name")?,
    };

    let chunks = split_file(&file, chunk_size)
        .await
        .with_context(|| format!("Failed to split {}", file.display()))?;

    let uploaded = client
        .upload_large_media(&media_id, &name, &chunks)
        .await
        .with_context(|| format!("Failed to upload {}", file.display()))?;

    println!("✅ Uploaded {} as media {}", file.display(), uploaded);
    Ok(())
}

async fn run_upload(
    store: &CredentialStore,
    file: PathBuf,
    media_id: String,
    image: bool,
) -> Result<()> {
    let client = authenticated_client(store)?;
    let kind = if image {
        MediaKind::Image
    } else {
        MediaKind::Video
    };

    let uploaded = client
        .upload_media(&media_id, &file, kind)
        .await
        .with_context(|| format!("Failed to upload {}", file.display()))?;

    println!("✅ Uploaded {} as media {}", file.display(), uploaded);
    Ok(())
}

fn run_token(store: &CredentialStore, action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Set { token } => {
            if token.trim().is_empty() {
                bail!("The access token must not be empty");
            }
            store.save(token.trim())?;
            println!("✅ Access token stored in {}", store.credentials_path().display());
        }
        TokenAction::Clear => {
            store.clear()?;
            println!("✅ Access token removed.");
        }
        TokenAction::Status => match store.access_token()? {
            Some((_, TokenSource::Environment)) => {
                println!("✅ Using access token from SNAPADS_ACCESS_TOKEN");
            }
            Some((_, TokenSource::File)) => {
                println!(
                    "✅ Using access token from {}",
                    store.credentials_path().display()
                );
            }
            None => {
                println!("❌ No access token configured");
                println!("   Run 'snapads token set <token>' to store one.");
            }
        },
    }
    Ok(())
}

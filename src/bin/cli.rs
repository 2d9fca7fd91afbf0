//! IndexNow CLI
//!
//! Submits changed URLs from the command line and manages the key file
//! that proves host ownership.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use indexnow::{
    error::Result,
    keystore::{FsKeyStore, KeyStore},
    models::{KeyFileOptions, SubmitOptions, INDEXNOW_ENDPOINT, MAX_BATCH_SIZE},
};

/// IndexNow submission client
#[derive(Parser, Debug)]
#[command(name = "indexnow", version, about = "Submit changed URLs to IndexNow")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print the result as JSON on stdout
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Submit one or more URLs (all sharing one host)
    Submit {
        /// URLs to submit
        #[arg(required = true)]
        urls: Vec<String>,

        /// Host to submit for (default: derived from the first URL)
        #[arg(long)]
        host: Option<String>,

        /// IndexNow key (default: taken from the key manifest)
        #[arg(long)]
        key: Option<String>,

        /// Full URL of the key file, when it is not served from /{key}.txt
        #[arg(long)]
        key_location: Option<String>,

        /// Endpoint to POST to
        #[arg(long, default_value = INDEXNOW_ENDPOINT)]
        endpoint: String,

        /// Maximum URLs per request
        #[arg(long, default_value_t = MAX_BATCH_SIZE)]
        batch_size: usize,

        /// Retries per batch after the initial attempt
        #[arg(long, default_value_t = 2)]
        retries: u32,

        /// Base backoff delay in milliseconds
        #[arg(long, default_value_t = 500)]
        retry_base_ms: u64,

        /// Skip creating or restoring the key file on disk
        #[arg(long)]
        no_key_file: bool,

        #[command(flatten)]
        key_file: KeyFileArgs,
    },

    /// Provision the key and its public key file without submitting
    Key {
        /// Store this key instead of generating one
        #[arg(long)]
        key: Option<String>,

        /// Replace the stored key even if one already exists
        #[arg(long)]
        rotate: bool,

        #[command(flatten)]
        key_file: KeyFileArgs,
    },
}

/// Where the key manifest and the public key file live.
#[derive(Args, Debug)]
struct KeyFileArgs {
    /// Directory served as the site root; receives {key}.txt
    #[arg(long, default_value = "public")]
    public_dir: PathBuf,

    /// Project root (default: auto-detected)
    #[arg(long)]
    project_root: Option<PathBuf>,

    /// Manifest path (default: {project_root}/indexnow.manifest.json)
    #[arg(long)]
    manifest: Option<PathBuf>,
}

impl KeyFileArgs {
    fn into_options(self, force_rotate_key: bool) -> KeyFileOptions {
        KeyFileOptions {
            public_dir: self.public_dir,
            project_root: self.project_root,
            manifest_path: self.manifest,
            force_rotate_key,
        }
    }
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Submit {
            urls,
            host,
            key,
            key_location,
            endpoint,
            batch_size,
            retries,
            retry_base_ms,
            no_key_file,
            key_file,
        } => {
            let options = SubmitOptions {
                urls: urls.into(),
                host,
                key,
                key_location,
                endpoint,
                batch_size,
                retries,
                retry_base_ms,
                ensure_key_file: !no_key_file,
                key_file: key_file.into_options(false),
            };

            let outcome = indexnow::submit(&options).await?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                if let Some(path) = &outcome.key_file_path {
                    log::info!("Key file: {}", path.display());
                }
                for (index, batch) in outcome.batches.iter().enumerate() {
                    if batch.ok {
                        log::info!(
                            "Batch {}/{}: {} URLs accepted (status {})",
                            index + 1,
                            outcome.batches.len(),
                            batch.sent_count,
                            batch.status
                        );
                    } else {
                        log::error!(
                            "Batch {}/{}: rejected with status {}: {}",
                            index + 1,
                            outcome.batches.len(),
                            batch.status,
                            batch.body
                        );
                    }
                }
                log::info!(
                    "Submitted {} URLs for {} with key {}",
                    outcome.total,
                    outcome.host,
                    outcome.key_used
                );
            }

            if !outcome.all_ok() {
                std::process::exit(1);
            }
        }

        Command::Key { key, rotate, key_file } => {
            let store = FsKeyStore::new();
            let provisioned = store.provision(key.as_deref(), &key_file.into_options(rotate))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&provisioned)?);
            } else {
                log::info!("Key: {}", provisioned.key);
                log::info!("Key file: {}", provisioned.key_file_path.display());
                log::info!("Serve it at: {}", provisioned.key_file_route);
            }
        }
    }

    Ok(())
}

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hub_core::config::{content_dir_from_env_value, upload_dir_from_env_value};
use hub_core::mime::mime_for_name;
use hub_core::{ContentService, CoreConfig, IncomingFile};

#[derive(Parser)]
#[command(name = "hub")]
#[command(about = "Learning Hub content tree CLI")]
struct Cli {
    /// Content root (default: $CONTENT_DIR or ./content)
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,
    /// Scratch directory for uploads (default: $UPLOAD_TMP_DIR or the system temp dir)
    #[arg(long, global = true)]
    upload_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List one folder
    List {
        /// Virtual path (default: /)
        path: Option<String>,
    },
    /// List every file below the subject folders
    Catalogue,
    /// Create a folder
    Mkdir {
        /// Parent folder virtual path
        parent: String,
        name: String,
    },
    /// Rename a folder in place
    RenameFolder { path: String, new_name: String },
    /// Delete an empty folder
    Rmdir { path: String },
    /// Copy a local PDF or MP4 into a folder
    Upload {
        /// Destination folder virtual path
        dest: String,
        local_file: PathBuf,
    },
    /// Rename a file in place
    RenameFile { path: String, new_name: String },
    /// Delete a file
    Rm { path: String },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use 'hub --help' for commands");
        return Ok(());
    };

    let content_dir = cli
        .content_dir
        .unwrap_or_else(|| content_dir_from_env_value(std::env::var("CONTENT_DIR").ok()));
    let upload_dir = cli
        .upload_dir
        .unwrap_or_else(|| upload_dir_from_env_value(std::env::var("UPLOAD_TMP_DIR").ok()));
    let cfg = CoreConfig::new(content_dir, upload_dir).context("invalid content directory")?;
    let service = ContentService::new(Arc::new(cfg));

    match command {
        Commands::List { path } => {
            let listing = service.list_nodes(path).await?;
            for dir in listing.dirs {
                println!("{}/", dir.path);
            }
            for file in listing.files {
                println!(
                    "{}\t{}\t{}",
                    file.path,
                    file.size,
                    file.mime.as_deref().unwrap_or("-")
                );
            }
        }
        Commands::Catalogue => {
            for module in service.catalogue().await? {
                println!("{}\t{}\t{}", module.breadcrumbs, module.rel, module.size);
            }
        }
        Commands::Mkdir { parent, name } => {
            let node = service.create_folder(Some(parent), Some(name)).await?;
            println!("Created {}", node.path);
        }
        Commands::RenameFolder { path, new_name } => {
            let node = service.rename_folder(Some(path), Some(new_name)).await?;
            println!("Renamed to {}", node.path);
        }
        Commands::Rmdir { path } => {
            service.delete_folder(Some(path.clone())).await?;
            println!("Deleted {path}");
        }
        Commands::Upload { dest, local_file } => {
            let incoming = stage_local_file(&local_file, service.scratch_dir())?;
            let node = service.upload_file(Some(dest), Some(incoming)).await?;
            println!("Uploaded {}", node.path);
        }
        Commands::RenameFile { path, new_name } => {
            let node = service.rename_file(Some(path), Some(new_name)).await?;
            println!("Renamed to {}", node.path);
        }
        Commands::Rm { path } => {
            service.delete_file(Some(path.clone())).await?;
            println!("Deleted {path}");
        }
    }

    Ok(())
}

/// Copies `local` into the scratch directory so the upload never consumes the original.
fn stage_local_file(local: &Path, scratch_dir: &Path) -> anyhow::Result<IncomingFile> {
    let original_name = local
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("{} has no usable file name", local.display()))?
        .to_owned();
    let temp_location = scratch_dir.join(hub_files::scratch_file_name(&original_name));
    let byte_size = std::fs::copy(local, &temp_location)
        .with_context(|| format!("failed to read {}", local.display()))?;

    Ok(IncomingFile {
        mime_hint: mime_for_name(&original_name).map(str::to_owned),
        original_name,
        temp_location,
        byte_size,
    })
}

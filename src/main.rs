//! CLI entry point for inkpost

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "inkpost")]
#[command(version)]
#[command(about = "A small static site generator for markdown blogs", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// File name for the new post (defaults to the slugified title)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Build the site into the output directory
    #[command(alias = "b")]
    Build {
        /// Also build documents marked `draft: true`
        #[arg(long)]
        drafts: bool,
    },

    /// Remove the output directory
    Clean,

    /// List site content
    List {
        /// Type of content to list (posts, all, tags)
        #[arg(default_value = "posts")]
        r#type: String,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "inkpost=debug,info"
    } else {
        "inkpost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            inkpost::commands::init::init_site(&target_dir)?;
            println!("Initialized empty site in {:?}", target_dir);
        }

        Commands::New { title, path } => {
            let site = inkpost::Site::new(&base_dir)?;
            let file = inkpost::commands::new::create_post(&site, &title, path.as_deref())?;
            println!("Created: {:?}", file);
        }

        Commands::Build { drafts } => {
            let site = inkpost::Site::new(&base_dir)?;
            tracing::info!("Building site...");
            let report = inkpost::commands::build::run(&site, drafts)?;
            println!(
                "Built {} pages from {} documents ({} files copied)",
                report.pages_written, report.documents, report.files_copied
            );
        }

        Commands::Clean => {
            let site = inkpost::Site::new(&base_dir)?;
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = inkpost::Site::new(&base_dir)?;
            inkpost::commands::list::run(&site, &r#type)?;
        }

        Commands::Version => {
            println!("inkpost version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

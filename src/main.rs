//! CLI entry point for glug

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glug::content::Backend;
use glug::Glug;

#[derive(Parser)]
#[command(name = "glug")]
#[command(version)]
#[command(about = "A flat-file blog and wiki engine", long_about = None)]
struct Cli {
    /// Repository root holding pages/, posts/, styles/ and templates/
    #[arg(short, long, global = true, env = "GLUG_REPO", default_value = "repo")]
    repo: PathBuf,

    /// Treat the repository root as a git repository and serve its working tree
    #[arg(short, long, global = true)]
    git: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new repository root
    Init {
        /// Directory to initialize (defaults to --repo)
        folder: Option<PathBuf>,
    },

    /// Create a new post or page
    New {
        /// Layout to use (post, page)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new entry
        title: String,

        /// File name to use instead of the slugified title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Serve the repository over HTTP
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4567")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List repository content
    List {
        /// Type of content to list (page, post, style, entries, recent)
        #[arg(default_value = "post")]
        r#type: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "glug=debug,info"
    } else {
        "glug=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let backend = if cli.git {
        Backend::Git
    } else {
        Backend::Directory
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = folder.unwrap_or(cli.repo);
            tracing::info!("Initializing repository in {:?}", target_dir);
            glug::commands::init::init_site(&target_dir, cli.git)?;
            println!("Initialized repository in {:?}", target_dir);
        }

        Commands::New {
            layout,
            title,
            slug,
        } => {
            let glug = Glug::open(&cli.repo, backend)?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            let path = glug::commands::new::create_entry(
                &glug.repository,
                &title,
                &layout,
                slug.as_deref(),
            )?;
            println!("Created: {:?}", path);
        }

        Commands::Server { port, ip } => {
            // Fully built before the listener exists; shared read-only after
            let glug = Glug::open(&cli.repo, backend)?;
            glug::server::start(glug, &ip, port).await?;
        }

        Commands::List { r#type, json } => {
            let glug = Glug::open(&cli.repo, backend)?;
            glug::commands::list::run(&glug, &r#type, json)?;
        }

        Commands::Version => {
            println!("glug version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

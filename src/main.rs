// ghcard command-line driver.
// Renders card tags and post-processes generated sites.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use ghcard::cache::DiskCache;
use ghcard::config::{self, CardConfig};
use ghcard::inject::{CARD_CSS, inject_output_dir};
use ghcard::{CardRenderer, Result};

#[derive(Parser, Debug)]
#[command(name = "ghcard")]
#[command(about = "Render GitHub user and repository cards for static sites")]
struct Cli {
    /// Configuration file (defaults to ./ghcard.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render card tags to stdout
    Render {
        /// Site root; the response cache lives under it
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Read one tag per line from this file (`-` for stdin) and render
        /// them all through one cache
        #[arg(long, conflicts_with = "args")]
        batch: Option<PathBuf>,

        /// Tag arguments, e.g. `user:octocat repo:hello-world width:400`
        #[arg(required_unless_present = "batch")]
        args: Vec<String>,
    },
    /// Inline the card stylesheet into generated pages
    Inject {
        /// Output directory of the generated site
        dir: PathBuf,
    },
    /// Delete the on-disk response cache
    ClearCache {
        /// Site root
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "ghcard failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.unwrap_or_else(config::default_config_path);
    let config = CardConfig::load(&config_path)?;

    match cli.command {
        Command::Render { root, batch, args } => {
            let renderer = CardRenderer::from_config(&config, &root)?;
            match batch {
                Some(path) => {
                    let text = if path.as_os_str() == "-" {
                        io::read_to_string(io::stdin())?
                    } else {
                        fs::read_to_string(&path)?
                    };
                    for fragment in renderer.render_batch(text.lines()).await {
                        println!("{}", fragment);
                    }
                }
                None => println!("{}", renderer.render(args.as_slice()).await),
            }
        }
        Command::Inject { dir } => {
            if !config.inject_css {
                tracing::info!("stylesheet injection disabled by configuration");
                return Ok(());
            }
            let count = inject_output_dir(&dir, CARD_CSS)?;
            tracing::info!(count, dir = %dir.display(), "injected card stylesheet");
        }
        Command::ClearCache { root } => {
            let disk = DiskCache::for_root(&root);
            disk.purge()?;
            tracing::info!(dir = %disk.dir().display(), "cleared response cache");
        }
    }

    Ok(())
}

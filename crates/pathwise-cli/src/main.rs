mod config;
mod generate_cmd;
mod serve_cmd;
mod verify_cmd;

#[cfg(test)]
mod test_util;

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use pathwise_core::{PlanRequest, SkillLevel};

use config::{CliOverrides, PathwiseConfig};

#[derive(Parser)]
#[command(
    name = "pathwise",
    version,
    about = "Generate video-backed learning plans"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a pathwise config file
    Init {
        /// Gemini API key for plan generation
        #[arg(long)]
        gemini_key: Option<String>,
        /// YouTube Data API key for video lookup
        #[arg(long)]
        youtube_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Run the HTTP API server
    Serve {
        /// Address to bind (overrides PATHWISE_BIND and the config file)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides PATHWISE_PORT and the config file)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one learning plan and print it as JSON
    Generate {
        /// What to learn
        #[arg(long)]
        topic: String,
        /// Total hours to invest
        #[arg(long)]
        hours: u32,
        /// Beginner, Intermediate, or Advanced
        #[arg(long)]
        level: SkillLevel,
        /// Skip video lookup
        #[arg(long)]
        no_videos: bool,
    },
    /// Check that videos exist, are public, and can be embedded
    Verify {
        /// Video URLs or 11-character ids
        #[arg(required = true)]
        references: Vec<String>,
        /// Human-readable output instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Print shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

/// Execute the `pathwise init` command: write config file.
fn cmd_init(gemini_key: Option<String>, youtube_key: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let mut cfg = config::ConfigFile::default();
    cfg.generation.api_key = gemini_key;
    cfg.video.api_key = youtube_key;
    cfg.server.bind = Some(config::DEFAULT_BIND.to_string());
    cfg.server.port = Some(config::DEFAULT_PORT);

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match &cfg.generation.api_key {
        Some(key) => println!("  generation.api_key = {}", config::mask_key(key)),
        None => println!("  generation.api_key not set (GEMINI_API_KEY will be used if present)"),
    }
    match &cfg.video.api_key {
        Some(key) => println!("  video.api_key = {}", config::mask_key(key)),
        None => println!("  video.api_key not set (YOUTUBE_API_KEY will be used if present)"),
    }
    println!();
    println!("Next: run `pathwise serve` or `pathwise generate --topic <TOPIC> --hours <N> --level <LEVEL>`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            gemini_key,
            youtube_key,
            force,
        } => {
            cmd_init(gemini_key, youtube_key, force)?;
        }
        Commands::Serve { bind, port } => {
            let resolved = PathwiseConfig::resolve(&CliOverrides {
                bind: bind.as_deref(),
                port,
            })?;
            let state = serve_cmd::AppState {
                plans: resolved.plan_service(true)?.map(Arc::new),
                videos: resolved.video_lookup()?,
            };
            serve_cmd::run_serve(state, &resolved.bind, resolved.port).await?;
        }
        Commands::Generate {
            topic,
            hours,
            level,
            no_videos,
        } => {
            let resolved = PathwiseConfig::resolve(&CliOverrides::default())?;
            let request = PlanRequest::new(topic, hours, level);
            generate_cmd::run_generate(&resolved, request, !no_videos).await?;
        }
        Commands::Verify { references, plain } => {
            let resolved = PathwiseConfig::resolve(&CliOverrides::default())?;
            verify_cmd::run_verify(&resolved, &references, plain).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pathwise", &mut std::io::stdout());
        }
    }

    Ok(())
}

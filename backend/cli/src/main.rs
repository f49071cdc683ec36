mod config;
mod terminal_output;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use markdown::{format_analysis, FormattedBlock};
use media::{ACCEPTED_UPLOAD_TYPES, MAX_UPLOAD_BYTES};
use snakelens_config::{load_and_prepare, load_config, redact};
use snakelens_page::{Completion, PageController};

use terminal_output::{note_error, render_blocks, render_page, OutputFormat};

#[derive(Parser)]
#[command(name = "snakelens")]
#[command(about = "SnakeLens: identify snakes from photos with a vision model")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.snakelens/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (ansi on color terminals, plain otherwise)
    #[arg(long, value_enum, global = true)]
    format: Option<OutputFormat>,

    /// Use the built-in mock provider instead of a network model
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the default snake with its canned analysis
    Default,
    /// Upload a photo and identify the snake in it
    Identify {
        #[arg(help = upload_help())]
        file: PathBuf,
    },
    /// Format an analysis text file ("-" for stdin)
    Render {
        file: PathBuf,
    },
    /// Print the effective configuration with secrets masked
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config_path = config::resolve_config_path(cli.config.as_deref());
    init_logging(&config_path).await;

    match run(cli, &config_path).await {
        Ok(code) => code,
        Err(err) => {
            note_error(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

/// File logging from the raw config; console only if that cannot start.
async fn init_logging(config_path: &Path) {
    let raw = load_config(config_path).await.unwrap_or_default();
    if let Err(err) = logging::init_logger(raw.log_dir(), raw.log_level()) {
        logging::init_console_logger(raw.log_level());
        warn!(error = %err, "File logging unavailable, logging to stderr only");
    }
}

async fn run(cli: Cli, config_path: &Path) -> Result<ExitCode> {
    let format = cli.format.unwrap_or_else(OutputFormat::detect);

    match cli.command {
        Commands::Default => {
            let cfg = load_and_prepare(config_path).await?;
            let mut page = PageController::new();
            let mounted = page.mount(cfg.default_image_source()).await;
            print!("{}", render_page(page.state(), format));
            Ok(exit_code(mounted.is_ok()))
        }
        Commands::Identify { file } => {
            let cfg = load_and_prepare(config_path).await?;
            let provider = config::build_provider(&cfg, cli.offline)?;

            let mut page = PageController::new();
            if let Err(err) = page.mount(cfg.default_image_source()).await {
                warn!(error = %err, "Continuing without the default image");
            }
            let outcome = page.upload_path(provider.as_ref(), &file).await;
            print!("{}", render_page(page.state(), format));

            let succeeded = matches!(outcome, Ok(Completion::Succeeded));
            info!(session = page.session_id(), succeeded, "Identification finished");
            Ok(exit_code(succeeded))
        }
        Commands::Render { file } => {
            let text = read_analysis(&file).await?;
            let blocks: Vec<FormattedBlock> = format_analysis(&text).collect();
            print!("{}", render_blocks(&blocks, format));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Config => {
            let cfg = load_and_prepare(config_path).await?;
            let value = serde_json::to_value(&cfg).context("Failed to serialize config")?;
            println!("# {}", config_path.display());
            print!("{}", serde_yaml::to_string(&redact(&value))?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn read_analysis(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("Failed to read analysis from stdin")?;
        Ok(text)
    } else {
        tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("Failed to read {}", file.display()))
    }
}

fn upload_help() -> String {
    format!(
        "Image file ({}), up to {} MB",
        ACCEPTED_UPLOAD_TYPES.join(", "),
        MAX_UPLOAD_BYTES / (1024 * 1024)
    )
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn identify_help_lists_advertised_types() {
        let help = upload_help();
        assert_eq!(help, "Image file (image/jpeg, image/png, image/jpg), up to 20 MB");

        let mut cmd = Cli::command();
        let identify = cmd.find_subcommand_mut("identify").unwrap();
        let rendered = identify.render_help().to_string();
        assert!(rendered.contains("image/jpg"));
        assert!(!rendered.contains("GIF"));
    }

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["snakelens", "identify", "viper.png", "--offline", "--format", "html"])
            .unwrap();
        assert!(cli.offline);
        assert_eq!(cli.format, Some(OutputFormat::Html));
        assert!(matches!(cli.command, Commands::Identify { file } if file == PathBuf::from("viper.png")));
    }

    #[test]
    fn default_config_points_at_the_bundled_image() {
        assert_eq!(
            snakelens_config::defaults::DEFAULT_IMAGE_SOURCE,
            media::BUNDLED_DEFAULT_SOURCE
        );
    }
}

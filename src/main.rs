use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use nalgebra::Vector3;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;

mod aids;
mod app;
mod color;
mod config;
mod constants;
mod display;
mod drag;
mod error;
mod geometry;
mod readout;
mod visualizer;

use color::Theme;
use config::Config;
use geometry::Spherical;
use readout::format_readouts;

#[derive(Parser, Debug)]
#[command(name = "coordsync")]
#[command(
    author,
    version,
    about = "Drag a point in 3D and watch its Cartesian and spherical coordinates"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive two-pane view (default)
    Run(RunArgs),

    /// Print both readouts for a point and exit
    #[command(allow_negative_numbers = true)]
    Convert { x: f64, y: f64, z: f64 },

    /// Write a commented config template to the default path
    InitConfig {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Print a shell completion script
    Completions { shell: Shell },
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Frames per second
    #[arg(long)]
    pub fps: Option<u32>,

    /// Color theme
    #[arg(long)]
    pub theme: Option<Theme>,

    /// Disable orbit damping
    #[arg(long)]
    pub no_damping: bool,

    /// Hide the key help line
    #[arg(long)]
    pub no_help: bool,

    /// Write logs here instead of the state directory
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

impl RunArgs {
    fn log_file(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::state_dir()
                .or_else(dirs::cache_dir)
                .map(|dir| dir.join("coordsync").join("coordsync.log"))
        })
    }
}

/// The TUI owns stdout, so logs go to a file. Without a usable path they are dropped.
fn init_logging(path: Option<PathBuf>) -> Result<()> {
    let Some(path) = path else {
        return Ok(());
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {:?}", parent))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("coordsync=info".parse()?),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let config = Config::load(path)?;
            info!("Loaded config from {:?}", path);
            config
        }
        None => Config::load_from_default_path().unwrap_or_default(),
    };
    config.merge_args(args);
    config.validate()?;
    Ok(config)
}

fn convert(x: f64, y: f64, z: f64) {
    let point = Vector3::new(x, y, z);
    let strings = format_readouts(&point, &Spherical::from_point(&point));
    println!("Cartesian  {}", strings.cartesian.join("  "));
    println!("Spherical  {}", strings.spherical.join("  "));
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Convert { x, y, z }) => convert(x, y, z),
        Some(Command::InitConfig { force }) => {
            let path = Config::init_default_config(force)?;
            println!("Config written to {}", path.display());
        }
        Some(Command::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "coordsync",
                &mut std::io::stdout(),
            );
        }
        Some(Command::Run(args)) => run(args).await?,
        None => run(cli.run).await?,
    }

    Ok(())
}

async fn run(args: RunArgs) -> Result<()> {
    init_logging(args.log_file())?;
    info!("Starting coordsync {}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&args)?;
    let config_path = args.config.clone().or_else(Config::default_path);
    let stats = display::terminal::run(config, config_path).await?;

    info!(
        "Shutting down after {} frames in {:.1}s ({:?})",
        stats.frames,
        stats.elapsed.as_secs_f64(),
        stats.reason
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_run() {
        let cli = Cli::try_parse_from(["coordsync", "--fps", "30", "--theme", "dark"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.run.fps, Some(30));
        assert_eq!(cli.run.theme, Some(Theme::Dark));
    }

    #[test]
    fn test_convert_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["coordsync", "convert", "-1.5", "2", "-0.25"]).unwrap();
        match cli.command {
            Some(Command::Convert { x, y, z }) => {
                assert_eq!((x, y, z), (-1.5, 2.0, -0.25));
            }
            other => panic!("expected convert, got {:?}", other),
        }
    }

    #[test]
    fn test_run_subcommand_flags() {
        let cli = Cli::try_parse_from(["coordsync", "run", "--no-damping", "--no-help"]).unwrap();
        let Some(Command::Run(args)) = cli.command else {
            panic!("expected run");
        };
        assert!(args.no_damping);
        assert!(args.no_help);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_completions_subcommand() {
        let cli = Cli::try_parse_from(["coordsync", "completions", "bash"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Completions { shell: Shell::Bash })
        ));
    }

    #[test]
    fn test_unknown_theme_is_rejected() {
        assert!(Cli::try_parse_from(["coordsync", "--theme", "neon"]).is_err());
    }

    #[test]
    fn test_cli_zero_fps_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::write_template(&path, false).unwrap();
        let args = RunArgs {
            config: Some(path),
            fps: Some(0),
            ..RunArgs::default()
        };
        assert!(load_config(&args).is_err());

        let args = RunArgs {
            fps: Some(24),
            ..args
        };
        assert_eq!(load_config(&args).unwrap().display.fps, 24);
    }
}

//! CLI argument definitions.

use crate::config::StemFormat;
use crate::constants::MAX_AGGRESSIVENESS;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Batch vocal/instrumental separation with UVR5 models.
#[derive(Debug, Parser)]
#[command(name = "stemsep")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Input files or directories to separate.
    pub inputs: Vec<String>,

    /// Common options for separation.
    #[command(flatten)]
    pub separate: SeparateArgs,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage configuration.
    Config {
        /// Configuration action to perform.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommand actions.
#[derive(Debug, Clone, Copy, Subcommand)]
pub enum ConfigAction {
    /// Create default configuration file.
    Init,
    /// Display current configuration.
    Show,
    /// Print configuration file path.
    Path,
}

/// Arguments for the separate command.
#[derive(Debug, Args)]
pub struct SeparateArgs {
    /// Model name from the weights directory.
    #[arg(short, long, env = "STEMSEP_MODEL")]
    pub model: Option<String>,

    /// Additional input roots; directories expand to their immediate files.
    #[arg(short = 'i', long = "input-root")]
    pub input_root: Vec<String>,

    /// Output directory for vocal stems.
    #[arg(long, env = "STEMSEP_VOCAL_DIR")]
    pub vocal_dir: Option<String>,

    /// Output directory for instrumental stems.
    #[arg(long, env = "STEMSEP_INSTRUMENTAL_DIR")]
    pub instrumental_dir: Option<String>,

    /// Vocal extraction aggressiveness (0-20).
    #[arg(short, long, value_parser = parse_aggressiveness, env = "STEMSEP_AGGRESSIVENESS")]
    pub aggressiveness: Option<u32>,

    /// Output stem format (wav, flac, mp3, m4a).
    #[arg(short, long, env = "STEMSEP_FORMAT")]
    pub format: Option<StemFormat>,

    /// JSON manifest of extra input entries.
    #[arg(long)]
    pub paths_from: Option<PathBuf>,

    /// Directory holding model weights (overrides config).
    #[arg(long, env = "STEMSEP_WEIGHTS_DIR")]
    pub weights_dir: Option<PathBuf>,

    /// Directory for reformatted intermediates (overrides config).
    #[arg(long, env = "STEMSEP_TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Enable CUDA GPU acceleration.
    #[arg(long, conflicts_with = "cpu")]
    pub gpu: bool,

    /// Force CPU inference.
    #[arg(long, conflicts_with = "gpu")]
    pub cpu: bool,

    /// Suppress progress output.
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity (-v: debug, -vv: trace+ORT info, -vvv: trace+ORT debug).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable the progress bar even on a TTY.
    #[arg(long)]
    pub no_progress: bool,
}

/// Parse and validate an aggressiveness value.
fn parse_aggressiveness(s: &str) -> Result<u32, String> {
    let value: u32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if value > MAX_AGGRESSIVENESS {
        return Err(format!(
            "aggressiveness must be between 0 and {MAX_AGGRESSIVENESS}, got {value}"
        ));
    }

    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aggressiveness_valid() {
        assert_eq!(parse_aggressiveness("0").ok(), Some(0));
        assert_eq!(parse_aggressiveness("10").ok(), Some(10));
        assert_eq!(parse_aggressiveness("20").ok(), Some(20));
    }

    #[test]
    fn test_parse_aggressiveness_invalid() {
        assert!(parse_aggressiveness("21").is_err());
        assert!(parse_aggressiveness("-1").is_err());
        assert!(parse_aggressiveness("abc").is_err());
    }

    #[test]
    fn test_cli_parse_simple() {
        let cli = Cli::try_parse_from(["stemsep", "track.wav"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.inputs.len(), 1);
    }

    #[test]
    fn test_cli_parse_with_options() {
        let cli = Cli::try_parse_from([
            "stemsep",
            "track.wav",
            "-m",
            "HP2-vocals",
            "-a",
            "15",
            "-f",
            "flac",
            "-q",
        ]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        assert_eq!(cli.separate.model, Some("HP2-vocals".to_string()));
        assert_eq!(cli.separate.aggressiveness, Some(15));
        assert_eq!(cli.separate.format, Some(StemFormat::Flac));
        assert!(cli.separate.quiet);
    }

    #[test]
    fn test_cli_parse_input_roots() {
        let cli = Cli::try_parse_from([
            "stemsep",
            "-i",
            "/music/albums",
            "-i",
            "/music/singles",
            "-m",
            "HP5",
        ])
        .unwrap();
        assert_eq!(cli.separate.input_root.len(), 2);
        assert!(cli.inputs.is_empty());
    }

    #[test]
    fn test_cli_parse_config_subcommand() {
        let cli = Cli::try_parse_from(["stemsep", "config", "show"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_cli_gpu_cpu_conflict() {
        let cli = Cli::try_parse_from(["stemsep", "track.wav", "--gpu", "--cpu"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_aac_format_alias() {
        let cli = Cli::try_parse_from(["stemsep", "track.wav", "-f", "aac"]).unwrap();
        assert_eq!(cli.separate.format, Some(StemFormat::M4a));
    }
}

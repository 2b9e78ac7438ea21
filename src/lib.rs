//! Stemsep - batch vocal/instrumental separation CLI.
//!
//! Drives UVR5-family ONNX separation models over batches of audio files:
//! inputs are collected from newline-delimited roots and explicit entries,
//! gated on canonical stereo 44.1 kHz format, reformatted when needed, and
//! separated into vocal and instrumental stems.

#![warn(missing_docs)]

pub mod audio;
pub mod batch;
pub mod cleanup;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod progress;
pub mod separator;

use batch::{BatchRequest, BatchRunner, FfmpegTranscoder, Ffprobe, PathEntry, collect_candidates};
use clap::{CommandFactory, Parser};
use cli::{Cli, Command, ConfigAction, SeparateArgs};
use config::{
    Config, InferenceDevice, config_file_path, default_weights_dir, load_default_config,
    save_default_config,
};
use separator::ConfiguredFactory;
use std::path::Path;
use tracing::{info, warn};

pub use error::{Error, Result};

/// Main entry point for the stemsep CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.separate.verbose, cli.separate.quiet);

    // Remove reformatted temp files on interrupt
    if let Err(e) = ctrlc::set_handler(|| {
        cleanup::cleanup_all_temps();
        std::process::exit(130); // 128 + SIGINT(2)
    }) {
        warn!("Failed to install Ctrl+C handler: {e}");
    }

    if let Some(command) = cli.command {
        return handle_command(command);
    }

    if cli.inputs.is_empty()
        && cli.separate.input_root.is_empty()
        && cli.separate.paths_from.is_none()
    {
        let mut cmd = Cli::command();
        let _ = cmd.print_help();
        std::process::exit(0);
    }

    let config = load_default_config()?;
    separate_files(&cli.inputs, &cli.separate, &config)
}

/// Separate the given inputs with the resolved options.
fn separate_files(inputs: &[String], args: &SeparateArgs, config: &Config) -> Result<()> {
    let model_name = args
        .model
        .clone()
        .or_else(|| config.defaults.model.clone())
        .ok_or(Error::ModelNotSpecified)?;

    let aggressiveness = args
        .aggressiveness
        .unwrap_or(config.defaults.aggressiveness);
    let format = args.format.unwrap_or(config.defaults.format);
    let vocal_dir = args
        .vocal_dir
        .clone()
        .unwrap_or_else(|| config.defaults.vocal_dir.to_string_lossy().into_owned());
    let instrumental_dir = args.instrumental_dir.clone().unwrap_or_else(|| {
        config
            .defaults
            .instrumental_dir
            .to_string_lossy()
            .into_owned()
    });

    let device = if args.gpu {
        InferenceDevice::Gpu
    } else if args.cpu {
        InferenceDevice::Cpu
    } else {
        config.inference.device
    };

    let weights_dir = match args.weights_dir.clone().or_else(|| config.paths.weights_dir.clone()) {
        Some(dir) => dir,
        None => default_weights_dir()?,
    };
    let temp_dir = args
        .temp_dir
        .clone()
        .or_else(|| config.paths.temp_dir.clone())
        .unwrap_or_else(std::env::temp_dir);

    // Explicit CLI paths join the root expansion as raw entries; a manifest
    // contributes its entries after them.
    let mut extra_paths: Vec<PathEntry> = inputs
        .iter()
        .map(|p| PathEntry::Raw(p.clone()))
        .collect();
    if let Some(manifest) = &args.paths_from {
        extra_paths.extend(load_path_manifest(manifest)?);
    }

    let input_root = args.input_root.join("\n");
    if input_root.is_empty() && extra_paths.is_empty() {
        return Err(Error::NoInputs);
    }

    let request = BatchRequest {
        model_name: model_name.clone(),
        input_root,
        vocal_dir,
        instrumental_dir,
        extra_paths,
        aggressiveness,
        format,
    };

    info!("Separating with model {model_name} on {device:?}");

    let factory = ConfiguredFactory {
        weights_dir,
        device,
    };
    let prober = Ffprobe;
    let transcoder = FfmpegTranscoder;
    let runner = BatchRunner {
        factory: &factory,
        prober: &prober,
        transcoder: &transcoder,
        temp_dir,
        accelerated: device != InferenceDevice::Cpu,
    };

    let progress_enabled = !args.quiet && !args.no_progress;
    // Every candidate ends up as exactly one result-log line, so the expanded
    // candidate count is the bar's denominator and the log length its position.
    let total = collect_candidates(&request.input_root, &request.extra_paths).len();
    let bar = progress::create_batch_progress(total, progress_enabled);
    let mut seen_lines = 0;
    let lines = runner.run(&request, &mut |joined| {
        let count = joined.lines().count();
        if count > seen_lines {
            if let Some(latest) = joined.lines().last() {
                progress::update_progress(bar.as_ref(), count, latest);
            }
            seen_lines = count;
        }
    });
    progress::finish_progress(bar, "Complete");

    cleanup::cleanup_all_temps();

    for line in &lines {
        println!("{line}");
    }

    let failures = lines.iter().filter(|l| !l.ends_with("->Success")).count();
    if failures > 0 {
        warn!("{failures} file(s) did not separate cleanly");
    }

    Ok(())
}

/// Load extra input entries from a JSON manifest.
fn load_path_manifest(path: &Path) -> Result<Vec<PathEntry>> {
    let raw = std::fs::read_to_string(path).map_err(|e| Error::ManifestRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    serde_json::from_str(&raw).map_err(|e| Error::ManifestParse {
        path: path.to_path_buf(),
        source: e,
    })
}

fn init_logging(verbose: u8, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt};

    // ORT logging is suppressed by default because CUDA fallback is expected
    // in auto mode. Use -v to see ORT warnings, -vv for info, -vvv for trace.
    let filter_str = if quiet {
        "warn,ort=off".to_string()
    } else {
        match verbose {
            0 => "info,ort=off".to_string(),
            1 => "debug,ort=warn".to_string(),
            2 => "trace,ort=info".to_string(),
            _ => "trace".to_string(),
        }
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    fmt().with_env_filter(filter).init();
}

fn handle_command(command: Command) -> Result<()> {
    match command {
        Command::Config { action } => handle_config_command(action),
    }
}

fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Init => {
            let path = config_file_path()?;
            if path.exists() {
                println!("Configuration file already exists: {}", path.display());
            } else {
                let config = Config::default();
                let saved_path = save_default_config(&config)?;
                println!("Created configuration file: {}", saved_path.display());
                println!("\nNext steps:");
                println!("  place model weights under {}", weights_hint()?);
                println!("  stemsep -m <model-name> track.wav");
            }
            Ok(())
        }
        ConfigAction::Show => {
            let config = load_default_config()?;
            println!("{config:#?}");
            Ok(())
        }
        ConfigAction::Path => {
            let path = config_file_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Weights directory shown in `config init` guidance.
fn weights_hint() -> Result<String> {
    Ok(default_weights_dir()?.display().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_load_path_manifest_mixed_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let manifest = dir.path().join("paths.json");
        std::fs::write(
            &manifest,
            r#"[{"name": "/a/track.wav", "path": "/ignored"}, "/b/other.flac"]"#,
        )
        .unwrap();

        let entries = load_path_manifest(&manifest).unwrap();
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_load_path_manifest_missing_file() {
        let err = load_path_manifest(Path::new("/nonexistent/paths.json"));
        assert!(err.is_err());
    }

    #[test]
    fn test_load_path_manifest_bad_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let manifest = dir.path().join("paths.json");
        std::fs::write(&manifest, "{not json").unwrap();
        assert!(load_path_manifest(&manifest).is_err());
    }
}

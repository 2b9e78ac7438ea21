//! Batch separation driver.
//!
//! Runs the whole batch sequentially: collect and validate inputs, build the
//! backend, then probe / optionally reformat / invoke each file with one
//! retry. A failure on one file never aborts the batch; backend resources are
//! released even when the batch fails before the loop is entered.

use crate::batch::collect::{PathEntry, collect_candidates, trim_quoted};
use crate::batch::probe::MediaProber;
use crate::batch::reformat::Transcoder;
use crate::batch::validate::{basename, validate_candidates};
use crate::batch::ResultLog;
use crate::config::{StemFormat, expand_user};
use crate::constants::{REFORMATTED_SUFFIX, model_names};
use crate::error::Result;
use crate::separator::{BackendFactory, Separator};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One batch separation request.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    /// Model identifier; selects the backend and its weights file.
    pub model_name: String,
    /// Root input string: newline-delimited file or directory paths,
    /// optionally quoted.
    pub input_root: String,
    /// Output directory for vocal stems.
    pub vocal_dir: String,
    /// Output directory for instrumental stems.
    pub instrumental_dir: String,
    /// Explicit path-like entries, appended after the expanded root.
    pub extra_paths: Vec<PathEntry>,
    /// Separation aggressiveness (0-20).
    pub aggressiveness: u32,
    /// Output stem format, passed through to the backend.
    pub format: StemFormat,
}

/// Sequential batch runner over pluggable collaborators.
///
/// The factory, prober and transcoder seams exist so the control flow can be
/// exercised without real models or external tools.
pub struct BatchRunner<'a> {
    /// Builds the separation backend for the requested model.
    pub factory: &'a dyn BackendFactory,
    /// Probes input files for their stream format.
    pub prober: &'a dyn MediaProber,
    /// Transcodes non-canonical inputs to canonical WAV.
    pub transcoder: &'a dyn Transcoder,
    /// Directory receiving reformatted temp files.
    pub temp_dir: PathBuf,
    /// Whether an accelerated device was selected; controls the cleanup-phase
    /// memory release log.
    pub accelerated: bool,
}

impl BatchRunner<'_> {
    /// Run the batch to completion.
    ///
    /// `progress` receives the full newline-joined result log at every yield
    /// point: after each processed or failed file, after a batch-level
    /// failure, and once more after cleanup. The returned lines are the final
    /// state of that log.
    pub fn run(&self, request: &BatchRequest, progress: &mut dyn FnMut(&str)) -> Vec<String> {
        let mut log = ResultLog::new();
        let mut backend: Option<Box<dyn Separator>> = None;

        if let Err(e) = self.run_inner(request, &mut backend, &mut log, progress) {
            log.push(e.detail());
            log.emit(progress);
        }

        // Best-effort release; never propagates.
        if let Some(mut backend) = backend.take() {
            if let Err(e) = backend.release() {
                warn!("Backend release failed: {}", e.detail());
            }
        }
        if self.accelerated {
            info!("Released accelerator memory cache");
        }

        log.emit(progress);
        log.into_lines()
    }

    fn run_inner(
        &self,
        request: &BatchRequest,
        backend_slot: &mut Option<Box<dyn Separator>>,
        log: &mut ResultLog,
        progress: &mut dyn FnMut(&str),
    ) -> Result<()> {
        let vocal_dir = expand_user(trim_quoted(&request.vocal_dir));
        let instrumental_dir = expand_user(trim_quoted(&request.instrumental_dir));

        let candidates = collect_candidates(&request.input_root, &request.extra_paths);
        let files = validate_candidates(&candidates, log);

        let backend = backend_slot.insert(
            self.factory
                .build(&request.model_name, request.aggressiveness)?,
        );
        let hp3 = request.model_name.contains(model_names::HP3_MARKER);

        let total = files.len();
        for (idx, input) in files.iter().enumerate() {
            info!("Processing file {}/{}: {}", idx + 1, total, input.display());
            self.process_file(
                input,
                backend.as_mut(),
                &vocal_dir,
                &instrumental_dir,
                request.format,
                hp3,
                log,
                progress,
            );
        }

        Ok(())
    }

    /// Probe, optionally reformat, invoke with one retry; record one status
    /// line and emit the accumulated log.
    #[allow(clippy::too_many_arguments)]
    fn process_file(
        &self,
        input: &Path,
        backend: &mut dyn Separator,
        vocal_dir: &Path,
        instrumental_dir: &Path,
        format: StemFormat,
        hp3: bool,
        log: &mut ResultLog,
        progress: &mut dyn FnMut(&str),
    ) {
        let mut current = input.to_path_buf();
        let mut need_reformat = true;
        let mut done = false;

        match self.prober.probe(&current) {
            Ok(info) if info.is_canonical() => {
                need_reformat = false;
                // Canonical input: invoke directly, with the variant flag.
                // The flag is never passed again on fallback or retry.
                match backend.separate(&current, vocal_dir, instrumental_dir, format, hp3) {
                    Ok(()) => done = true,
                    Err(e) => {
                        need_reformat = true;
                        warn!(
                            "Direct separation of {} failed, falling back to reformat: {}",
                            current.display(),
                            e.detail()
                        );
                    }
                }
            }
            Ok(_) => {
                debug!("{} does not match canonical format", current.display());
            }
            Err(e) => {
                debug!(
                    "Probe of {} failed, forcing reformat: {}",
                    current.display(),
                    e.detail()
                );
            }
        }

        if need_reformat {
            let name = current.file_name().map_or_else(
                || "input".to_string(),
                |n| n.to_string_lossy().into_owned(),
            );
            let reformatted = self.temp_dir.join(format!("{name}{REFORMATTED_SUFFIX}"));
            self.transcoder.to_canonical_wav(&current, &reformatted);
            current = reformatted;
        }

        let first = if done {
            Ok(())
        } else {
            backend.separate(&current, vocal_dir, instrumental_dir, format, false)
        };
        let result = match first {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!(
                    "Separation of {} failed, retrying once: {}",
                    current.display(),
                    e.detail()
                );
                backend.separate(&current, vocal_dir, instrumental_dir, format, false)
            }
        };

        let name = basename(&current.to_string_lossy()).to_string();
        match result {
            Ok(()) => log.push(format!("{name}->Success")),
            Err(e) => log.push(format!("{name}->{}", e.detail())),
        }
        log.emit(progress);
    }
}

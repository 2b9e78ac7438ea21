//! Batch separation: input collection, validation, format gating, and the
//! sequential per-file driver.

mod collect;
mod log;
mod probe;
mod reformat;
mod runner;
mod validate;

pub use collect::{PathEntry, collect_candidates, trim_quoted};
pub use log::ResultLog;
pub use probe::{Ffprobe, MediaProber, ProbeInfo, StreamInfo};
pub use reformat::{FfmpegTranscoder, Transcoder};
pub use runner::{BatchRequest, BatchRunner};
pub use validate::{basename, validate_candidates};

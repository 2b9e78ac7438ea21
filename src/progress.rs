//! Progress reporting for batch separation.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Create a progress bar over the files of a batch.
pub fn create_batch_progress(total_files: usize, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total_files == 0 {
        return None;
    }

    let pb = ProgressBar::new(total_files as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} files {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ "),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    Some(pb)
}

/// Move the bar to `position`, showing the latest status line.
pub fn update_progress(pb: Option<&ProgressBar>, position: usize, message: &str) {
    if let Some(pb) = pb {
        pb.set_message(message.to_string());
        pb.set_position(position as u64);
    }
}

/// Finish a progress bar with a message.
pub fn finish_progress(pb: Option<ProgressBar>, message: &str) {
    if let Some(pb) = pb {
        pb.finish_with_message(message.to_string());
    }
}

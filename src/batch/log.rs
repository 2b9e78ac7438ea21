//! Cumulative result log.
//!
//! The batch job's only functional output: an ordered list of per-file status
//! lines. At every yield point the *entire* joined log is re-emitted to the
//! progress consumer, not a delta.

/// Ordered, append-only sequence of human-readable status lines.
#[derive(Debug, Default)]
pub struct ResultLog {
    lines: Vec<String>,
}

impl ResultLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a status line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// The full log joined with newlines.
    pub fn joined(&self) -> String {
        self.lines.join("\n")
    }

    /// Send the full joined log to the progress consumer.
    pub fn emit(&self, progress: &mut dyn FnMut(&str)) {
        progress(&self.joined());
    }

    /// Consume the log, returning the accumulated lines.
    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Lines accumulated so far.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_preserves_order() {
        let mut log = ResultLog::new();
        log.push("a.wav->Success");
        log.push("b.wav->Missing input");
        assert_eq!(log.joined(), "a.wav->Success\nb.wav->Missing input");
    }

    #[test]
    fn test_emit_sends_full_log_each_time() {
        let mut log = ResultLog::new();
        let mut seen = Vec::new();
        let mut collect = |s: &str| seen.push(s.to_string());

        log.push("a.wav->Success");
        log.emit(&mut collect);
        log.push("b.wav->Success");
        log.emit(&mut collect);

        assert_eq!(seen, vec!["a.wav->Success", "a.wav->Success\nb.wav->Success"]);
    }
}

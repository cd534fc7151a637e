use crate::kernel::context::char_tail;

pub const DEFAULT_MAX_CHARS: usize = 500;

/// Builds the running transcript from recognizer output.
///
/// Final segments are committed and bounded to a character tail; the interim
/// guess is only appended when rendering.
#[derive(Debug, Clone)]
pub struct TranscriptAccumulator {
    committed: String,
    max_chars: usize,
}

impl TranscriptAccumulator {
    pub fn new(max_chars: usize) -> Self {
        Self {
            committed: String::new(),
            max_chars,
        }
    }

    pub fn commit(&mut self, segment: &str) {
        let segment = segment.trim();
        if segment.is_empty() {
            return;
        }
        self.committed.push_str(segment);
        self.committed.push(' ');

        if self.committed.chars().count() > self.max_chars {
            self.committed = char_tail(&self.committed, self.max_chars).to_string();
        }
    }

    pub fn render(&self, interim: &str) -> String {
        format!("{}{}", self.committed, interim)
    }

    pub fn committed(&self) -> &str {
        &self.committed
    }

    pub fn reset(&mut self) {
        self.committed.clear();
    }
}

impl Default for TranscriptAccumulator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHARS)
    }
}

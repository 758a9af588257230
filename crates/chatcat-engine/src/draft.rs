//! Length-bounded input draft.

/// Default maximum draft length, in characters.
pub const MAX_DRAFT_CHARS: usize = 200;

/// The not-yet-submitted input text.
///
/// The draft never holds more than `max_chars` characters. Input beyond the
/// limit is cut at the boundary and the over-limit flag is raised until the
/// next update that fits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    text: String,
    max_chars: usize,
    over_limit: bool,
}

impl Draft {
    /// Create an empty draft with the given character limit.
    pub fn new(max_chars: usize) -> Self {
        Self {
            text: String::new(),
            max_chars,
            over_limit: false,
        }
    }

    /// Replace the draft with `raw`, truncating at the limit.
    ///
    /// Returns `true` if the input had to be truncated.
    pub fn update(&mut self, raw: &str) -> bool {
        match raw.char_indices().nth(self.max_chars) {
            Some((cut, _)) => {
                self.text = raw[..cut].to_string();
                self.over_limit = true;
            }
            None => {
                self.text = raw.to_string();
                self.over_limit = false;
            }
        }
        self.over_limit
    }

    /// Empty the draft and clear the over-limit flag.
    pub fn clear(&mut self) {
        self.text.clear();
        self.over_limit = false;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length in characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn is_over_limit(&self) -> bool {
        self.over_limit
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl Default for Draft {
    fn default() -> Self {
        Self::new(MAX_DRAFT_CHARS)
    }
}

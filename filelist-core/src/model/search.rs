//! `src/model/search.rs`
//!
//! Incremental type-ahead search. Typing accumulates a pattern; each change
//! moves the cursor to the next display name that starts with the pattern,
//! or failing that contains it once punctuation and case are ignored.

use std::time::{Duration, Instant};

use compact_str::CompactString;
use tracing::debug;

/// Longest pattern, in characters.
pub const MAX_SEARCH_LENGTH: usize = 64;

/// Inactivity period after which a session clears itself.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pattern: CompactString,
    active: bool,
    error: bool,
    dirty: bool,
    last_keystroke: Option<Instant>,
}

impl SearchState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one typed character. A new session starts with an empty pattern;
    /// after a failed lookup the pattern is frozen until the session ends.
    pub fn push(&mut self, c: char, now: Instant) {
        if !self.active {
            self.active = true;
            self.error = false;
            self.pattern.clear();
        }

        if self.error || self.pattern.chars().count() >= MAX_SEARCH_LENGTH {
            return;
        }

        self.pattern.push(c);
        self.dirty = true;
        self.last_keystroke = Some(now);
    }

    /// End the session.
    pub fn clear(&mut self) {
        if self.active {
            debug!("Search session cleared at {:?}", self.pattern);
        }
        self.pattern.clear();
        self.active = false;
        self.error = false;
        self.dirty = false;
        self.last_keystroke = None;
    }

    /// Clear the session if nothing was accepted for `timeout`.
    /// Returns true when it expired.
    pub fn expire(&mut self, now: Instant, timeout: Duration) -> bool {
        let expired = self.active
            && self
                .last_keystroke
                .is_none_or(|t| now.saturating_duration_since(t) >= timeout);
        if expired {
            self.clear();
        }
        expired
    }

    /// Returns and resets the pending-lookup flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn mark_not_found(&mut self) {
        self.error = true;
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error
    }
}

/// Index of the first name matching `pattern`, searching from `start` to
/// the end and then wrapping to `[0, start)`.
#[must_use]
pub fn locate<S: AsRef<str>>(names: &[S], pattern: &str, start: usize) -> Option<usize> {
    let start = start.min(names.len());
    let canonical_pattern = canonicalize(pattern);

    let scan = |from: usize, to: usize| {
        (from..to)
            .find(|&i| has_prefix(names[i].as_ref(), pattern))
            .or_else(|| {
                if canonical_pattern.is_empty() {
                    return None;
                }
                (from..to).find(|&i| canonicalize(names[i].as_ref()).contains(&canonical_pattern))
            })
    };

    scan(start, names.len()).or_else(|| if start > 0 { scan(0, start) } else { None })
}

/// Case-insensitive prefix match with leading `/` ignored.
fn has_prefix(name: &str, pattern: &str) -> bool {
    let name = name.trim_start_matches('/').as_bytes();
    let pattern = pattern.as_bytes();
    name.len() >= pattern.len() && name[..pattern.len()].eq_ignore_ascii_case(pattern)
}

/// Lowercase with whitespace and punctuation other than `.` removed, so
/// `"Final_Match-2"` and `"finalmatch2"` compare equal.
#[must_use]
pub fn canonicalize(text: &str) -> String {
    text.trim_start_matches('/')
        .chars()
        .filter(|&c| !c.is_whitespace() && (c == '.' || !c.is_ascii_punctuation()))
        .flat_map(char::to_lowercase)
        .collect()
}

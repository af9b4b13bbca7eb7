//! Debounced free-text search.
//!
//! Time is passed in by the caller. [`Debouncer`] only remembers the latest
//! value and when it becomes due; whoever owns the clock decides when to poll.
//!
//! These types are the reference model for search clients. The server never
//! sees keystrokes, so the admin panel only uses [`SEARCH_DEBOUNCE`] (rendered
//! as `data-debounce-ms`); its table script implements the same rules in the
//! browser: one commit per quiet period, and no overwriting of the box while
//! [`DebouncedSearch::is_typing`] would be true.

use std::time::{Duration, Instant};

/// Quiet period after the last keystroke before a search is committed.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    due: Instant,
}

/// Holds the most recent value until no new value arrives for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Record a new value, restarting the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            due: now + self.delay,
        });
    }

    /// Whether a value is waiting to be committed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value becomes due.
    #[must_use]
    pub fn due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Take the pending value if its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.as_ref().is_some_and(|p| now >= p.due) {
            self.pending.take().map(|p| p.value)
        } else {
            None
        }
    }

    /// Take the pending value immediately (e.g. on Enter).
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

/// Search box state: the literal input plus the last committed search.
///
/// While a commit is pending the user is considered to be typing, and
/// externally driven values (for example a slow refetch restoring the URL
/// value) do not overwrite what they are typing.
#[derive(Debug, Clone)]
pub struct DebouncedSearch {
    input: String,
    committed: String,
    debouncer: Debouncer<String>,
}

impl DebouncedSearch {
    /// Start from the currently committed search.
    #[must_use]
    pub fn new(committed: impl Into<String>) -> Self {
        Self::with_delay(committed, SEARCH_DEBOUNCE)
    }

    #[must_use]
    pub fn with_delay(committed: impl Into<String>, delay: Duration) -> Self {
        let committed = committed.into();
        Self {
            input: committed.clone(),
            committed,
            debouncer: Debouncer::new(delay),
        }
    }

    /// What the search box shows.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// What the table is filtered by.
    #[must_use]
    pub fn committed(&self) -> &str {
        &self.committed
    }

    #[must_use]
    pub const fn is_typing(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// A keystroke.
    pub fn on_input(&mut self, value: impl Into<String>, now: Instant) {
        self.input = value.into();
        self.debouncer.push(self.input.clone(), now);
    }

    /// Commit the search if the quiet period elapsed. Returns the new search.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let value = self.debouncer.poll(now)?;
        self.commit(value)
    }

    /// Commit immediately.
    pub fn submit(&mut self) -> Option<String> {
        let value = self.debouncer.flush().unwrap_or_else(|| self.input.clone());
        self.commit(value)
    }

    /// Apply a value coming from outside (URL change, refetch).
    ///
    /// Ignored while the user is typing. Returns whether it was applied.
    pub fn sync_external(&mut self, external: &str) -> bool {
        if self.is_typing() {
            return false;
        }
        external.clone_into(&mut self.input);
        external.clone_into(&mut self.committed);
        true
    }

    fn commit(&mut self, value: String) -> Option<String> {
        if value == self.committed {
            return None;
        }
        self.committed.clone_from(&value);
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: Duration = Duration::from_millis(80);

    #[test]
    fn test_rapid_keystrokes_commit_once_with_final_value() {
        let start = Instant::now();
        let mut search = DebouncedSearch::new("");
        let mut commits = Vec::new();

        let mut now = start;
        for prefix in ["h", "hu", "hub", "hub ", "hub n"] {
            search.on_input(prefix, now);
            if let Some(c) = search.poll(now) {
                commits.push(c);
            }
            now += STEP;
        }

        // Poll every 10ms for a second after the last keystroke.
        for _ in 0..100 {
            now += Duration::from_millis(10);
            if let Some(c) = search.poll(now) {
                commits.push(c);
            }
        }

        assert_eq!(commits, vec!["hub n".to_string()]);
        assert_eq!(search.committed(), "hub n");
        assert!(!search.is_typing());
    }

    #[test]
    fn test_every_burst_within_interval_commits_once() {
        for len in 1..=20_u32 {
            let start = Instant::now();
            let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
            let mut fired = Vec::new();
            for i in 0..len {
                let now = start + Duration::from_millis(u64::from(i) * 299);
                debouncer.push(i, now);
                fired.extend(debouncer.poll(now));
            }
            let end = start + Duration::from_millis(u64::from(len) * 299 + 300);
            fired.extend(debouncer.poll(end));
            fired.extend(debouncer.poll(end + SEARCH_DEBOUNCE));
            assert_eq!(fired, vec![len - 1]);
        }
    }

    #[test]
    fn test_not_due_before_delay() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.push("a", start);
        assert_eq!(debouncer.poll(start + Duration::from_millis(299)), None);
        assert_eq!(debouncer.poll(start + SEARCH_DEBOUNCE), Some("a"));
        assert_eq!(debouncer.poll(start + SEARCH_DEBOUNCE * 2), None);
    }

    #[test]
    fn test_external_value_ignored_while_typing() {
        let start = Instant::now();
        let mut search = DebouncedSearch::new("old");
        search.on_input("ne", start);

        assert!(!search.sync_external("old"));
        assert_eq!(search.input(), "ne");

        assert_eq!(search.poll(start + SEARCH_DEBOUNCE), Some("ne".to_string()));
        assert!(search.sync_external("from-url"));
        assert_eq!(search.input(), "from-url");
        assert_eq!(search.committed(), "from-url");
    }

    #[test]
    fn test_submit_commits_immediately() {
        let mut search = DebouncedSearch::new("");
        search.on_input("port", Instant::now());
        assert_eq!(search.submit(), Some("port".to_string()));
        assert!(!search.is_typing());
        assert_eq!(search.submit(), None);
    }

    #[test]
    fn test_unchanged_value_does_not_commit() {
        let start = Instant::now();
        let mut search = DebouncedSearch::new("same");
        search.on_input("same", start);
        assert_eq!(search.poll(start + SEARCH_DEBOUNCE), None);
        assert!(!search.is_typing());
    }

    #[test]
    fn test_cancel_drops_pending() {
        let start = Instant::now();
        let mut debouncer = Debouncer::new(SEARCH_DEBOUNCE);
        debouncer.push(1, start);
        debouncer.cancel();
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.due(), None);
        assert_eq!(debouncer.poll(start + SEARCH_DEBOUNCE), None);
    }
}

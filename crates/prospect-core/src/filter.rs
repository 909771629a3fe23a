//! Debounced search input and the default text predicate.
//!
//! [`Debouncer`] holds the raw value the user is typing and the *effective*
//! value the list filters by. A new value only becomes effective once it has
//! been left alone for the debounce window. Two ways of settling are
//! supported:
//!
//! * clock-driven, by calling [`Debouncer::settle`] with the current instant
//!   (handy in tests and frame loops), and
//! * timer-driven, by scheduling a one-shot timer for the window when
//!   [`Debouncer::push`] returns a [`DebounceTicket`] and handing the ticket
//!   back to [`Debouncer::fire`] when it elapses. Stale tickets are ignored,
//!   so only the last write in a burst ever commits.

use std::time::{Duration, Instant};

/// Identifies one [`Debouncer::push`]. Only the newest ticket can commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DebounceTicket(u64);

/// Last-write-wins debounce of a value.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    window: Duration,
    settled: T,
    pending: Option<(T, Instant)>,
    generation: u64,
}

impl<T: Clone> Debouncer<T> {
    pub fn new(initial: T, window: Duration) -> Self {
        Self {
            window,
            settled: initial,
            pending: None,
            generation: 0,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record a new raw value, restarting the quiet period.
    ///
    /// A zero window commits immediately.
    pub fn push(&mut self, value: T, now: Instant) -> DebounceTicket {
        self.generation += 1;
        if self.window.is_zero() {
            self.pending = None;
            self.settled = value;
        } else {
            self.pending = Some((value, now));
        }
        DebounceTicket(self.generation)
    }

    /// Commit the pending value if the window has elapsed since the last push.
    ///
    /// Returns `true` when a value was committed.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.pending {
            Some((_, at)) if now.saturating_duration_since(at) >= self.window => self.commit(),
            _ => false,
        }
    }

    /// Commit the pending value if `ticket` belongs to the most recent push.
    ///
    /// Returns `true` when a value was committed.
    pub fn fire(&mut self, ticket: DebounceTicket) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.commit()
    }

    /// Commit the pending value now, ignoring the window.
    pub fn flush(&mut self) -> bool {
        self.commit()
    }

    /// Replace both raw and effective values, dropping anything pending.
    pub fn reset(&mut self, value: T) {
        self.generation += 1;
        self.pending = None;
        self.settled = value;
    }

    /// The value filtering currently uses.
    pub fn current(&self) -> &T {
        &self.settled
    }

    /// The value most recently pushed, committed or not.
    pub fn latest(&self) -> &T {
        self.pending.as_ref().map_or(&self.settled, |(v, _)| v)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn commit(&mut self) -> bool {
        match self.pending.take() {
            Some((value, _)) => {
                self.settled = value;
                true
            }
            None => false,
        }
    }
}

/// Case-insensitive substring match. An empty needle matches everything.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    if haystack.is_ascii() && needle.is_ascii() {
        return haystack
            .as_bytes()
            .windows(needle.len())
            .any(|w| w.eq_ignore_ascii_case(needle.as_bytes()));
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(300);

    #[test]
    fn burst_commits_once_with_last_value() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(String::new(), WINDOW);

        let mut commits = 0;
        for (i, term) in ["t", "te", "tec", "tech"].iter().enumerate() {
            let now = t0 + Duration::from_millis(50 * i as u64);
            d.push(term.to_string(), now);
            if d.settle(now) {
                commits += 1;
            }
        }
        assert_eq!(d.current(), "");
        assert_eq!(d.latest(), "tech");

        // Not yet: 299ms after the last push.
        assert!(!d.settle(t0 + Duration::from_millis(150 + 299)));
        if d.settle(t0 + Duration::from_millis(150 + 300)) {
            commits += 1;
        }
        assert_eq!(commits, 1);
        assert_eq!(d.current(), "tech");
        assert!(!d.is_pending());
    }

    #[test]
    fn stale_ticket_is_ignored() {
        let now = Instant::now();
        let mut d = Debouncer::new(String::new(), WINDOW);
        let first = d.push("a".into(), now);
        let second = d.push("ab".into(), now);

        assert!(!d.fire(first));
        assert_eq!(d.current(), "");
        assert!(d.fire(second));
        assert_eq!(d.current(), "ab");
        // Firing again after the commit does nothing.
        assert!(!d.fire(second));
    }

    #[test]
    fn zero_window_commits_immediately() {
        let mut d = Debouncer::new(0u32, Duration::ZERO);
        d.push(7, Instant::now());
        assert_eq!(*d.current(), 7);
        assert!(!d.is_pending());
    }

    #[test]
    fn reset_discards_pending() {
        let now = Instant::now();
        let mut d = Debouncer::new(String::new(), WINDOW);
        let ticket = d.push("x".into(), now);
        d.reset("y".into());
        assert!(!d.fire(ticket));
        assert_eq!(d.current(), "y");
        assert_eq!(d.latest(), "y");
    }

    #[test]
    fn flush_skips_the_wait() {
        let mut d = Debouncer::new(String::new(), WINDOW);
        d.push("now".into(), Instant::now());
        assert!(d.flush());
        assert_eq!(d.current(), "now");
    }

    #[test]
    fn contains_ignore_case_ascii_and_unicode() {
        assert!(contains_ignore_case("FinTech Labs", "tech"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("Retail", "tech"));
        assert!(contains_ignore_case("Zürich Ärzte", "ärz"));
        assert!(!contains_ignore_case("ab", "abc"));
    }
}

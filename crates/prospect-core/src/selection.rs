//! Multi-row selection keyed by item id.
//!
//! `SelectionSet` stores ids rather than indices so that a selection
//! survives filtering and scrolling. It never looks at the items itself;
//! callers pass the ids they want selected.

use std::collections::HashSet;
use std::hash::Hash;

use crate::error::EngineError;

/// Set of selected item ids.
#[derive(Debug, Clone)]
pub struct SelectionSet<Id> {
    ids: HashSet<Id>,
}

impl<Id> Default for SelectionSet<Id> {
    fn default() -> Self {
        Self {
            ids: HashSet::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash> SelectionSet<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.ids.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Id> {
        self.ids.iter()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Flip membership of `id`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, id: Id) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    /// Replace the selection with `ids`.
    pub fn replace(&mut self, ids: impl IntoIterator<Item = Id>) {
        self.ids.clear();
        self.ids.extend(ids);
    }

    /// Select all of `ids` when `on`, otherwise clear.
    pub fn select_all(&mut self, on: bool, ids: impl IntoIterator<Item = Id>) {
        if on {
            self.replace(ids);
        } else {
            self.ids.clear();
        }
    }

    /// Replace the selection with the first `n` of `ids`.
    ///
    /// `n` must be in `1..=available`; otherwise the selection is left as
    /// it was and an error is returned.
    pub fn select_first_n(
        &mut self,
        n: usize,
        available: usize,
        ids: impl IntoIterator<Item = Id>,
    ) -> Result<(), EngineError> {
        if n == 0 || n > available {
            return Err(EngineError::InvalidSelectionCount {
                input: n.to_string(),
                available,
            });
        }
        self.replace(ids.into_iter().take(n));
        Ok(())
    }

    /// Keep only ids for which `keep` returns true. Returns how many were dropped.
    pub fn retain(&mut self, mut keep: impl FnMut(&Id) -> bool) -> usize {
        let before = self.ids.len();
        self.ids.retain(|id| keep(id));
        before - self.ids.len()
    }
}

/// Parse user text for a "select first N" request against `available` items.
pub fn parse_count(input: &str, available: usize) -> Result<usize, EngineError> {
    let trimmed = input.trim();
    let invalid = || EngineError::InvalidSelectionCount {
        input: trimmed.to_string(),
        available,
    };
    let n: usize = trimmed.parse().map_err(|_| invalid())?;
    if n == 0 || n > available {
        return Err(invalid());
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores() {
        let mut s = SelectionSet::new();
        assert!(s.toggle(3));
        assert!(s.contains(&3));
        assert!(!s.toggle(3));
        assert!(!s.contains(&3));
        assert!(s.is_empty());
    }

    #[test]
    fn select_all_on_then_off() {
        let mut s = SelectionSet::new();
        s.select_all(true, 0..10);
        assert_eq!(s.len(), 10);
        s.select_all(false, 0..10);
        assert!(s.is_empty());
    }

    #[test]
    fn first_n_replaces_prior_selection() {
        let mut s = SelectionSet::new();
        s.toggle(99);
        s.select_first_n(2, 5, [10, 11, 12, 13, 14]).unwrap();
        let mut ids: Vec<_> = s.iter().copied().collect();
        ids.sort();
        assert_eq!(ids, vec![10, 11]);
    }

    #[test]
    fn first_n_out_of_range_is_noop() {
        let mut s = SelectionSet::new();
        s.toggle(1);
        let err = s.select_first_n(5, 3, [1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidSelectionCount {
                input: "5".into(),
                available: 3
            }
        );
        assert!(s.select_first_n(0, 3, [1, 2, 3]).is_err());
        assert_eq!(s.len(), 1);
        assert!(s.contains(&1));
    }

    #[test]
    fn retain_reports_dropped() {
        let mut s = SelectionSet::new();
        s.replace([1, 2, 3, 4]);
        assert_eq!(s.retain(|id| id % 2 == 0), 2);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn parse_count_validates() {
        assert_eq!(parse_count(" 3 ", 5), Ok(3));
        assert!(parse_count("abc", 5).is_err());
        assert!(parse_count("0", 5).is_err());
        assert!(parse_count("-2", 5).is_err());
        assert!(parse_count("6", 5).is_err());
        assert!(parse_count("", 5).is_err());
    }
}

//! The windowed list engine.
//!
//! [`WindowedList`] owns an ordered collection of items together with the
//! four pieces of state a results pane needs: the debounced search term,
//! the selection, the reveal flags and the options. Rendering code asks it
//! for a [`VisibleSlice`] every frame; the cost of that call depends on the
//! viewport size, not on the number of items.
//!
//! # Example
//!
//! ```rust,ignore
//! use prospect_core::{EngineOptions, Item, ViewportState, WindowedList};
//!
//! let mut list = WindowedList::new(EngineOptions::default())?.with_items(people);
//! list.set_predicate(|p: &Person, term| contains_ignore_case(&p.name, term));
//!
//! let slice = list.compute_visible_slice(&ViewportState::new(0.0, 20.0, 1.0))?;
//! for row in &slice.items {
//!     draw(row.index, row.item);
//! }
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::time::Instant;

use tracing::{debug, warn};

use crate::error::EngineError;
use crate::filter::{DebounceTicket, Debouncer};
use crate::options::{EngineOptions, Windowing};
use crate::reveal::{self, RevealField, RevealState};
use crate::selection::SelectionSet;
use crate::window::{self, ViewportState, WindowRange};

/// Anything with a stable identity can be listed.
pub trait Item {
    /// Stable unique identifier.
    type Id: Clone + Eq + Hash + Debug + Send + 'static;

    fn id(&self) -> Self::Id;
}

/// Filter predicate: `(item, effective_term) -> keep`.
pub type Predicate<T> = Box<dyn Fn(&T, &str) -> bool + Send>;

/// One rendered row: the item and its index in the filtered collection.
#[derive(Debug)]
pub struct VisibleItem<'a, T> {
    pub item: &'a T,
    pub index: usize,
}

/// Rows to render for a viewport plus the layout offsets.
#[derive(Debug)]
pub struct VisibleSlice<'a, T> {
    pub items: Vec<VisibleItem<'a, T>>,
    /// Height of the full scroll track.
    pub total_height: f64,
    /// Translation to apply to the rendered rows.
    pub offset_y: f64,
    /// Index range of `items` within the filtered collection.
    pub range: WindowRange,
    /// Number of items after filtering.
    pub filtered_len: usize,
}

/// Windowed, filterable, selectable list of `T`.
pub struct WindowedList<T: Item> {
    options: EngineOptions,
    items: Vec<T>,
    // Id -> index into `items`; the first occurrence wins.
    positions: HashMap<T::Id, usize>,
    predicate: Option<Predicate<T>>,
    search: Debouncer<String>,
    // Indices into `items` that pass the filter; `None` means no filter applies.
    filtered: Option<Vec<usize>>,
    selection: SelectionSet<T::Id>,
    reveal: RevealState<T::Id>,
}

impl<T: Item> WindowedList<T> {
    /// Create an empty list. Fails if `options` are invalid.
    pub fn new(options: EngineOptions) -> Result<Self, EngineError> {
        options.validate()?;
        Ok(Self {
            search: Debouncer::new(String::new(), options.debounce),
            options,
            items: Vec::new(),
            positions: HashMap::new(),
            predicate: None,
            filtered: None,
            selection: SelectionSet::new(),
            reveal: RevealState::new(),
        })
    }

    /// Builder form of [`set_items`](Self::set_items).
    pub fn with_items(mut self, items: Vec<T>) -> Self {
        self.set_items(items);
        self
    }

    /// Builder form of [`set_predicate`](Self::set_predicate).
    pub fn with_predicate(mut self, predicate: impl Fn(&T, &str) -> bool + Send + 'static) -> Self {
        self.set_predicate(predicate);
        self
    }

    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    // ── Items ──

    /// Replace the source collection, keeping its order.
    ///
    /// Reveal flags are untouched. Selected ids that no longer exist are
    /// dropped unless `prune_selection_on_replace` is off.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.positions.clear();
        for (index, item) in self.items.iter().enumerate() {
            self.positions.entry(item.id()).or_insert(index);
        }
        let mut pruned = 0;
        if self.options.prune_selection_on_replace && !self.selection.is_empty() {
            let positions = &self.positions;
            pruned = self.selection.retain(|id| positions.contains_key(id));
        }
        self.refilter();
        debug!(
            items = self.items.len(),
            filtered = self.filtered_len(),
            pruned,
            "items replaced"
        );
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item of the unfiltered collection by id.
    pub fn get(&self, id: &T::Id) -> Option<&T> {
        self.positions.get(id).map(|&index| &self.items[index])
    }

    // ── Filtering ──

    pub fn set_predicate(&mut self, predicate: impl Fn(&T, &str) -> bool + Send + 'static) {
        self.predicate = Some(Box::new(predicate));
        self.refilter();
    }

    pub fn clear_predicate(&mut self) {
        self.predicate = None;
        self.refilter();
    }

    /// Record a keystroke's worth of search input and restart the debounce
    /// window. Schedule a timer for [`debounce`](EngineOptions::debounce) and
    /// pass the ticket to [`fire_search`](Self::fire_search) when it elapses.
    pub fn set_search_term(&mut self, term: impl Into<String>, now: Instant) -> DebounceTicket {
        let ticket = self.search.push(term.into(), now);
        if !self.search.is_pending() {
            self.refilter();
        }
        ticket
    }

    /// Commit the pending term if the debounce window has passed by `now`.
    pub fn settle_search(&mut self, now: Instant) -> bool {
        let committed = self.search.settle(now);
        if committed {
            self.on_term_committed();
        }
        committed
    }

    /// Commit the pending term if `ticket` is the latest one.
    pub fn fire_search(&mut self, ticket: DebounceTicket) -> bool {
        let committed = self.search.fire(ticket);
        if committed {
            self.on_term_committed();
        }
        committed
    }

    /// Commit the pending term immediately.
    pub fn flush_search(&mut self) -> bool {
        let committed = self.search.flush();
        if committed {
            self.on_term_committed();
        }
        committed
    }

    /// Set raw and effective term at once, cancelling any pending update.
    pub fn reset_search(&mut self, term: impl Into<String>) {
        self.search.reset(term.into());
        self.refilter();
    }

    /// The raw term as last typed.
    pub fn search_term(&self) -> &str {
        self.search.latest()
    }

    /// The term filtering currently uses.
    pub fn effective_term(&self) -> &str {
        self.search.current()
    }

    pub fn is_search_pending(&self) -> bool {
        self.search.is_pending()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered
            .as_ref()
            .map_or(self.items.len(), |indices| indices.len())
    }

    /// Item at `index` of the filtered collection.
    pub fn filtered_item(&self, index: usize) -> Option<&T> {
        match &self.filtered {
            Some(indices) => indices.get(index).map(|&i| &self.items[i]),
            None => self.items.get(index),
        }
    }

    /// Filtered items in source order.
    pub fn filtered(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.filtered_len()).filter_map(move |i| self.filtered_item(i))
    }

    fn on_term_committed(&mut self) {
        self.refilter();
        debug!(
            term = self.effective_term(),
            filtered = self.filtered_len(),
            "search term committed"
        );
    }

    fn refilter(&mut self) {
        let term = self.search.current();
        self.filtered = match &self.predicate {
            Some(predicate) if !term.is_empty() => Some(
                self.items
                    .iter()
                    .enumerate()
                    .filter(|(_, item)| predicate(item, term))
                    .map(|(i, _)| i)
                    .collect(),
            ),
            _ => None,
        };
    }

    // ── Windowing ──

    /// Viewport with this list's configured row height.
    pub fn viewport(&self, scroll_offset: f64, viewport_height: f64) -> ViewportState {
        ViewportState::new(scroll_offset, viewport_height, self.options.item_height)
    }

    /// Rows to render for `viewport`, in filtered order.
    pub fn compute_visible_slice(
        &self,
        viewport: &ViewportState,
    ) -> Result<VisibleSlice<'_, T>, EngineError> {
        let len = self.filtered_len();
        let range = match self.options.windowing {
            Windowing::Virtualized => window::visible_range(len, viewport, self.options.overscan)?,
            Windowing::Full => {
                viewport.validate()?;
                window::full_range(len, viewport.item_height)?
            }
        };
        let items = (range.start..range.end)
            .filter_map(|index| {
                self.filtered_item(index)
                    .map(|item| VisibleItem { item, index })
            })
            .collect();
        Ok(VisibleSlice {
            items,
            total_height: range.total_height,
            offset_y: range.offset_y,
            range,
            filtered_len: len,
        })
    }

    // ── Selection ──

    /// Select every item of the unfiltered collection, or clear.
    pub fn select_all(&mut self, on: bool) {
        self.selection
            .select_all(on, self.items.iter().map(Item::id));
        debug!(on, selected = self.selection.len(), "select all");
    }

    /// Whether every item of the unfiltered collection is selected.
    ///
    /// Ids kept from an earlier collection do not count. An empty list is
    /// never all-selected.
    pub fn all_selected(&self) -> bool {
        !self.items.is_empty()
            && self
                .items
                .iter()
                .all(|item| self.selection.contains(&item.id()))
    }

    /// Flip membership of `id`. Returns `true` if it is now selected.
    pub fn toggle_item(&mut self, id: T::Id) -> bool {
        self.selection.toggle(id)
    }

    /// Replace the selection with the first `n` items of `fallback`.
    ///
    /// An out-of-range `n` leaves the selection unchanged and returns
    /// [`EngineError::InvalidSelectionCount`].
    pub fn select_first_n(&mut self, n: usize, fallback: &[T]) -> Result<(), EngineError> {
        let result = self
            .selection
            .select_first_n(n, fallback.len(), fallback.iter().map(Item::id));
        if let Err(err) = &result {
            warn!(%err, "select first n rejected");
        }
        result
    }

    /// [`select_first_n`](Self::select_first_n) over the filtered collection.
    pub fn select_first_n_filtered(&mut self, n: usize) -> Result<(), EngineError> {
        let len = self.filtered_len();
        let ids: Vec<T::Id> = self.filtered().take(n).map(Item::id).collect();
        let result = self.selection.select_first_n(n, len, ids);
        if let Err(err) = &result {
            warn!(%err, "select first n rejected");
        }
        result
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: &T::Id) -> bool {
        self.selection.contains(id)
    }

    pub fn selection(&self) -> &SelectionSet<T::Id> {
        &self.selection
    }

    /// Selected items in source order.
    pub fn selected_items(&self) -> Vec<&T> {
        self.items
            .iter()
            .filter(|item| self.selection.contains(&item.id()))
            .collect()
    }

    // ── Reveal ──

    /// Flip the reveal flag of `(id, field)`. Returns the new value.
    pub fn toggle_reveal(&mut self, id: T::Id, field: RevealField) -> bool {
        self.reveal.toggle(id, field)
    }

    pub fn is_revealed(&self, id: &T::Id, field: RevealField) -> bool {
        self.reveal.is_revealed(id, field)
    }

    /// `value` as it should be displayed for `(id, field)`.
    pub fn mask(&self, id: &T::Id, field: RevealField, value: &str) -> String {
        reveal::display(
            field,
            value,
            self.is_revealed(id, field),
            self.options.phone_mask,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::contains_ignore_case;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq)]
    struct Company {
        id: u32,
        industry: &'static str,
    }

    impl Item for Company {
        type Id = u32;
        fn id(&self) -> u32 {
            self.id
        }
    }

    fn companies(n: u32) -> Vec<Company> {
        (0..n)
            .map(|id| Company {
                id,
                industry: "Retail",
            })
            .collect()
    }

    fn twelve_with_three_tech() -> Vec<Company> {
        let mut items = companies(12);
        items[1].industry = "FinTech";
        items[5].industry = "Technology";
        items[9].industry = "Biotech";
        items
    }

    fn by_industry(c: &Company, term: &str) -> bool {
        contains_ignore_case(c.industry, term)
    }

    fn list(items: Vec<Company>) -> WindowedList<Company> {
        WindowedList::new(EngineOptions {
            debounce: Duration::ZERO,
            ..EngineOptions::default()
        })
        .unwrap()
        .with_items(items)
    }

    #[test]
    fn unbounded_overscan_yields_rest_of_list() {
        let l = WindowedList::new(EngineOptions {
            overscan: usize::MAX,
            ..EngineOptions::default()
        })
        .unwrap()
        .with_items(companies(10));
        let slice = l.compute_visible_slice(&ViewportState::new(0.0, 5.0, 1.0)).unwrap();
        assert_eq!(slice.items.len(), 10);
    }

    #[test]
    fn invalid_options_rejected() {
        let result = WindowedList::<Company>::new(EngineOptions {
            item_height: -1.0,
            ..EngineOptions::default()
        });
        assert!(matches!(
            result,
            Err(EngineError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn thousand_item_window() {
        let l = list(companies(1000));
        let slice = l
            .compute_visible_slice(&ViewportState::new(800.0, 400.0, 80.0))
            .unwrap();
        let indices: Vec<usize> = slice.items.iter().map(|v| v.index).collect();
        assert_eq!(indices, (10..16).collect::<Vec<_>>());
        assert_eq!(slice.offset_y, 800.0);
        assert_eq!(slice.total_height, 80_000.0);
        assert_eq!(slice.items[0].item.id, 10);
    }

    #[test]
    fn filter_reduces_before_windowing() {
        let mut l = list(twelve_with_three_tech()).with_predicate(by_industry);
        l.set_search_term("tech", Instant::now());
        assert_eq!(l.filtered_len(), 3);

        let slice = l
            .compute_visible_slice(&ViewportState::new(0.0, 10.0, 1.0))
            .unwrap();
        let ids: Vec<u32> = slice.items.iter().map(|v| v.item.id).collect();
        let indices: Vec<usize> = slice.items.iter().map(|v| v.index).collect();
        assert_eq!(ids, vec![1, 5, 9]);
        assert_eq!(indices, vec![0, 1, 2]);
        assert_eq!(slice.total_height, 3.0);
    }

    #[test]
    fn filter_is_idempotent() {
        let mut l = list(twelve_with_three_tech()).with_predicate(by_industry);
        l.set_search_term("tech", Instant::now());
        let first: Vec<Company> = l.filtered().cloned().collect();

        let mut again = list(first.clone()).with_predicate(by_industry);
        again.set_search_term("tech", Instant::now());
        let second: Vec<Company> = again.filtered().cloned().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn no_predicate_or_empty_term_means_unfiltered() {
        let mut l = list(twelve_with_three_tech());
        l.set_search_term("tech", Instant::now());
        assert_eq!(l.filtered_len(), 12);

        l.set_predicate(by_industry);
        assert_eq!(l.filtered_len(), 3);
        l.set_search_term("", Instant::now());
        assert_eq!(l.filtered_len(), 12);
    }

    #[test]
    fn debounced_term_applies_after_window() {
        let t0 = Instant::now();
        let mut l = WindowedList::new(EngineOptions::default())
            .unwrap()
            .with_items(twelve_with_three_tech())
            .with_predicate(by_industry);

        l.set_search_term("te", t0);
        let last = l.set_search_term("tech", t0 + Duration::from_millis(100));
        assert_eq!(l.filtered_len(), 12);
        assert_eq!(l.search_term(), "tech");
        assert_eq!(l.effective_term(), "");

        assert!(!l.settle_search(t0 + Duration::from_millis(200)));
        assert!(l.fire_search(last));
        assert_eq!(l.effective_term(), "tech");
        assert_eq!(l.filtered_len(), 3);
    }

    #[test]
    fn empty_after_filter_is_degenerate() {
        let mut l = list(companies(5)).with_predicate(by_industry);
        l.set_search_term("aerospace", Instant::now());
        let slice = l
            .compute_visible_slice(&ViewportState::new(40.0, 10.0, 2.0))
            .unwrap();
        assert!(slice.items.is_empty());
        assert_eq!(slice.total_height, 0.0);
        assert_eq!(slice.offset_y, 0.0);
    }

    #[test]
    fn bad_viewport_fails() {
        let l = list(companies(5));
        assert!(l
            .compute_visible_slice(&ViewportState::new(0.0, 10.0, 0.0))
            .is_err());
        assert!(l
            .compute_visible_slice(&ViewportState::new(0.0, -3.0, 1.0))
            .is_err());
    }

    #[test]
    fn full_windowing_returns_everything() {
        let l = WindowedList::new(EngineOptions {
            windowing: Windowing::Full,
            ..EngineOptions::default()
        })
        .unwrap()
        .with_items(companies(50));
        let slice = l
            .compute_visible_slice(&ViewportState::new(30.0, 5.0, 1.0))
            .unwrap();
        assert_eq!(slice.items.len(), 50);
        assert_eq!(slice.offset_y, 0.0);
    }

    #[test]
    fn select_all_uses_unfiltered_items() {
        let mut l = list(twelve_with_three_tech()).with_predicate(by_industry);
        l.set_search_term("tech", Instant::now());
        l.select_all(true);
        assert_eq!(l.selection().len(), 12);
        l.select_all(false);
        assert!(l.selection().is_empty());
    }

    #[test]
    fn toggle_round_trip() {
        let mut l = list(companies(3));
        assert!(l.toggle_item(2));
        assert!(l.is_selected(&2));
        assert!(!l.toggle_item(2));
        assert!(!l.is_selected(&2));
    }

    #[test]
    fn select_first_n_bounds() {
        let mut l = list(companies(10));
        let three = companies(3);
        l.toggle_item(7);

        assert!(l.select_first_n(5, &three).is_err());
        assert_eq!(l.selection().len(), 1);
        assert!(l.is_selected(&7));

        l.select_first_n(2, &three).unwrap();
        let ids: Vec<u32> = l.selected_items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn select_first_n_filtered_follows_filter_order() {
        let mut l = list(twelve_with_three_tech()).with_predicate(by_industry);
        l.set_search_term("tech", Instant::now());
        l.select_first_n_filtered(2).unwrap();
        let ids: Vec<u32> = l.selected_items().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 5]);
        assert!(l.select_first_n_filtered(4).is_err());
    }

    #[test]
    fn replacing_items_prunes_stale_selection() {
        let mut l = list(companies(5));
        l.select_all(true);
        l.set_items(companies(2));
        let mut ids: Vec<u32> = l.selection().iter().copied().collect();
        ids.sort();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn pruning_can_be_disabled() {
        let mut l = WindowedList::new(EngineOptions {
            prune_selection_on_replace: false,
            ..EngineOptions::default()
        })
        .unwrap()
        .with_items(companies(5));
        l.select_all(true);
        l.set_items(companies(2));
        assert_eq!(l.selection().len(), 5);
        assert!(l.all_selected());

        l.toggle_item(1);
        l.set_items(companies(3));
        assert!(!l.all_selected());
    }

    #[test]
    fn get_uses_id_index_after_replace() {
        let mut l = list(companies(4));
        assert_eq!(l.get(&3).map(|c| c.id), Some(3));
        l.set_items(companies(2));
        assert!(l.get(&3).is_none());
        assert_eq!(l.get(&1).map(|c| c.id), Some(1));
        assert!(!l.all_selected());
    }

    #[test]
    fn reveal_survives_item_replacement() {
        let mut l = list(companies(2));
        assert!(l.toggle_reveal(1, RevealField::Email));
        l.set_items(companies(1));
        assert!(l.is_revealed(&1, RevealField::Email));
    }

    #[test]
    fn mask_respects_reveal_and_policy() {
        let mut l = list(companies(1));
        assert_eq!(l.mask(&0, RevealField::Email, "ab@cd.com"), "ab***@cd***.com");
        assert_eq!(l.mask(&0, RevealField::Phone, "5551234567"), "555****567");
        l.toggle_reveal(0, RevealField::Phone);
        assert_eq!(l.mask(&0, RevealField::Phone, "5551234567"), "5551234567");
    }
}

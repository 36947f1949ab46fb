//! Result store and selection state machine.

use waylight_types::ResultItem;

/// Observable state of the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    /// No results; the panel is hidden
    Empty,
    /// `len` results with `index` selected
    Listing { len: usize, index: usize },
}

/// Current result set plus a selection that is always in range.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: Vec<ResultItem>,
    selected: usize,
}

impl ResultStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the result set wholesale. Selection goes back to the first item.
    pub fn set_results(&mut self, results: Vec<ResultItem>) -> SelectionState {
        self.results = results;
        self.selected = 0;
        self.state()
    }

    /// Select the next result, saturating at the last one.
    ///
    /// Returns whether the selection moved.
    pub fn move_down(&mut self) -> bool {
        let last = self.results.len().saturating_sub(1);
        let next = (self.selected + 1).min(last);
        self.select(next)
    }

    /// Select the previous result, saturating at the first one.
    pub fn move_up(&mut self) -> bool {
        self.select(self.selected.saturating_sub(1))
    }

    fn select(&mut self, index: usize) -> bool {
        if self.results.is_empty() || index == self.selected {
            return false;
        }
        self.selected = index;
        true
    }

    /// Force the empty state.
    pub fn reset(&mut self) {
        self.results.clear();
        self.selected = 0;
    }

    #[must_use]
    pub fn state(&self) -> SelectionState {
        if self.results.is_empty() {
            SelectionState::Empty
        } else {
            SelectionState::Listing {
                len: self.results.len(),
                index: self.selected,
            }
        }
    }

    #[must_use]
    pub fn results(&self) -> &[ResultItem] {
        &self.results
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Selected index, `None` while empty
    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        (!self.results.is_empty()).then_some(self.selected)
    }

    #[must_use]
    pub fn selected_result(&self) -> Option<&ResultItem> {
        self.results.get(self.selected)
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ResultItem> {
        self.results.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_apps() -> Vec<ResultItem> {
        vec![
            ResultItem::app("Firefox"),
            ResultItem::app("Terminal"),
            ResultItem::app("Files"),
        ]
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = ResultStore::new();
        assert_eq!(store.state(), SelectionState::Empty);
        assert!(store.selected().is_none());
        assert!(store.selected_result().is_none());
    }

    #[test]
    fn test_set_results_selects_first() {
        let mut store = ResultStore::new();
        store.set_results(three_apps());
        store.move_down();
        store.move_down();

        let state = store.set_results(three_apps());
        assert_eq!(state, SelectionState::Listing { len: 3, index: 0 });
    }

    #[test]
    fn test_set_empty_results_is_empty_state() {
        let mut store = ResultStore::new();
        store.set_results(three_apps());
        assert_eq!(store.set_results(vec![]), SelectionState::Empty);
    }

    #[test]
    fn test_move_down_saturates_at_last() {
        let mut store = ResultStore::new();
        store.set_results(three_apps());

        assert!(store.move_down());
        assert!(store.move_down());
        assert!(!store.move_down());
        assert_eq!(store.state(), SelectionState::Listing { len: 3, index: 2 });
        assert_eq!(store.selected_result(), Some(&ResultItem::app("Files")));
    }

    #[test]
    fn test_move_up_saturates_at_first() {
        let mut store = ResultStore::new();
        store.set_results(three_apps());

        assert!(!store.move_up());
        assert_eq!(store.selected(), Some(0));
    }

    #[test]
    fn test_navigation_in_empty_state_is_noop() {
        let mut store = ResultStore::new();
        assert!(!store.move_down());
        assert!(!store.move_up());
        assert_eq!(store.state(), SelectionState::Empty);
    }

    #[test]
    fn test_reset_from_listing() {
        let mut store = ResultStore::new();
        store.set_results(three_apps());
        store.move_down();

        store.reset();
        assert_eq!(store.state(), SelectionState::Empty);
        assert!(store.results().is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn selection_stays_in_range(len in 1usize..12, moves in proptest::collection::vec(any::<bool>(), 0..64)) {
            let mut store = ResultStore::new();
            store.set_results((0..len).map(|i| ResultItem::app(format!("app{i}"))).collect());

            let mut expected = 0usize;
            for down in moves {
                if down {
                    store.move_down();
                    expected = (expected + 1).min(len - 1);
                } else {
                    store.move_up();
                    expected = expected.saturating_sub(1);
                }
                let index = store.selected().unwrap();
                prop_assert!(index < len);
                prop_assert_eq!(index, expected);
            }
        }
    }
}

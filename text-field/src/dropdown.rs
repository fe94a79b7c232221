use crate::lookup::Suggestion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DropdownState {
    #[default]
    Closed,
    Open,
}

/// Suggestion list plus its visibility.
///
/// The active (highlighted) entry is tracked as a single index. It survives
/// closing the list so that a refocus shows the list exactly as it was left.
#[derive(Debug, Default)]
pub(crate) struct Dropdown {
    results: Vec<Suggestion>,
    active_idx: Option<usize>,
    state: DropdownState,
}

impl Dropdown {
    pub(crate) fn state(&self) -> DropdownState {
        self.state
    }

    pub(crate) fn is_open(&self) -> bool {
        self.state == DropdownState::Open
    }

    pub(crate) fn open(&mut self) {
        self.state = DropdownState::Open;
    }

    pub(crate) fn close(&mut self) {
        self.state = DropdownState::Closed;
    }

    pub(crate) fn results(&self) -> &[Suggestion] {
        &self.results
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub(crate) fn get(&self, index: usize) -> Option<&Suggestion> {
        self.results.get(index)
    }

    pub(crate) fn active_idx(&self) -> Option<usize> {
        self.active_idx
    }

    /// Forget the current results. Visibility is left to the caller.
    pub(crate) fn clear(&mut self) {
        self.results.clear();
        self.active_idx = None;
    }

    /// Install a fresh result set with the first entry active.
    pub(crate) fn replace(&mut self, results: Vec<Suggestion>) {
        self.active_idx = if results.is_empty() { None } else { Some(0) };
        self.results = results;
    }

    /// Move the active entry one step up, wrapping to the last entry.
    pub(crate) fn move_up_wrap(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        self.active_idx = Some(match self.active_idx {
            Some(idx) => (idx + len - 1) % len,
            None => len - 1,
        });
    }

    /// Move the active entry one step down, wrapping to the first entry.
    pub(crate) fn move_down_wrap(&mut self) {
        let len = self.results.len();
        if len == 0 {
            return;
        }
        self.active_idx = Some(match self.active_idx {
            Some(idx) => (idx + 1) % len,
            None => 0,
        });
    }
}

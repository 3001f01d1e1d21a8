//! Session view parameters
//!
//! Threshold and sort settings that parameterize the book table and
//! distribution views. Every transition is accepted.

use crate::core::types::SortKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ViewState {
    threshold_secs: i64,
    sort_key: SortKey,
    ascending: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState {
            threshold_secs: 0,
            sort_key: SortKey::TotalReadTime,
            ascending: false,
        }
    }
}

impl ViewState {
    pub(crate) fn threshold_secs(&self) -> i64 {
        self.threshold_secs
    }

    pub(crate) fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub(crate) fn ascending(&self) -> bool {
        self.ascending
    }

    /// Column header click: same column flips direction, a new column starts ascending
    pub(crate) fn select_sort(&mut self, key: SortKey) {
        if key == self.sort_key {
            self.ascending = !self.ascending;
        } else {
            self.sort_key = key;
            self.ascending = true;
        }
    }

    pub(crate) fn set_ascending(&mut self, ascending: bool) {
        self.ascending = ascending;
    }

    /// Minimum-duration slider, in minutes; negative input counts as zero
    pub(crate) fn set_min_minutes(&mut self, minutes: i64) {
        self.threshold_secs = minutes.max(0).saturating_mul(60);
    }
}

//! Packing Progress

use std::collections::BTreeMap;

use crate::model::{PackingItem, SharedPackingItem};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackingProgress {
    pub checked: usize,
    pub total: usize,
    pub percent: u32,
}

impl PackingProgress {
    pub fn new(checked: usize, total: usize) -> Self {
        let percent = if total == 0 {
            0
        } else {
            let rounded = ((checked * 100 + total / 2) / total) as u32;
            // 199/200 rounds to 100 but the list is not done yet
            if checked < total { rounded.min(99) } else { 100 }
        };
        Self { checked, total, percent }
    }

    /// Progress over the fixed per-category list plus family-added items
    pub fn of(list: &BTreeMap<String, Vec<PackingItem>>, shared: &[SharedPackingItem]) -> Self {
        let fixed = list.values().flatten();
        let checked = fixed.clone().filter(|i| i.checked).count() + shared.iter().filter(|i| i.checked).count();
        let total = fixed.count() + shared.len();
        Self::new(checked, total)
    }

    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.checked == self.total
    }
}

/// Progress of a single category
pub fn category_progress(items: &[PackingItem]) -> PackingProgress {
    PackingProgress::new(items.iter().filter(|i| i.checked).count(), items.len())
}

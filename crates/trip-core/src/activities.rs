//! Activity Filtering & Pagination
//!
//! Category filter is exact equality, time filter buckets travel minutes,
//! and the pager reveals the filtered list in batches of `PAGE_SIZE`.

use std::collections::HashSet;

use crate::model::Activity;

/// Batch size for "load more"
pub const PAGE_SIZE: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Exact(String),
}

impl CategoryFilter {
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "" | "all" => CategoryFilter::All,
            other => CategoryFilter::Exact(other.to_string()),
        }
    }

    pub fn key(&self) -> &str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Exact(category) => category,
        }
    }

    pub fn matches(&self, activity: &Activity) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(category) => activity.category == *category,
        }
    }
}

/// Travel-time bucket
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeFilter {
    #[default]
    All,
    /// `time <= 20`
    UpTo20,
    /// `20 < time <= 40`
    UpTo40,
    /// `time > 40`
    Over40,
}

impl TimeFilter {
    pub const ALL: [TimeFilter; 4] = [TimeFilter::All, TimeFilter::UpTo20, TimeFilter::UpTo40, TimeFilter::Over40];

    pub fn from_key(key: &str) -> Self {
        match key {
            "20" => TimeFilter::UpTo20,
            "40" => TimeFilter::UpTo40,
            "40+" => TimeFilter::Over40,
            _ => TimeFilter::All,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            TimeFilter::All => "all",
            TimeFilter::UpTo20 => "20",
            TimeFilter::UpTo40 => "40",
            TimeFilter::Over40 => "40+",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFilter::All => "כל הזמנים",
            TimeFilter::UpTo20 => "עד 20 דקות",
            TimeFilter::UpTo40 => "21-40 דקות",
            TimeFilter::Over40 => "מעל 40 דקות",
        }
    }

    /// Records without a parseable time only pass `All`
    pub fn matches(&self, activity: &Activity) -> bool {
        if *self == TimeFilter::All {
            return true;
        }
        let Some(minutes) = activity.travel_minutes() else {
            return false;
        };
        match self {
            TimeFilter::All => true,
            TimeFilter::UpTo20 => minutes <= 20,
            TimeFilter::UpTo40 => minutes > 20 && minutes <= 40,
            TimeFilter::Over40 => minutes > 40,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityFilters {
    pub category: CategoryFilter,
    pub time: TimeFilter,
}

impl ActivityFilters {
    pub fn apply<'a>(&self, activities: &'a [Activity]) -> Vec<&'a Activity> {
        activities
            .iter()
            .filter(|a| self.category.matches(a) && self.time.matches(a))
            .collect()
    }
}

/// Distinct categories in order of first appearance
pub fn categories(activities: &[Activity]) -> Vec<String> {
    let mut seen = HashSet::new();
    activities
        .iter()
        .filter(|a| !a.category.is_empty())
        .filter(|a| seen.insert(a.category.clone()))
        .map(|a| a.category.clone())
        .collect()
}

/// Outcome of a "load more" click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStep {
    /// Cursor moved from `from` to `to` visible records
    Revealed { from: usize, to: usize },
    /// Everything cached is already visible; more must be generated
    NeedsGeneration,
}

/// Pagination cursor over the filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    shown: usize,
}

impl Default for Pager {
    fn default() -> Self {
        Self { shown: PAGE_SIZE }
    }
}

impl Pager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the first batch (filters changed)
    pub fn reset(&mut self) {
        self.shown = PAGE_SIZE;
    }

    pub fn visible_count(&self, total: usize) -> usize {
        self.shown.min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.shown < total
    }

    pub fn load_more(&mut self, total: usize) -> PageStep {
        let from = self.visible_count(total);
        if from >= total {
            // Keep the cursor on the real list length so generated items
            // start a fresh batch
            self.shown = total;
            return PageStep::NeedsGeneration;
        }
        self.shown = (from + PAGE_SIZE).min(total);
        PageStep::Revealed { from, to: self.shown }
    }
}

/// Merge AI-generated activities: drop names already present, tag as
/// generated and give each an id. Returns the records actually added.
pub fn merge_generated(existing: &mut Vec<Activity>, generated: Vec<Activity>, id_seed: i64) -> Vec<Activity> {
    let mut names: HashSet<String> = existing.iter().map(|a| a.name.trim().to_lowercase()).collect();
    let mut added = Vec::new();
    for (i, mut activity) in generated.into_iter().enumerate() {
        let key = activity.name.trim().to_lowercase();
        if key.is_empty() || !names.insert(key) {
            continue;
        }
        if activity.id.is_empty() {
            activity.id = format!("gen-{}-{}", id_seed, i);
        }
        activity.generated = Some(true);
        added.push(activity.clone());
        existing.push(activity);
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(name: &str, category: &str, time: &str) -> Activity {
        Activity {
            id: name.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            time: time.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<Activity> {
        vec![
            activity("Boréal", "קפה", "10 דקות"),
            activity("Jet d'Eau", "אטרקציות", "20"),
            activity("Café du Soleil", "קפה", "25 דקות"),
            activity("CERN", "מדע", "40"),
            activity("Salève", "טבע", "55 דקות"),
            activity("Mystery", "קפה", "לא ידוע"),
        ]
    }

    #[test]
    fn test_category_filter_is_exact() {
        let data = sample();
        let filters = ActivityFilters { category: CategoryFilter::from_key("קפה"), ..Default::default() };
        let result = filters.apply(&data);
        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|a| a.category == "קפה"));

        let partial = ActivityFilters { category: CategoryFilter::from_key("קפ"), ..Default::default() };
        assert!(partial.apply(&data).is_empty());
    }

    #[test]
    fn test_time_buckets() {
        let data = sample();
        let names = |time: TimeFilter| -> Vec<String> {
            ActivityFilters { time, ..Default::default() }
                .apply(&data)
                .iter()
                .map(|a| a.name.clone())
                .collect()
        };
        assert_eq!(names(TimeFilter::from_key("20")), vec!["Boréal", "Jet d'Eau"]);
        assert_eq!(names(TimeFilter::from_key("40")), vec!["Café du Soleil", "CERN"]);
        assert_eq!(names(TimeFilter::from_key("40+")), vec!["Salève"]);
        assert_eq!(names(TimeFilter::from_key("all")).len(), 6);
    }

    #[test]
    fn test_filters_combine() {
        let data = sample();
        let filters = ActivityFilters {
            category: CategoryFilter::Exact("קפה".into()),
            time: TimeFilter::UpTo40,
        };
        let result = filters.apply(&data);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].name, "Café du Soleil");
    }

    #[test]
    fn test_categories_in_first_seen_order() {
        assert_eq!(categories(&sample()), vec!["קפה", "אטרקציות", "מדע", "טבע"]);
    }

    #[test]
    fn test_pager_steps_of_six() {
        let mut pager = Pager::new();
        let total = 14;
        assert_eq!(pager.visible_count(total), 6);
        assert_eq!(pager.load_more(total), PageStep::Revealed { from: 6, to: 12 });
        assert_eq!(pager.load_more(total), PageStep::Revealed { from: 12, to: 14 });
        assert_eq!(pager.visible_count(total), 14);
        assert_eq!(pager.load_more(total), PageStep::NeedsGeneration);
        assert_eq!(pager.visible_count(total), 14);

        // Six generated records arrive
        assert_eq!(pager.load_more(20), PageStep::Revealed { from: 14, to: 20 });
    }

    #[test]
    fn test_pager_never_exceeds_list() {
        for total in 0..30 {
            let mut pager = Pager::new();
            loop {
                let before = pager.visible_count(total);
                match pager.load_more(total) {
                    PageStep::Revealed { from, to } => {
                        assert_eq!(from, before);
                        assert!(to <= total);
                        assert!(to - from <= PAGE_SIZE && to > from);
                    }
                    PageStep::NeedsGeneration => {
                        assert_eq!(pager.visible_count(total), total);
                        break;
                    }
                }
            }
        }
    }

    #[test]
    fn test_short_list_goes_straight_to_generation() {
        let mut pager = Pager::new();
        assert!(!pager.has_more(4));
        assert_eq!(pager.load_more(4), PageStep::NeedsGeneration);
    }

    #[test]
    fn test_merge_generated_skips_duplicates() {
        let mut existing = sample();
        let generated = vec![
            activity("cern", "מדע", "40"),
            Activity { name: "Patek Philippe Museum".into(), category: "מוזיאונים".into(), ..Default::default() },
            Activity { name: "  ".into(), ..Default::default() },
        ];
        let added = merge_generated(&mut existing, generated, 42);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].id, "gen-42-1");
        assert_eq!(added[0].generated, Some(true));
        assert_eq!(existing.len(), 7);
    }
}

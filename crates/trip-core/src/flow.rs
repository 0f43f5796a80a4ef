//! Flow / Feedback State
//!
//! Two small state machines behind the spinner and the toasts:
//! - `LoadingTracker`: set of active loading tokens; spinner shows iff non-empty
//! - `FeedbackQueue`: FIFO of toasts presented one at a time by a single drain loop
//!
//! The browser side owns the timers; these types only decide what is visible.

use std::collections::{BTreeMap, VecDeque};

/// Pause between two toasts
pub const INTER_ITEM_DELAY_MS: u32 = 300;

/// Opaque handle returned by `LoadingTracker::show`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadingToken(String);

impl LoadingToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingTracker {
    active: BTreeMap<LoadingToken, (u64, String)>,
    counter: u64,
}

impl LoadingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loading operation and return its token
    pub fn show(&mut self, context: &str, message: &str) -> LoadingToken {
        self.counter += 1;
        let token = LoadingToken(format!("{}-{}", context, self.counter));
        self.active.insert(token.clone(), (self.counter, message.to_string()));
        token
    }

    /// Drop a token; unknown or already hidden tokens are ignored
    pub fn hide(&mut self, token: &LoadingToken) {
        self.active.remove(token);
    }

    pub fn is_spinner_visible(&self) -> bool {
        !self.active.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Message of the most recently started operation still running
    pub fn message(&self) -> Option<&str> {
        self.active
            .values()
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, message)| message.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedbackKind {
    Success,
    Error,
    Warning,
    Info,
    Celebration,
}

impl FeedbackKind {
    pub fn default_duration_ms(&self) -> u32 {
        match self {
            FeedbackKind::Success | FeedbackKind::Info => 3000,
            FeedbackKind::Warning | FeedbackKind::Celebration => 4000,
            FeedbackKind::Error => 5000,
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            FeedbackKind::Success => "toast success",
            FeedbackKind::Error => "toast error",
            FeedbackKind::Warning => "toast warning",
            FeedbackKind::Info => "toast info",
            FeedbackKind::Celebration => "toast celebration",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            FeedbackKind::Success => "✅",
            FeedbackKind::Error => "❌",
            FeedbackKind::Warning => "⚠️",
            FeedbackKind::Info => "ℹ️",
            FeedbackKind::Celebration => "🎉",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackOptions {
    pub duration_ms: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feedback {
    pub id: u64,
    pub kind: FeedbackKind,
    pub message: String,
    pub duration_ms: u32,
}

/// Serialized toast queue
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackQueue {
    pending: VecDeque<Feedback>,
    visible: Option<Feedback>,
    is_processing: bool,
    next_id: u64,
}

impl FeedbackQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, kind: FeedbackKind, message: &str, options: FeedbackOptions) -> u64 {
        self.next_id += 1;
        self.pending.push_back(Feedback {
            id: self.next_id,
            kind,
            message: message.to_string(),
            duration_ms: options.duration_ms.unwrap_or_else(|| kind.default_duration_ms()),
        });
        self.next_id
    }

    /// Claim the drain loop. Returns false when a loop is already running,
    /// in which case the caller must not start another one.
    pub fn try_begin(&mut self) -> bool {
        if self.is_processing {
            return false;
        }
        self.is_processing = true;
        true
    }

    /// Put the next entry on screen. Returns `None` (and releases the loop)
    /// when the queue is drained.
    pub fn present_next(&mut self) -> Option<Feedback> {
        debug_assert!(self.visible.is_none(), "previous toast still visible");
        match self.pending.pop_front() {
            Some(entry) => {
                self.visible = Some(entry.clone());
                Some(entry)
            }
            None => {
                self.is_processing = false;
                None
            }
        }
    }

    /// Take the visible toast off screen (timeout or click)
    pub fn dismiss(&mut self, id: u64) -> bool {
        if self.visible.as_ref().map(|f| f.id) == Some(id) {
            self.visible = None;
            true
        } else {
            false
        }
    }

    pub fn is_visible(&self, id: u64) -> bool {
        self.visible.as_ref().map(|f| f.id) == Some(id)
    }

    pub fn visible(&self) -> Option<&Feedback> {
        self.visible.as_ref()
    }

    pub fn is_processing(&self) -> bool {
        self.is_processing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_tracks_tokens() {
        let mut tracker = LoadingTracker::new();
        assert!(!tracker.is_spinner_visible());

        let a = tracker.show("upload", "מעלה תמונות...");
        let b = tracker.show("ai", "חושב...");
        assert!(tracker.is_spinner_visible());
        assert_eq!(tracker.message(), Some("חושב..."));

        tracker.hide(&b);
        assert!(tracker.is_spinner_visible());
        assert_eq!(tracker.message(), Some("מעלה תמונות..."));

        tracker.hide(&b);
        assert_eq!(tracker.active_count(), 1);

        tracker.hide(&a);
        assert!(!tracker.is_spinner_visible());
        assert_eq!(tracker.message(), None);
    }

    #[test]
    fn test_spinner_visible_iff_tokens_for_interleavings() {
        // Every order of closing three overlapping operations
        let orders = [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]];
        for order in orders {
            let mut tracker = LoadingTracker::new();
            let tokens: Vec<_> = (0..3).map(|i| tracker.show("op", &format!("op {}", i))).collect();
            for (closed, idx) in order.iter().enumerate() {
                tracker.hide(&tokens[*idx]);
                assert_eq!(tracker.is_spinner_visible(), closed < 2);
                assert_eq!(tracker.is_spinner_visible(), tracker.active_count() > 0);
            }
        }
    }

    #[test]
    fn test_tokens_are_unique() {
        let mut tracker = LoadingTracker::new();
        let a = tracker.show("ai", "x");
        let b = tracker.show("ai", "x");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("ai-"));
    }

    #[test]
    fn test_feedback_fifo_one_at_a_time() {
        let mut queue = FeedbackQueue::new();
        queue.enqueue(FeedbackKind::Success, "first", FeedbackOptions::default());
        queue.enqueue(FeedbackKind::Error, "second", FeedbackOptions::default());
        queue.enqueue(FeedbackKind::Info, "third", FeedbackOptions { duration_ms: Some(10) });

        assert!(queue.try_begin());
        let mut seen = Vec::new();
        while let Some(entry) = queue.present_next() {
            assert!(queue.is_visible(entry.id));
            assert_eq!(queue.visible().map(|f| f.id), Some(entry.id));
            seen.push((entry.message.clone(), entry.duration_ms));
            assert!(queue.dismiss(entry.id));
            assert!(queue.visible().is_none());
        }
        assert_eq!(
            seen,
            vec![("first".to_string(), 3000), ("second".to_string(), 5000), ("third".to_string(), 10)]
        );
        assert!(!queue.is_processing());
    }

    #[test]
    fn test_drain_loop_not_reentered() {
        let mut queue = FeedbackQueue::new();
        queue.enqueue(FeedbackKind::Warning, "a", FeedbackOptions::default());
        assert!(queue.try_begin());
        // A second show_feedback while draining must not start another loop
        queue.enqueue(FeedbackKind::Warning, "b", FeedbackOptions::default());
        assert!(!queue.try_begin());

        let a = queue.present_next().unwrap();
        assert!(!queue.try_begin());
        queue.dismiss(a.id);
        let b = queue.present_next().unwrap();
        assert_eq!(b.message, "b");
        queue.dismiss(b.id);
        assert!(queue.present_next().is_none());
        // Loop released, next enqueue may start a new one
        assert!(queue.try_begin());
    }

    #[test]
    fn test_dismiss_ignores_stale_ids() {
        let mut queue = FeedbackQueue::new();
        let id = queue.enqueue(FeedbackKind::Celebration, "🎉", FeedbackOptions::default());
        assert!(queue.try_begin());
        let shown = queue.present_next().unwrap();
        assert_eq!(shown.duration_ms, 4000);
        assert!(!queue.dismiss(id + 1));
        assert!(queue.dismiss(id));
        assert!(!queue.dismiss(id));
    }
}

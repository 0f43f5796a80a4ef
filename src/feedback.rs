//! Flow/Feedback Manager
//!
//! Loading spinner plus a serialized toast queue. The spinner is shown while
//! any loading token is active. Toasts are presented one at a time, FIFO,
//! by a single drain loop with a fixed gap between items.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use trip_core::ai::AiErrorKind;
use trip_core::flow::{
    Feedback, FeedbackKind, FeedbackOptions, FeedbackQueue, LoadingToken, LoadingTracker, INTER_ITEM_DELAY_MS,
};

/// Granularity of the "clicked away early" check
const DISMISS_POLL_MS: u32 = 100;

#[derive(Clone, Copy)]
pub struct Flow {
    loading: RwSignal<LoadingTracker>,
    queue: RwSignal<FeedbackQueue>,
}

impl Flow {
    pub fn new() -> Self {
        Self {
            loading: RwSignal::new(LoadingTracker::new()),
            queue: RwSignal::new(FeedbackQueue::new()),
        }
    }

    // ========================
    // Loading
    // ========================

    pub fn show_loading(&self, context: &str, message: &str) -> LoadingToken {
        web_sys::console::log_1(&format!("[FLOW] loading {}: {}", context, message).into());
        self.loading.write().show(context, message)
    }

    pub fn hide_loading(&self, token: &LoadingToken) {
        self.loading.update(|tracker| tracker.hide(token));
    }

    pub fn is_spinner_visible(&self) -> bool {
        self.loading.with(|tracker| tracker.is_spinner_visible())
    }

    pub fn loading_message(&self) -> Option<String> {
        self.loading.with(|tracker| tracker.message().map(str::to_string))
    }

    // ========================
    // Feedback
    // ========================

    pub fn show_feedback(&self, kind: FeedbackKind, message: &str, options: FeedbackOptions) {
        self.queue.update(|queue| {
            queue.enqueue(kind, message, options);
        });
        self.start_drain();
    }

    pub fn success(&self, message: &str) {
        self.show_feedback(FeedbackKind::Success, message, FeedbackOptions::default());
    }

    pub fn info(&self, message: &str) {
        self.show_feedback(FeedbackKind::Info, message, FeedbackOptions::default());
    }

    pub fn warning(&self, message: &str) {
        self.show_feedback(FeedbackKind::Warning, message, FeedbackOptions::default());
    }

    pub fn error(&self, message: &str) {
        web_sys::console::error_1(&format!("[FLOW] {}", message).into());
        self.show_feedback(FeedbackKind::Error, message, FeedbackOptions::default());
    }

    pub fn celebration(&self, message: &str) {
        self.show_feedback(FeedbackKind::Celebration, message, FeedbackOptions::default());
    }

    /// Report a failed AI call with friendly copy for its class of error
    pub fn ai_error(&self, raw: &str) {
        web_sys::console::error_1(&format!("[AI] {}", raw).into());
        let kind = AiErrorKind::classify(raw);
        self.show_feedback(FeedbackKind::Error, kind.friendly_message(), FeedbackOptions::default());
    }

    /// Toast currently on screen
    pub fn visible(&self) -> Option<Feedback> {
        self.queue.with(|queue| queue.visible().cloned())
    }

    /// Click on the toast
    pub fn dismiss_visible(&self) {
        self.queue.update(|queue| {
            if let Some(id) = queue.visible().map(|f| f.id) {
                queue.dismiss(id);
            }
        });
    }

    fn start_drain(&self) {
        let mut claimed = false;
        self.queue.update(|queue| claimed = queue.try_begin());
        if !claimed {
            return;
        }
        let queue = self.queue;
        spawn_local(async move {
            loop {
                let mut next = None;
                queue.update(|q| next = q.present_next());
                let Some(entry) = next else {
                    break;
                };
                // Wait out the duration unless the toast is clicked away first
                let mut waited = 0;
                while waited < entry.duration_ms && queue.with_untracked(|q| q.is_visible(entry.id)) {
                    TimeoutFuture::new(DISMISS_POLL_MS).await;
                    waited += DISMISS_POLL_MS;
                }
                queue.update(|q| {
                    q.dismiss(entry.id);
                });
                TimeoutFuture::new(INTER_ITEM_DELAY_MS).await;
            }
        });
    }
}

/// Get the flow manager from context
pub fn use_flow() -> Flow {
    expect_context::<Flow>()
}

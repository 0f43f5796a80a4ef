//! Frontend Models
//!
//! Trip records come from `trip-core`; this module adds the view-only
//! types the shell needs.

pub use trip_core::activities::{ActivityFilters, CategoryFilter, Pager, TimeFilter};
pub use trip_core::config::ClientConfig;
pub use trip_core::model::{
    Activity, BulletinPost, ChatMessage, ChatRole, CustomPlan, DayEntry, Luggage, Memory, PackingItem, Photo, Plan,
    PlanChoice, PlanItem, SharedPackingItem, TripData,
};

/// Top-level page section
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Section {
    #[default]
    Itinerary,
    Activities,
    Packing,
    Gallery,
    Family,
    Luggage,
    Assistant,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Itinerary,
        Section::Activities,
        Section::Packing,
        Section::Gallery,
        Section::Family,
        Section::Luggage,
        Section::Assistant,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Itinerary => "itinerary",
            Section::Activities => "activities",
            Section::Packing => "packing",
            Section::Gallery => "gallery",
            Section::Family => "family",
            Section::Luggage => "luggage",
            Section::Assistant => "assistant",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.key() == key)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Itinerary => "מסלול",
            Section::Activities => "אטרקציות",
            Section::Packing => "רשימת ציוד",
            Section::Gallery => "אלבום",
            Section::Family => "לוח משפחתי",
            Section::Luggage => "מזוודות",
            Section::Assistant => "עוזר AI",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Section::Itinerary => "🗓️",
            Section::Activities => "🎡",
            Section::Packing => "🎒",
            Section::Gallery => "📸",
            Section::Family => "📌",
            Section::Luggage => "🧳",
            Section::Assistant => "🤖",
        }
    }
}

/// What the modal is showing
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Photo { url: String, caption: String },
    Activity { id: String },
    /// AI reply (markdown), optionally tied to a day
    Answer { title: String, text: String, day: Option<u32> },
}

//! Delegated Event Dispatch
//!
//! One click, one change and one keydown listener sit on the document body.
//! Each event is reduced to a single `Action` (or nothing) by looking at the
//! target element and its ancestors, then routed through an `ActionMap` that
//! holds at most one handler per `ActionKind`.
//!
//! The DOM side only has to produce `ElementSnapshot`s and implement
//! `EventRoot`; resolution and the double-registration guard live here.

use std::collections::{BTreeMap, HashMap};

/// Attribute set on the root once listeners are attached
pub const MARKER_ATTRIBUTE: &str = "data-dispatcher-attached";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
    Keydown,
}

impl EventKind {
    pub const ALL: [EventKind; 3] = [EventKind::Click, EventKind::Change, EventKind::Keydown];

    /// DOM event type name
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
            EventKind::Keydown => "keydown",
        }
    }
}

/// What a handler can be asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionKind {
    // Navigation and chrome
    ShowSection,
    ToggleMobileMenu,
    CloseMobileMenu,
    OpenModal,
    CloseModal,
    DismissToast,
    // Activities
    FilterCategory,
    FilterTime,
    LoadMoreActivities,
    // Itinerary
    SelectPlan,
    AskAiForDay,
    // Packing
    TogglePacking,
    ToggleSharedPacking,
    AddSharedPacking,
    RemoveSharedPacking,
    ResetPacking,
    // Photos
    UploadPhotos,
    OpenPhoto,
    DeletePhoto,
    // Family board
    PostBulletin,
    DeleteBulletin,
    AddMemory,
    // Luggage
    AddLuggage,
    RemoveLuggage,
    AnalyzeLuggage,
    // AI
    SendChat,
    ClearChat,
    AskAi,
    SaveCustomPlan,
    DeleteCustomPlan,
}

impl ActionKind {
    pub const ALL: [ActionKind; 30] = [
        ActionKind::ShowSection,
        ActionKind::ToggleMobileMenu,
        ActionKind::CloseMobileMenu,
        ActionKind::OpenModal,
        ActionKind::CloseModal,
        ActionKind::DismissToast,
        ActionKind::FilterCategory,
        ActionKind::FilterTime,
        ActionKind::LoadMoreActivities,
        ActionKind::SelectPlan,
        ActionKind::AskAiForDay,
        ActionKind::TogglePacking,
        ActionKind::ToggleSharedPacking,
        ActionKind::AddSharedPacking,
        ActionKind::RemoveSharedPacking,
        ActionKind::ResetPacking,
        ActionKind::UploadPhotos,
        ActionKind::OpenPhoto,
        ActionKind::DeletePhoto,
        ActionKind::PostBulletin,
        ActionKind::DeleteBulletin,
        ActionKind::AddMemory,
        ActionKind::AddLuggage,
        ActionKind::RemoveLuggage,
        ActionKind::AnalyzeLuggage,
        ActionKind::SendChat,
        ActionKind::ClearChat,
        ActionKind::AskAi,
        ActionKind::SaveCustomPlan,
        ActionKind::DeleteCustomPlan,
    ];

    /// Tag written into `data-action`
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ShowSection => "show-section",
            ActionKind::ToggleMobileMenu => "toggle-mobile-menu",
            ActionKind::CloseMobileMenu => "close-mobile-menu",
            ActionKind::OpenModal => "open-modal",
            ActionKind::CloseModal => "close-modal",
            ActionKind::DismissToast => "dismiss-toast",
            ActionKind::FilterCategory => "filter-category",
            ActionKind::FilterTime => "filter-time",
            ActionKind::LoadMoreActivities => "load-more-activities",
            ActionKind::SelectPlan => "select-plan",
            ActionKind::AskAiForDay => "ask-ai-for-day",
            ActionKind::TogglePacking => "toggle-packing",
            ActionKind::ToggleSharedPacking => "toggle-shared-packing",
            ActionKind::AddSharedPacking => "add-shared-packing",
            ActionKind::RemoveSharedPacking => "remove-shared-packing",
            ActionKind::ResetPacking => "reset-packing",
            ActionKind::UploadPhotos => "upload-photos",
            ActionKind::OpenPhoto => "open-photo",
            ActionKind::DeletePhoto => "delete-photo",
            ActionKind::PostBulletin => "post-bulletin",
            ActionKind::DeleteBulletin => "delete-bulletin",
            ActionKind::AddMemory => "add-memory",
            ActionKind::AddLuggage => "add-luggage",
            ActionKind::RemoveLuggage => "remove-luggage",
            ActionKind::AnalyzeLuggage => "analyze-luggage",
            ActionKind::SendChat => "send-chat",
            ActionKind::ClearChat => "clear-chat",
            ActionKind::AskAi => "ask-ai",
            ActionKind::SaveCustomPlan => "save-custom-plan",
            ActionKind::DeleteCustomPlan => "delete-custom-plan",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == tag)
    }
}

/// Elements known by id
const ID_ACTIONS: &[(&str, ActionKind)] = &[
    ("mobile-menu-btn", ActionKind::ToggleMobileMenu),
    ("load-more-activities", ActionKind::LoadMoreActivities),
    ("send-chat-btn", ActionKind::SendChat),
    ("clear-chat-btn", ActionKind::ClearChat),
    ("ask-ai-btn", ActionKind::AskAi),
    ("save-ai-plan-btn", ActionKind::SaveCustomPlan),
    ("post-bulletin-btn", ActionKind::PostBulletin),
    ("add-memory-btn", ActionKind::AddMemory),
    ("add-luggage-btn", ActionKind::AddLuggage),
    ("add-packing-item-btn", ActionKind::AddSharedPacking),
    ("reset-packing-btn", ActionKind::ResetPacking),
    ("photo-upload-input", ActionKind::UploadPhotos),
    ("packing-photo-input", ActionKind::UploadPhotos),
    ("luggage-photo-input", ActionKind::AnalyzeLuggage),
];

/// Elements known by class, most specific first
const CLASS_ACTIONS: &[(&str, ActionKind)] = &[
    ("time-filter-btn", ActionKind::FilterTime),
    ("filter-btn", ActionKind::FilterCategory),
    ("nav-link", ActionKind::ShowSection),
    ("plan-tab", ActionKind::SelectPlan),
    ("photo-item", ActionKind::OpenPhoto),
    ("modal-close", ActionKind::CloseModal),
    ("modal-backdrop", ActionKind::CloseModal),
    ("toast", ActionKind::DismissToast),
    ("packing-checkbox", ActionKind::TogglePacking),
    ("shared-packing-checkbox", ActionKind::ToggleSharedPacking),
];

/// DOM-free view of one element on the event path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSnapshot {
    /// Lowercase tag name
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    /// `dataset` entries (camelCase keys)
    pub dataset: BTreeMap<String, String>,
    pub value: Option<String>,
    pub checked: Option<bool>,
    pub disabled: bool,
}

impl ElementSnapshot {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Part of the fixed set of things a click can land on. Form fields
    /// report through `change` instead, so a click on them never resolves.
    pub fn is_interactive(&self) -> bool {
        if self.is_form_field() {
            return false;
        }
        self.tag == "button" || self.has_class("photo-item") || self.dataset.contains_key("action")
    }

    fn is_form_field(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea")
    }

    /// Single action tag for this element: `data-action`, then id, then class
    pub fn action_kind(&self) -> Option<ActionKind> {
        if let Some(tag) = self.dataset.get("action") {
            return ActionKind::from_tag(tag);
        }
        if let Some(id) = &self.id {
            if let Some((_, kind)) = ID_ACTIONS.iter().find(|(known, _)| known == id) {
                return Some(*kind);
            }
        }
        CLASS_ACTIONS
            .iter()
            .find(|(class, _)| self.has_class(class))
            .map(|(_, kind)| *kind)
    }
}

/// `dataset` key for an attribute name: `data-enter-action` → `enterAction`
pub fn dataset_key(attribute: &str) -> Option<String> {
    let rest = attribute.strip_prefix("data-")?;
    if rest.is_empty() {
        return None;
    }
    let mut key = String::with_capacity(rest.len());
    let mut upper = false;
    for c in rest.chars() {
        if c == '-' {
            upper = true;
        } else if upper {
            key.extend(c.to_uppercase());
            upper = false;
        } else {
            key.push(c);
        }
    }
    Some(key)
}

/// A resolved action with the data of the element it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub kind: ActionKind,
    pub element_id: Option<String>,
    pub dataset: BTreeMap<String, String>,
    pub value: Option<String>,
    pub checked: Option<bool>,
}

impl Action {
    pub fn new(kind: ActionKind) -> Self {
        Self {
            kind,
            element_id: None,
            dataset: BTreeMap::new(),
            value: None,
            checked: None,
        }
    }

    fn from_element(kind: ActionKind, element: &ElementSnapshot) -> Self {
        Self {
            kind,
            element_id: element.id.clone(),
            dataset: element.dataset.clone(),
            value: element.value.clone(),
            checked: element.checked,
        }
    }

    pub fn data(&self, key: &str) -> Option<&str> {
        self.dataset.get(key).map(String::as_str)
    }

    pub fn data_index(&self, key: &str) -> Option<usize> {
        self.data(key).and_then(|v| v.parse().ok())
    }
}

/// Key information for keydown resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInfo<'a> {
    pub key: &'a str,
    pub shift: bool,
}

/// Reduce an event to at most one action.
///
/// `path` starts at the event target and walks up to the root.
pub fn resolve(kind: EventKind, path: &[ElementSnapshot], key: Option<KeyInfo<'_>>) -> Option<Action> {
    match kind {
        EventKind::Click => {
            let element = path.iter().find(|el| el.is_interactive())?;
            if element.disabled {
                return None;
            }
            element.action_kind().map(|k| Action::from_element(k, element))
        }
        EventKind::Change => {
            let target = path.first()?;
            target.action_kind().map(|k| Action::from_element(k, target))
        }
        EventKind::Keydown => {
            let key = key?;
            if key.key == "Escape" {
                return Some(Action::new(ActionKind::CloseModal));
            }
            if key.key != "Enter" || key.shift {
                return None;
            }
            let target = path.first()?;
            let kind = match target.dataset.get("enterAction") {
                Some(tag) => ActionKind::from_tag(tag)?,
                None => match target.id.as_deref() {
                    Some("chat-input") => ActionKind::SendChat,
                    Some("ai-prompt-input") => ActionKind::AskAi,
                    _ => return None,
                },
            };
            Some(Action::from_element(kind, target))
        }
    }
}

/// Exhaustive routing table: one handler per action kind
pub struct ActionMap<H> {
    handlers: HashMap<ActionKind, H>,
}

impl<H> Default for ActionMap<H> {
    fn default() -> Self {
        Self { handlers: HashMap::new() }
    }
}

impl<H> ActionMap<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the handler for `kind`, replacing any previous one
    pub fn on(mut self, kind: ActionKind, handler: H) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn get(&self, kind: ActionKind) -> Option<&H> {
        self.handlers.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Kinds without a handler
    pub fn missing(&self) -> Vec<ActionKind> {
        ActionKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.handlers.contains_key(kind))
            .collect()
    }
}

impl<H: Fn(&Action)> ActionMap<H> {
    /// Run the handler for `action`; false when none is registered
    pub fn dispatch(&self, action: &Action) -> bool {
        match self.handlers.get(&action.kind) {
            Some(handler) => {
                handler(action);
                true
            }
            None => false,
        }
    }
}

/// Where the delegated listeners are attached (the document body)
pub trait EventRoot {
    type Error;

    fn has_marker(&self) -> bool;

    fn set_marker(&self) -> Result<(), Self::Error>;

    /// Attach the capturing listener for `kind`
    fn listen(&self, kind: EventKind) -> Result<(), Self::Error>;
}

/// Attach the three listeners once. Returns `Ok(false)` when the root
/// already carries the marker and nothing was attached.
pub fn attach<R: EventRoot>(root: &R) -> Result<bool, R::Error> {
    if root.has_marker() {
        return Ok(false);
    }
    for kind in EventKind::ALL {
        root.listen(kind)?;
    }
    root.set_marker()?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn element(tag: &str) -> ElementSnapshot {
        ElementSnapshot { tag: tag.to_string(), ..Default::default() }
    }

    fn with_action(tag: &str, action: &str) -> ElementSnapshot {
        let mut el = element(tag);
        el.dataset.insert("action".into(), action.into());
        el
    }

    #[derive(Default)]
    struct FakeRoot {
        marker: Cell<bool>,
        listeners: RefCell<Vec<EventKind>>,
    }

    impl EventRoot for FakeRoot {
        type Error = String;

        fn has_marker(&self) -> bool {
            self.marker.get()
        }

        fn set_marker(&self) -> Result<(), String> {
            self.marker.set(true);
            Ok(())
        }

        fn listen(&self, kind: EventKind) -> Result<(), String> {
            self.listeners.borrow_mut().push(kind);
            Ok(())
        }
    }

    #[test]
    fn test_dataset_key() {
        assert_eq!(dataset_key("data-action").as_deref(), Some("action"));
        assert_eq!(dataset_key("data-enter-action").as_deref(), Some("enterAction"));
        assert_eq!(dataset_key("data-"), None);
        assert_eq!(dataset_key("class"), None);
    }

    #[test]
    fn test_every_tag_round_trips() {
        for kind in ActionKind::ALL {
            assert_eq!(ActionKind::from_tag(kind.as_str()), Some(kind));
        }
        assert_eq!(ActionKind::from_tag("nope"), None);
    }

    #[test]
    fn test_click_resolves_nearest_interactive_ancestor() {
        let icon = element("span");
        let mut button = with_action("button", "filter-category");
        button.dataset.insert("category".into(), "קפה".into());
        let card = with_action("div", "open-modal");
        let action = resolve(EventKind::Click, &[icon, button, card], None).unwrap();
        assert_eq!(action.kind, ActionKind::FilterCategory);
        assert_eq!(action.data("category"), Some("קפה"));
    }

    #[test]
    fn test_click_outside_interactive_is_silent() {
        let path = [element("span"), element("div"), element("body")];
        assert!(resolve(EventKind::Click, &path, None).is_none());
        // A plain button with nothing to route to
        assert!(resolve(EventKind::Click, &[element("button")], None).is_none());
    }

    #[test]
    fn test_overlapping_classes_yield_one_action() {
        let mut button = element("button");
        button.classes = vec!["filter-btn".into(), "time-filter-btn".into()];
        let action = resolve(EventKind::Click, &[button], None).unwrap();
        assert_eq!(action.kind, ActionKind::FilterTime);
    }

    #[test]
    fn test_data_action_beats_id_and_class() {
        let mut button = with_action("button", "delete-photo");
        button.id = Some("ask-ai-btn".into());
        button.classes = vec!["photo-item".into()];
        assert_eq!(button.action_kind(), Some(ActionKind::DeletePhoto));
    }

    #[test]
    fn test_photo_item_div_is_interactive() {
        let mut img = element("img");
        img.classes = vec!["photo-thumb".into()];
        let mut item = element("div");
        item.classes = vec!["photo-item".into()];
        item.dataset.insert("index".into(), "4".into());
        let action = resolve(EventKind::Click, &[img, item], None).unwrap();
        assert_eq!(action.kind, ActionKind::OpenPhoto);
        assert_eq!(action.data_index("index"), Some(4));
    }

    #[test]
    fn test_click_on_form_field_is_left_to_change() {
        let mut file_input = with_action("input", "analyze-luggage");
        file_input.dataset.insert("index".into(), "0".into());
        assert!(resolve(EventKind::Click, &[file_input.clone(), element("div")], None).is_none());
        let action = resolve(EventKind::Change, &[file_input], None).unwrap();
        assert_eq!(action.kind, ActionKind::AnalyzeLuggage);
    }

    #[test]
    fn test_disabled_button_is_ignored() {
        let mut button = with_action("button", "send-chat");
        button.disabled = true;
        assert!(resolve(EventKind::Click, &[button], None).is_none());
    }

    #[test]
    fn test_change_uses_target_only() {
        let mut checkbox = element("input");
        checkbox.classes = vec!["packing-checkbox".into()];
        checkbox.checked = Some(true);
        let action = resolve(EventKind::Change, &[checkbox, with_action("div", "open-modal")], None).unwrap();
        assert_eq!(action.kind, ActionKind::TogglePacking);
        assert_eq!(action.checked, Some(true));

        let mut file_input = element("input");
        file_input.id = Some("photo-upload-input".into());
        assert_eq!(resolve(EventKind::Change, &[file_input], None).unwrap().kind, ActionKind::UploadPhotos);
    }

    #[test]
    fn test_keydown_routes() {
        let mut chat = element("input");
        chat.id = Some("chat-input".into());
        let enter = KeyInfo { key: "Enter", shift: false };
        let shift_enter = KeyInfo { key: "Enter", shift: true };
        let escape = KeyInfo { key: "Escape", shift: false };

        assert_eq!(resolve(EventKind::Keydown, &[chat.clone()], Some(enter)).unwrap().kind, ActionKind::SendChat);
        assert!(resolve(EventKind::Keydown, &[chat.clone()], Some(shift_enter)).is_none());
        assert_eq!(resolve(EventKind::Keydown, &[element("div")], Some(escape)).unwrap().kind, ActionKind::CloseModal);
        assert!(resolve(EventKind::Keydown, &[element("input")], Some(enter)).is_none());

        let mut note = element("textarea");
        note.dataset.insert("enterAction".into(), "post-bulletin".into());
        assert_eq!(resolve(EventKind::Keydown, &[note], Some(enter)).unwrap().kind, ActionKind::PostBulletin);
    }

    #[test]
    fn test_missing_handlers_reported() {
        let handler: Box<dyn Fn(&Action)> = Box::new(|_: &Action| {});
        let map = ActionMap::new().on(ActionKind::AskAi, handler);
        assert_eq!(map.len(), 1);
        assert_eq!(map.missing().len(), ActionKind::ALL.len() - 1);
        assert!(!map.missing().contains(&ActionKind::AskAi));
    }

    #[test]
    fn test_double_attach_runs_handler_once() {
        let root = FakeRoot::default();
        assert_eq!(attach(&root), Ok(true));
        assert_eq!(attach(&root), Ok(false));
        assert_eq!(root.listeners.borrow().len(), 3);

        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let map = ActionMap::new().on(ActionKind::SendChat, move |_: &Action| counter.set(counter.get() + 1));

        // Simulate the browser delivering one click to every click listener
        let path = [with_action("button", "send-chat")];
        for kind in root.listeners.borrow().iter().filter(|k| **k == EventKind::Click) {
            if let Some(action) = resolve(*kind, &path, None) {
                map.dispatch(&action);
            }
        }
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_dispatch_without_handler() {
        let map: ActionMap<fn(&Action)> = ActionMap::new();
        assert!(!map.dispatch(&Action::new(ActionKind::ClearChat)));
    }
}

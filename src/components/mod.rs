//! UI Components
//!
//! One component per section plus the shared chrome (navigation, modal,
//! toasts and loading indicators).

mod activities;
mod assistant;
mod family;
mod gallery;
mod itinerary;
mod loading;
mod luggage;
mod modal;
mod nav;
mod packing;
mod toast;

pub use activities::ActivitiesSection;
pub use assistant::AssistantSection;
pub use family::FamilySection;
pub use gallery::{GallerySection, PhotoGrid};
pub use itinerary::ItinerarySection;
pub use loading::{Loading, Spinner};
pub use luggage::LuggageSection;
pub use modal::ModalHost;
pub use nav::NavBar;
pub use packing::PackingSection;
pub use toast::ToastHost;

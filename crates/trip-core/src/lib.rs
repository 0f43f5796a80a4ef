//! Trip Core
//!
//! Everything the trip guide does that does not need a browser:
//! - model: trip document records and lenient decoding
//! - state: update rules that mutate the trip data and describe the store write
//! - dispatch: action tags, element resolution and the delegated-listener guard
//! - flow: loading tokens and the serialized feedback queue
//! - activities / packing: filtering, pagination and progress
//! - upload: pre-flight file checks and storage paths
//! - ai: prompts, request/response shapes and reply parsing
//! - firestore: REST value codec and commit writes
//! - config: client bootstrap configuration

pub mod activities;
pub mod ai;
pub mod config;
pub mod dispatch;
mod error;
pub mod firestore;
pub mod flow;
pub mod model;
pub mod packing;
pub mod state;
pub mod upload;

pub use error::{DomainError, DomainResult};

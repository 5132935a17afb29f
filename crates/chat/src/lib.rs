//! Chat message model and storage.
//!
//! Messages live in per-chat append-only JSONL files. Every successful
//! append emits a [`MessageCreated`] event on a broadcast channel, which
//! is the trigger feed the responder subscribes to.

pub mod error;
pub mod message;
pub mod store;

pub use {
    error::{Error, Result},
    message::{ChatMessage, Sender},
    store::{ChatStore, MessageCreated},
};

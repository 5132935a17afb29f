//! Error context machinery shared across all orion crates.
//!
//! Crates define their own `thiserror` error enum, implement
//! [`FromMessage`] for it, and invoke [`impl_context!`] to get a
//! crate-local `Context` trait for attaching context strings.

pub mod error;

pub use error::FromMessage;

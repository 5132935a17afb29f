//! The system bridge: named method dispatch for the `orion.system` channel.
//!
//! A host (the gateway WS loop, the CLI) feeds [`orion_protocol::MethodCall`]s
//! into a [`MethodRegistry`]; each call is dispatched by method name and
//! resolves to a success value, a structured error, or not-implemented.
//! Dispatch is stateless; nothing is carried across invocations.

pub mod host;
pub mod registry;
mod system;

pub use {
    host::{CurrentExeHost, PackageHost},
    registry::{HandlerFn, MethodContext, MethodRegistry},
};

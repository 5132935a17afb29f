use std::{collections::HashMap, future::Future, pin::Pin, sync::Arc};

use tracing::{debug, warn};

use orion_protocol::{MethodCall, MethodOutcome};

use crate::{host::PackageHost, system};

// ── Types ────────────────────────────────────────────────────────────────────

/// Context passed to every method handler.
pub struct MethodContext {
    pub call: MethodCall,
    pub host: Arc<dyn PackageHost>,
}

impl MethodContext {
    /// Params of the call, `Null` when none were supplied.
    #[must_use]
    pub fn params(&self) -> serde_json::Value {
        self.call.params.clone().unwrap_or(serde_json::Value::Null)
    }
}

/// A boxed async method handler.
pub type HandlerFn = Box<
    dyn Fn(MethodContext) -> Pin<Box<dyn Future<Output = MethodOutcome> + Send>> + Send + Sync,
>;

// ── Method registry ──────────────────────────────────────────────────────────

/// Dispatch table for the system bridge channel.
///
/// One registry per channel; handlers are registered once at startup and
/// every incoming call is routed by its method name. A name with no handler
/// resolves to [`MethodOutcome::NotImplemented`] rather than an error, so
/// the caller can distinguish "missing capability" from "failed call".
pub struct MethodRegistry {
    handlers: HashMap<String, HandlerFn>,
    host: Arc<dyn PackageHost>,
}

impl MethodRegistry {
    pub fn new(host: Arc<dyn PackageHost>) -> Self {
        let mut reg = Self {
            handlers: HashMap::new(),
            host,
        };
        system::register(&mut reg);
        reg
    }

    pub fn register(&mut self, method: impl Into<String>, handler: HandlerFn) {
        self.handlers.insert(method.into(), handler);
    }

    /// Dispatch a single call. Stateless and one-shot: the context is built
    /// here and consumed by the handler.
    pub async fn dispatch(&self, call: MethodCall) -> MethodOutcome {
        let method = call.method.clone();
        let call_id = call.id.clone();

        let Some(handler) = self.handlers.get(&method) else {
            debug!(method, call_id = %call_id, "no handler for method");
            return MethodOutcome::NotImplemented;
        };

        let ctx = MethodContext {
            call,
            host: Arc::clone(&self.host),
        };

        debug!(method, call_id = %call_id, "dispatching method");
        let outcome = handler(ctx).await;
        if let MethodOutcome::Error { ref error } = outcome {
            warn!(method, call_id = %call_id, code = %error.code, msg = %error.message, "method error");
        }
        outcome
    }

    pub fn method_names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.handlers.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    struct FixedPathHost(&'static str);

    impl PackageHost for FixedPathHost {
        fn artifact_path(&self) -> std::io::Result<PathBuf> {
            Ok(PathBuf::from(self.0))
        }
    }

    struct FailingHost;

    impl PackageHost for FailingHost {
        fn artifact_path(&self) -> std::io::Result<PathBuf> {
            Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "package not found",
            ))
        }
    }

    fn call(method: &str) -> MethodCall {
        MethodCall::new("1", method)
    }

    #[tokio::test]
    async fn get_apk_path_returns_success_with_path() {
        let reg = MethodRegistry::new(Arc::new(FixedPathHost("/data/app/orion.apk")));
        let outcome = reg.dispatch(call("getApkPath")).await;

        match outcome {
            MethodOutcome::Success { value } => {
                assert_eq!(value, serde_json::json!("/data/app/orion.apk"));
            },
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_apk_path_failure_maps_to_apk_path_error() {
        let reg = MethodRegistry::new(Arc::new(FailingHost));
        let outcome = reg.dispatch(call("getApkPath")).await;

        match outcome {
            MethodOutcome::Error { error } => {
                assert_eq!(error.code, orion_protocol::error_codes::APK_PATH_ERROR);
                assert!(error.message.contains("package not found"));
                assert!(error.details.is_none());
            },
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_method_is_not_implemented() {
        let reg = MethodRegistry::new(Arc::new(FixedPathHost("/x")));
        let outcome = reg.dispatch(call("definitelyNotAMethod")).await;
        assert_eq!(outcome, MethodOutcome::NotImplemented);
    }

    #[tokio::test]
    async fn dispatch_is_stateless_across_calls() {
        let reg = MethodRegistry::new(Arc::new(FixedPathHost("/x")));
        let first = reg.dispatch(call("getApkPath")).await;
        let second = reg.dispatch(call("getApkPath")).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn method_names_lists_registered_methods() {
        let reg = MethodRegistry::new(Arc::new(FixedPathHost("/x")));
        assert!(reg.method_names().contains(&"getApkPath".to_string()));
    }
}

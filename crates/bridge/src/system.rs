use orion_protocol::{MethodOutcome, error_codes};

use crate::registry::MethodRegistry;

pub(crate) fn register(reg: &mut MethodRegistry) {
    // getApkPath: path of the application's installed artifact.
    //
    // Any host-level failure is converted to a structured error at this
    // boundary; nothing propagates to the caller as a panic.
    reg.register(
        "getApkPath",
        Box::new(|ctx| {
            Box::pin(async move {
                match ctx.host.artifact_path() {
                    Ok(path) => MethodOutcome::success(serde_json::json!(
                        path.to_string_lossy().into_owned()
                    )),
                    Err(e) => MethodOutcome::error(error_codes::APK_PATH_ERROR, e.to_string()),
                }
            })
        }),
    );
}

use std::path::PathBuf;

/// The host environment's package-management facility.
///
/// The bridge queries it for metadata about the currently installed
/// application; handlers never touch the facility directly, so tests can
/// swap in a fake that succeeds or fails on demand.
pub trait PackageHost: Send + Sync {
    /// On-disk path of the application's installed artifact.
    fn artifact_path(&self) -> std::io::Result<PathBuf>;
}

/// Production host: the installed artifact is the running binary itself.
pub struct CurrentExeHost;

impl PackageHost for CurrentExeHost {
    fn artifact_path(&self) -> std::io::Result<PathBuf> {
        std::env::current_exe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn current_exe_host_resolves_a_path() {
        // Under `cargo test` the running binary always exists on disk.
        let path = CurrentExeHost.artifact_path().unwrap();
        assert!(path.is_absolute());
    }
}

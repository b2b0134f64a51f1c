//! Build metadata reported by `/version` and `/api/info`.

/// Version and revision strings baked into the binary.
///
/// The revision comes from the `BRICKS_REVISION` environment variable at
/// compile time and falls back to `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: String,
    pub revision: String,
}

impl BuildInfo {
    pub fn new(version: impl Into<String>, revision: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            revision: revision.into(),
        }
    }

    /// Metadata of the running binary.
    pub fn current() -> Self {
        Self::new(
            env!("CARGO_PKG_VERSION"),
            option_env!("BRICKS_REVISION").unwrap_or("unknown"),
        )
    }
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self::current()
    }
}

/// Machine hostname, `localhost` if the OS will not say.
///
/// Containers export `HOSTNAME`, which wins over the kernel value.
pub fn hostname() -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        if !name.trim().is_empty() {
            return name.trim().to_string();
        }
    }

    match ::hostname::get() {
        Ok(name) => {
            let name = name.to_string_lossy().trim().to_string();
            if name.is_empty() {
                "localhost".to_string()
            } else {
                name
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Hostname lookup failed");
            "localhost".to_string()
        }
    }
}

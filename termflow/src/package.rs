//! # Package Metadata Source
//!
//! Name and version for the usage line and the `version` built-in.
//! Programs configured with a bare description string fall back to
//! metadata detected from the environment.

/// Program name and version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
}

impl PackageMetadata {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Best-effort detection from the running executable
    ///
    /// The name comes from the executable's file stem; the version is
    /// unknown at run time, so callers that care should use
    /// [`package_metadata!`](crate::package_metadata) instead.
    pub fn from_executable() -> Self {
        let name = std::env::current_exe()
            .ok()
            .and_then(|path| path.file_stem().map(|stem| stem.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "program".to_string());
        Self {
            name,
            version: "0.0.0".to_string(),
        }
    }
}

/// Capture the calling crate's `CARGO_PKG_NAME` and `CARGO_PKG_VERSION`
/// at compile time
///
/// ```no_run
/// let metadata = termflow::package_metadata!();
/// assert!(!metadata.name.is_empty());
/// ```
#[macro_export]
macro_rules! package_metadata {
    () => {
        $crate::PackageMetadata::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_metadata() {
        let metadata = PackageMetadata::new("demo", "1.2.3");
        assert_eq!(metadata.name, "demo");
        assert_eq!(metadata.version, "1.2.3");
    }

    #[test]
    fn test_macro_captures_crate_metadata() {
        let metadata = package_metadata!();
        assert_eq!(metadata.name, "termflow");
        assert!(!metadata.version.is_empty());
    }

    #[test]
    fn test_from_executable_has_a_name() {
        let metadata = PackageMetadata::from_executable();
        assert!(!metadata.name.is_empty());
        assert_eq!(metadata.version, "0.0.0");
    }
}

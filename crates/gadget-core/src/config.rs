//! Scaffold root resolution

use std::path::PathBuf;

/// Environment variable overriding the default scaffold root
pub const ROOT_ENV: &str = "GADGETS_ROOT";

/// Scaffold root used when neither a flag nor the environment sets one
pub const DEFAULT_ROOT: &str = "src/gadgets";

/// Resolve the scaffold root: explicit path, then `GADGETS_ROOT`, then `src/gadgets`
pub fn resolve_root(explicit: Option<PathBuf>) -> PathBuf {
    resolve_root_with(explicit, std::env::var(ROOT_ENV).ok())
}

fn resolve_root_with(explicit: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    explicit
        .or_else(|| env_value.filter(|v| !v.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_root_wins() {
        let root = resolve_root_with(Some(PathBuf::from("out")), Some("env".to_string()));
        assert_eq!(root, PathBuf::from("out"));
    }

    #[test]
    fn test_env_root_used_without_flag() {
        let root = resolve_root_with(None, Some("from-env".to_string()));
        assert_eq!(root, PathBuf::from("from-env"));
    }

    #[test]
    fn test_default_root() {
        assert_eq!(resolve_root_with(None, None), PathBuf::from("src/gadgets"));
        assert_eq!(
            resolve_root_with(None, Some(String::new())),
            PathBuf::from("src/gadgets")
        );
    }
}

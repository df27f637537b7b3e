//! Platform paths for configuration, data and logs.
//!
//! Locations follow the platform conventions exposed by the `dirs` crate, with
//! a relative fallback when the platform directory is unknown.

use std::path::PathBuf;

/// Returns the data directory for roster files.
///
/// Typically `~/.local/share/roster` on Linux. Holds the offline store and
/// the `logs/` directory.
///
/// # Examples
///
/// ```
/// use roster::infrastructure::data_dir;
///
/// assert!(data_dir().ends_with("roster"));
/// ```
#[must_use]
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster")
}

/// Returns the default configuration file path.
///
/// Typically `~/.config/roster/config.toml` on Linux.
#[must_use]
pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("roster")
        .join("config.toml")
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and every path when the home directory is
/// unknown, are returned unchanged.
///
/// # Examples
///
/// ```
/// use roster::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// assert_eq!(expand_tilde("relative/file.json"), PathBuf::from("relative/file.json"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tilde_expands_under_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~"), home);
            assert_eq!(expand_tilde("~/photos/a.png"), home.join("photos/a.png"));
        }
        assert_eq!(expand_tilde("~user/x"), PathBuf::from("~user/x"));
    }

    #[test]
    fn config_file_is_toml_under_roster() {
        let path = config_file();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("config.toml"));
        assert!(path.parent().is_some_and(|p| p.ends_with("roster")));
    }
}

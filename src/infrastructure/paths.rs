//! Paths inside the Zellij plugin sandbox.
//!
//! The host filesystem is mounted under `/host`, which Zellij points at the
//! directory the session was started from (usually the user's home).

use std::path::PathBuf;

const PLUGIN_DIR_NAME: &str = "zusers";

/// Returns the plugin's data directory, `/host/.local/share/zellij/zusers`.
///
/// Holds the trace file and, when persistence is enabled, the session file.
///
/// # Examples
///
/// ```
/// use zusers::infrastructure::get_data_dir;
///
/// assert_eq!(get_data_dir().to_str(), Some("/host/.local/share/zellij/zusers"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join(PLUGIN_DIR_NAME)
}

/// Location of the persisted session file.
#[must_use]
pub fn session_file() -> PathBuf {
    get_data_dir().join("session.json")
}

/// Maps `~` paths onto the `/host` mount.
///
/// # Examples
///
/// ```
/// use zusers::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("~/themes/dark.toml"), "/host/themes/dark.toml");
/// assert_eq!(expand_tilde("~"), "/host");
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    if path.starts_with("~/") {
        path.replacen('~', "/host", 1)
    } else if path == "~" {
        "/host".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_file_lives_in_data_dir() {
        assert_eq!(session_file(), get_data_dir().join("session.json"));
    }

    #[test]
    fn tilde_only_expanded_at_start() {
        assert_eq!(expand_tilde("a/~/b"), "a/~/b");
        assert_eq!(expand_tilde("~user"), "~user");
    }
}

//! Path utilities: expand ~ in configured source locations.

use std::path::PathBuf;

pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(path.trim_start_matches("~/"));
    }
    PathBuf::from(path)
}

/// Remote sources are fetched over HTTP, everything else is a local file.
pub fn is_remote(location: &str) -> bool {
    let l = location.trim().to_ascii_lowercase();
    l.starts_with("http://") || l.starts_with("https://")
}

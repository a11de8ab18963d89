//! The follow-up transfer suggested after a run.

use std::path::Path;

/// Flags for a dry run that lists what would be transferred.
pub const SYNC_FLAGS: &str = "-n --size-only --progress -ruvzh --no-perms --chmod=ugo=rwX";

/// Renders the `rsync` dry run from `collect_root` into `target`.
///
/// The trailing slash on the source makes rsync copy the contents of the
/// collection tree rather than the directory itself.
pub fn sync_command(collect_root: &Path, target: &str) -> String {
    let root = collect_root.display().to_string();
    format!(
        "rsync {} {}/ {}",
        SYNC_FLAGS,
        root.trim_end_matches('/'),
        target
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_command() {
        assert_eq!(
            sync_command(Path::new("/tmp/picsToCopy"), "nas:/photos"),
            "rsync -n --size-only --progress -ruvzh --no-perms --chmod=ugo=rwX /tmp/picsToCopy/ nas:/photos"
        );
    }

    #[test]
    fn test_single_trailing_slash() {
        assert!(sync_command(Path::new("/stage/"), "/backup").contains(" /stage/ /backup"));
    }
}

use std::path::{Path, PathBuf};

use regex::Regex;

/// The configuration for one mirroring job.
#[derive(Debug)]
pub struct SyncInfo {
    /// The authoritative tree that is mirrored from. Never written to.
    pub source: PathBuf,
    /// The tree that is made to match `source`. The only tree ever mutated.
    pub replica: PathBuf,
    pub ignore: Ignore,
}

impl SyncInfo {
    pub fn new(source: PathBuf, replica: PathBuf) -> Self {
        SyncInfo {
            source,
            replica,
            ignore: Ignore::nothing(),
        }
    }
}

/// Determines which relative paths are exempt from mirroring.
///
/// An ignored path is invisible to both passes: it is never copied into the
/// replica and never pruned out of it.
#[derive(Debug)]
pub struct Ignore {
    pub regexes: Vec<Regex>,
    pub paths: Vec<String>,
}

impl Ignore {
    /// An `Ignore` struct that ignores nothing
    pub fn nothing() -> Self {
        Ignore {
            regexes: Vec::new(),
            paths: Vec::new(),
        }
    }

    /// Checks if the path is on the ignore list.
    pub fn is_ignored(&self, path: &Path) -> bool {
        for prefix in &self.paths {
            if path.starts_with(prefix) {
                return true;
            }
        }
        for regex in &self.regexes {
            if regex.is_match(&path.to_string_lossy()) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_cover_whole_subtrees() {
        let mut ignore = Ignore::nothing();
        ignore.paths.push("cache".to_owned());

        assert!(ignore.is_ignored(Path::new("cache")));
        assert!(ignore.is_ignored(Path::new("cache/deep/file.txt")));
        assert!(!ignore.is_ignored(Path::new("cachefile")));
    }

    #[test]
    fn regexes_match_anywhere_in_the_path() {
        let mut ignore = Ignore::nothing();
        ignore.regexes.push(Regex::new(r"\.tmp$").unwrap());

        assert!(ignore.is_ignored(Path::new("a/b/scratch.tmp")));
        assert!(!ignore.is_ignored(Path::new("a/b/scratch.tmp.keep")));
    }

    #[test]
    fn nothing_ignores_nothing() {
        assert!(!Ignore::nothing().is_ignored(Path::new("anything/at/all")));
    }
}

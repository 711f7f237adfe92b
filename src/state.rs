use std::fs;
use std::path::Path;

/// Mirrors the state of a path on the filesystem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    Missing,
    File,
    Directory,
}

impl<'a> From<&'a Path> for EntryKind {
    fn from(path: &'a Path) -> EntryKind {
        match fs::metadata(path) {
            Ok(metadata) => {
                if metadata.is_dir() {
                    EntryKind::Directory
                } else {
                    EntryKind::File
                }
            }
            Err(_) => EntryKind::Missing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_paths() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, "contents").unwrap();

        assert_eq!(EntryKind::from(dir.path()), EntryKind::Directory);
        assert_eq!(EntryKind::from(file.as_path()), EntryKind::File);
        assert_eq!(
            EntryKind::from(dir.path().join("nothing").as_path()),
            EntryKind::Missing
        );
    }
}

//! Sequential playlist file emitter.
//!
//! Files are named `<n>.xspf` with `n` counting from zero in the order
//! playlists close, independent of their reference tokens.

use crate::models::Playlist;
use crate::xspf;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_OUTPUT_DIR: &str = "playlists";
pub const EXTENSION: &str = "xspf";

/// A document that made it to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Emitted {
    /// 1-based count of playlists written so far
    pub count: usize,
    pub path: PathBuf,
}

#[derive(Debug)]
pub struct Emitter {
    dir: PathBuf,
    next_index: usize,
}

impl Emitter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            next_index: 0,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> usize {
        self.next_index
    }

    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("{}.{}", index, EXTENSION))
    }

    /// Serialize and write one playlist. The counter only advances on success.
    pub fn emit(&mut self, playlist: &Playlist) -> Result<Emitted> {
        let xml = xspf::to_xml(playlist)
            .with_context(|| format!("Failed to serialize playlist '{}'", playlist.title))?;
        let path = self.path_for(self.next_index);

        std::fs::write(&path, xml)
            .with_context(|| format!("Failed to write playlist to {}", path.display()))?;
        debug!(path = %path.display(), tracks = playlist.tracks.len(), "wrote playlist");

        self.next_index += 1;
        Ok(Emitted {
            count: self.next_index,
            path,
        })
    }
}

/// Operator progress line for a written playlist.
pub fn report_line(emitted: &Emitted, playlist: &Playlist) -> String {
    format!("Written {} {}", emitted.count, playlist.title)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_file_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = Emitter::new(dir.path());

        let first = emitter.emit(&Playlist::new("A")).unwrap();
        let second = emitter.emit(&Playlist::new("B")).unwrap();

        assert_eq!(first.count, 1);
        assert_eq!(first.path, dir.path().join("0.xspf"));
        assert_eq!(second.count, 2);
        assert_eq!(second.path, dir.path().join("1.xspf"));
        assert!(second.path.exists());
        assert_eq!(emitter.written(), 2);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut emitter = Emitter::new(dir.path().join("nope"));
        let err = emitter.emit(&Playlist::new("Lost")).unwrap_err();
        assert!(err.to_string().contains("Failed to write playlist"));
        assert_eq!(emitter.written(), 0);
    }

    #[test]
    fn test_report_line() {
        let emitted = Emitted {
            count: 3,
            path: PathBuf::from("playlists/2.xspf"),
        };
        assert_eq!(
            report_line(&emitted, &Playlist::new("Don\\'t Stop")),
            "Written 3 Don\\'t Stop"
        );
    }
}

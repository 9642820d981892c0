//! Core data models for playlist conversion.
//!
//! This module contains the finalized output types, the per-track
//! accumulation slot, and the run statistics.

use serde::Serialize;

// ============================================================================
// Metadata
// ============================================================================

/// Namespace prefix shared by every meta key we emit.
pub const META_NAMESPACE: &str = "http://browser.org/xspf/spotify/";

/// Extension facts attached to a track outside the XSPF core fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    AddedBy,
    Track,
    AddedTime,
    Album,
    Artist,
}

impl MetaKey {
    pub fn name(self) -> &'static str {
        match self {
            MetaKey::AddedBy => "added_by",
            MetaKey::Track => "track",
            MetaKey::AddedTime => "added_time",
            MetaKey::Album => "album",
            MetaKey::Artist => "artist",
        }
    }

    /// Full URL-like key, e.g. `http://browser.org/xspf/spotify/added_by`
    pub fn rel(self) -> String {
        format!("{}{}", META_NAMESPACE, self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub key: MetaKey,
    pub value: String,
}

impl MetaEntry {
    pub fn new(key: MetaKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// Output Models
// ============================================================================

/// Finalized track as it appears in the output document.
///
/// Every core field is optional: a track finalized before its fields
/// arrived simply omits them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub creator: Option<String>,
    pub album: Option<String>,
    pub duration: Option<String>, // literal token, milliseconds upstream
    pub track_num: Option<u32>,   // 1-based
    pub meta: Vec<MetaEntry>,
}

/// A playlist, both while it accumulates and once it is handed to the emitter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playlist {
    pub title: String,
    pub creator: Option<String>,
    pub annotation: Option<String>,
    pub tracks: Vec<Track>,
}

impl Playlist {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

// ============================================================================
// Accumulation State
// ============================================================================

/// Partially accumulated track, keyed by (playlist ref, track index).
///
/// Artist names and meta entries are buffered here rather than globally, so
/// records for different playlists can interleave freely.
#[derive(Debug, Clone, Default)]
pub struct TrackSlot {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub album: Option<String>,
    pub duration: Option<String>,
    pub track_num: Option<u32>,
    pub artists: Vec<String>,
    pub meta: Vec<MetaEntry>,
}

impl TrackSlot {
    /// Start-of-track marker: clear the append-only buffers.
    pub fn reset_buffers(&mut self) {
        self.artists.clear();
        self.meta.clear();
    }

    /// Freeze the slot into a finalized track.
    pub fn finalize(self) -> Track {
        let creator = if self.artists.is_empty() {
            None
        } else {
            Some(self.artists.join(", "))
        };
        Track {
            identifier: self.identifier,
            title: self.title,
            creator,
            album: self.album,
            duration: self.duration,
            track_num: self.track_num,
            meta: self.meta,
        }
    }
}

// ============================================================================
// Statistics (Instrumentation)
// ============================================================================

/// Counters for a single conversion run.
#[derive(Default, Debug, Clone, Serialize)]
pub struct ConversionStats {
    pub lines: usize,
    pub records_applied: usize,
    pub unknown_tags: usize,
    pub skipped_records: usize,
    pub tracks_finalized: usize,
    pub playlists_written: usize,
    pub open_playlists_at_eof: usize,

    // Timing
    pub elapsed_seconds: f64,
}

impl ConversionStats {
    /// Log stats to stderr in JSON format
    pub fn log_summary(&self) {
        if let Ok(json) = serde_json::to_string_pretty(self) {
            tracing::info!("conversion stats\n{}", json);
        }
    }

    /// Write stats to a JSON file
    pub fn write_to_file(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_rel() {
        assert_eq!(
            MetaKey::AddedBy.rel(),
            "http://browser.org/xspf/spotify/added_by"
        );
        assert_eq!(
            MetaKey::AddedTime.rel(),
            "http://browser.org/xspf/spotify/added_time"
        );
    }

    #[test]
    fn test_finalize_joins_artists() {
        let slot = TrackSlot {
            artists: vec!["Artist A".to_string(), "Artist B".to_string()],
            ..Default::default()
        };
        assert_eq!(slot.finalize().creator.as_deref(), Some("Artist A, Artist B"));
    }

    #[test]
    fn test_finalize_without_artists_has_no_creator() {
        let track = TrackSlot::default().finalize();
        assert_eq!(track, Track::default());
    }

    #[test]
    fn test_reset_buffers_keeps_fields() {
        let mut slot = TrackSlot {
            title: Some("Kept".to_string()),
            artists: vec!["Gone".to_string()],
            meta: vec![MetaEntry::new(MetaKey::Album, "spotify:album:x")],
            ..Default::default()
        };
        slot.reset_buffers();
        assert!(slot.artists.is_empty());
        assert!(slot.meta.is_empty());
        assert_eq!(slot.title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_stats_write_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stats.json");
        let stats = ConversionStats {
            playlists_written: 3,
            ..Default::default()
        };
        stats.write_to_file(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"playlists_written\": 3"));
    }
}

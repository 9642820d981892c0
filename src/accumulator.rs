//! Record-tag state machine.
//!
//! Playlists accumulate by reference token; tracks accumulate in slots keyed
//! by (reference, index) until their `TRACK:END` arrives. Scalar fields are
//! last-write-wins, artist names and meta entries append.

use crate::error::RecordError;
use crate::models::{MetaEntry, MetaKey, Playlist, TrackSlot};
use crate::record::{Command, Record};
use rustc_hash::FxHashMap;
use tracing::debug;

/// Outcome of applying one record.
#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
    /// State was updated, nothing to hand off.
    Updated,
    /// A track was frozen and appended to its playlist.
    TrackFinalized,
    /// `PLAYLIST:END`: the playlist is complete and ready to serialize.
    PlaylistClosed(Playlist),
}

#[derive(Debug, Default)]
pub struct Accumulator {
    playlists: FxHashMap<String, Playlist>,
    slots: FxHashMap<(String, u32), TrackSlot>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of playlists opened but not yet closed.
    pub fn open_playlists(&self) -> usize {
        self.playlists.len()
    }

    pub fn apply(&mut self, record: Record) -> Result<Applied, RecordError> {
        let tag = record.tag().as_str();
        let reference = record.reference;

        match record.command {
            Command::Playlist { title } => {
                self.discard_slots(&reference);
                if self.playlists.insert(reference.clone(), Playlist::new(title)).is_some() {
                    debug!(reference = %reference, "reopened playlist, previous state dropped");
                }
            }
            Command::PlaylistEnd => {
                let playlist = self
                    .playlists
                    .remove(&reference)
                    .ok_or(RecordError::UnknownPlaylist { tag, reference: reference.clone() })?;
                self.discard_slots(&reference);
                return Ok(Applied::PlaylistClosed(playlist));
            }
            Command::Owner { owner } => {
                self.playlist_mut(tag, &reference)?.creator = Some(owner);
            }
            Command::Description { text } => {
                self.playlist_mut(tag, &reference)?.annotation = Some(text);
            }
            Command::TrackCreator { index, added_by } => {
                let slot = self.slot_mut(reference, index);
                slot.reset_buffers();
                slot.meta.push(MetaEntry::new(MetaKey::AddedBy, added_by));
            }
            Command::TrackUri { index, uri } => {
                let slot = self.slot_mut(reference, index);
                slot.meta.push(MetaEntry::new(MetaKey::Track, uri.clone()));
                slot.identifier = Some(uri);
                slot.track_num = Some(index.saturating_add(1));
            }
            Command::TrackName { index, title } => {
                self.slot_mut(reference, index).title = Some(title);
            }
            Command::TrackDuration { index, duration } => {
                self.slot_mut(reference, index).duration = Some(duration);
            }
            Command::TrackEpoch { index, timestamp } => {
                self.slot_mut(reference, index)
                    .meta
                    .push(MetaEntry::new(MetaKey::AddedTime, timestamp));
            }
            Command::AlbumName { index, name } => {
                self.slot_mut(reference, index).album = Some(name);
            }
            Command::AlbumUri { index, uri } => {
                self.slot_mut(reference, index)
                    .meta
                    .push(MetaEntry::new(MetaKey::Album, uri));
            }
            Command::ArtistName { index, name } => {
                self.slot_mut(reference, index).artists.push(name);
            }
            Command::ArtistUri { index, uri } => {
                self.slot_mut(reference, index)
                    .meta
                    .push(MetaEntry::new(MetaKey::Artist, uri));
            }
            Command::TrackEnd { index } => {
                if !self.playlists.contains_key(&reference) {
                    return Err(RecordError::UnknownPlaylist { tag, reference });
                }
                let slot = self
                    .slots
                    .remove(&(reference.clone(), index))
                    .unwrap_or_default();
                let track = slot.finalize();
                if let Some(playlist) = self.playlists.get_mut(&reference) {
                    playlist.tracks.push(track);
                }
                return Ok(Applied::TrackFinalized);
            }
        }

        Ok(Applied::Updated)
    }

    fn playlist_mut(&mut self, tag: &'static str, reference: &str) -> Result<&mut Playlist, RecordError> {
        self.playlists
            .get_mut(reference)
            .ok_or_else(|| RecordError::UnknownPlaylist {
                tag,
                reference: reference.to_string(),
            })
    }

    fn slot_mut(&mut self, reference: String, index: u32) -> &mut TrackSlot {
        self.slots.entry((reference, index)).or_default()
    }

    fn discard_slots(&mut self, reference: &str) {
        self.slots.retain(|(r, _), _| r != reference);
    }
}

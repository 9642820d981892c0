//! Record tokenizer and tag table.
//!
//! One input line is `<TAG> <ref> <args...>`, whitespace separated. The tag
//! vocabulary is a fixed table; anything outside it is ignored.

use crate::error::RecordError;
use crate::text::join_escaped;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

// ============================================================================
// Tag Table
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Playlist,
    PlaylistEnd,
    Owner,
    Description,
    TrackCreator,
    TrackUri,
    TrackName,
    TrackDuration,
    TrackEpoch,
    AlbumName,
    AlbumUri,
    ArtistName,
    ArtistUri,
    TrackEnd,
}

const TAG_TABLE: &[(&str, Tag)] = &[
    ("PLAYLIST", Tag::Playlist),
    ("PLAYLIST:END", Tag::PlaylistEnd),
    ("OWNER", Tag::Owner),
    ("DESCRIPTION", Tag::Description),
    ("TRACK:CREATOR", Tag::TrackCreator),
    ("TRACK:URI", Tag::TrackUri),
    ("TRACK:NAME", Tag::TrackName),
    ("TRACK:DURATION", Tag::TrackDuration),
    ("TRACK:EPOCH", Tag::TrackEpoch),
    ("ALBUM:NAME", Tag::AlbumName),
    ("ALBUM:URI", Tag::AlbumUri),
    ("ARTIST:NAME", Tag::ArtistName),
    ("ARTIST:URI", Tag::ArtistUri),
    ("TRACK:END", Tag::TrackEnd),
];

static TAGS: Lazy<FxHashMap<&'static str, Tag>> =
    Lazy::new(|| TAG_TABLE.iter().copied().collect());

impl Tag {
    pub fn lookup(token: &str) -> Option<Tag> {
        TAGS.get(token).copied()
    }

    pub fn as_str(self) -> &'static str {
        TAG_TABLE
            .iter()
            .find(|(_, tag)| *tag == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }

    /// Tags scoped to a single track carry its index as the first argument.
    pub fn is_track_scoped(self) -> bool {
        !matches!(
            self,
            Tag::Playlist | Tag::PlaylistEnd | Tag::Owner | Tag::Description
        )
    }
}

// ============================================================================
// Typed Records
// ============================================================================

/// What a record asks the accumulator to do, with its arguments decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Playlist { title: String },
    PlaylistEnd,
    Owner { owner: String },
    Description { text: String },
    TrackCreator { index: u32, added_by: String },
    TrackUri { index: u32, uri: String },
    TrackName { index: u32, title: String },
    TrackDuration { index: u32, duration: String },
    TrackEpoch { index: u32, timestamp: String },
    AlbumName { index: u32, name: String },
    AlbumUri { index: u32, uri: String },
    ArtistName { index: u32, name: String },
    ArtistUri { index: u32, uri: String },
    TrackEnd { index: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub reference: String,
    pub command: Command,
}

impl Record {
    pub fn tag(&self) -> Tag {
        match self.command {
            Command::Playlist { .. } => Tag::Playlist,
            Command::PlaylistEnd => Tag::PlaylistEnd,
            Command::Owner { .. } => Tag::Owner,
            Command::Description { .. } => Tag::Description,
            Command::TrackCreator { .. } => Tag::TrackCreator,
            Command::TrackUri { .. } => Tag::TrackUri,
            Command::TrackName { .. } => Tag::TrackName,
            Command::TrackDuration { .. } => Tag::TrackDuration,
            Command::TrackEpoch { .. } => Tag::TrackEpoch,
            Command::AlbumName { .. } => Tag::AlbumName,
            Command::AlbumUri { .. } => Tag::AlbumUri,
            Command::ArtistName { .. } => Tag::ArtistName,
            Command::ArtistUri { .. } => Tag::ArtistUri,
            Command::TrackEnd { .. } => Tag::TrackEnd,
        }
    }
}

/// Result of tokenizing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Blank,
    /// First token is not in the tag table.
    Unknown(String),
    Record(Record),
}

/// Tokenize and decode one line (already stripped of its terminator).
pub fn parse_line(line: &str) -> Result<Line, RecordError> {
    let mut tokens = line.split_whitespace();
    let Some(tag_token) = tokens.next() else {
        return Ok(Line::Blank);
    };
    let Some(tag) = Tag::lookup(tag_token) else {
        return Ok(Line::Unknown(tag_token.to_string()));
    };
    let reference = tokens.next().ok_or(RecordError::Malformed)?.to_string();
    let args: Vec<&str> = tokens.collect();

    let command = if tag.is_track_scoped() {
        let (index, rest) = split_index(tag, &args)?;
        track_command(tag, index, rest)?
    } else {
        playlist_command(tag, &args)?
    };

    Ok(Line::Record(Record { reference, command }))
}

fn split_index<'a>(tag: Tag, args: &'a [&'a str]) -> Result<(u32, &'a [&'a str]), RecordError> {
    let (first, rest) = args.split_first().ok_or(RecordError::MissingIndex {
        tag: tag.as_str(),
    })?;
    let index = first.parse::<u32>().map_err(|_| RecordError::InvalidIndex {
        tag: tag.as_str(),
        token: first.to_string(),
    })?;
    Ok((index, rest))
}

fn required(tag: Tag, token: Option<&&str>, what: &'static str) -> Result<String, RecordError> {
    token
        .map(|t| t.to_string())
        .ok_or(RecordError::MissingArgument {
            tag: tag.as_str(),
            what,
        })
}

fn playlist_command(tag: Tag, args: &[&str]) -> Result<Command, RecordError> {
    let command = match tag {
        Tag::Playlist => Command::Playlist {
            title: join_escaped(args),
        },
        Tag::PlaylistEnd => Command::PlaylistEnd,
        // Owner ids are opaque tokens and pass through unescaped
        Tag::Owner => Command::Owner {
            owner: required(tag, args.first(), "owner id")?,
        },
        Tag::Description => Command::Description {
            text: join_escaped(args),
        },
        _ => unreachable!("track-scoped tag routed to playlist_command"),
    };
    Ok(command)
}

fn track_command(tag: Tag, index: u32, args: &[&str]) -> Result<Command, RecordError> {
    let command = match tag {
        Tag::TrackCreator => Command::TrackCreator {
            index,
            added_by: required(tag, args.first(), "user")?,
        },
        Tag::TrackUri => Command::TrackUri {
            index,
            uri: required(tag, args.first(), "track uri")?,
        },
        Tag::TrackName => Command::TrackName {
            index,
            title: join_escaped(args),
        },
        Tag::TrackDuration => Command::TrackDuration {
            index,
            duration: required(tag, args.first(), "duration")?,
        },
        Tag::TrackEpoch => Command::TrackEpoch {
            index,
            timestamp: required(tag, args.first(), "timestamp")?,
        },
        Tag::AlbumName => Command::AlbumName {
            index,
            name: join_escaped(args),
        },
        Tag::AlbumUri => Command::AlbumUri {
            index,
            uri: required(tag, args.first(), "album uri")?,
        },
        // First argument is the artist ordinal, unused
        Tag::ArtistName => Command::ArtistName {
            index,
            name: join_escaped(args.get(1..).unwrap_or(&[])),
        },
        // Producers may put the artist ordinal before the uri; the uri is always last
        Tag::ArtistUri => Command::ArtistUri {
            index,
            uri: required(tag, args.last(), "artist uri")?,
        },
        Tag::TrackEnd => Command::TrackEnd { index },
        _ => unreachable!("playlist tag routed to track_command"),
    };
    Ok(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(line: &str) -> Record {
        match parse_line(line) {
            Ok(Line::Record(r)) => r,
            other => panic!("expected record for {:?}, got {:?}", line, other),
        }
    }

    #[test]
    fn test_tag_table_round_trips_names() {
        for (name, tag) in TAG_TABLE {
            assert_eq!(Tag::lookup(name), Some(*tag));
            assert_eq!(tag.as_str(), *name);
        }
        assert_eq!(Tag::lookup("track:uri"), None);
    }

    #[test]
    fn test_playlist_title_joins_and_escapes() {
        let r = record("PLAYLIST p1 Rock   'n' Roll");
        assert_eq!(r.reference, "p1");
        assert_eq!(
            r.command,
            Command::Playlist {
                title: "Rock \\'n\\' Roll".to_string()
            }
        );
    }

    #[test]
    fn test_blank_and_unknown_lines() {
        assert_eq!(parse_line("").unwrap(), Line::Blank);
        assert_eq!(parse_line("   \t ").unwrap(), Line::Blank);
        assert_eq!(
            parse_line("SOMETHING p1 x").unwrap(),
            Line::Unknown("SOMETHING".to_string())
        );
        assert_eq!(parse_line("FOO").unwrap(), Line::Unknown("FOO".to_string()));
    }

    #[test]
    fn test_known_tag_without_reference_is_malformed() {
        assert_eq!(parse_line("PLAYLIST:END"), Err(RecordError::Malformed));
    }

    #[test]
    fn test_invalid_index_fails_record() {
        let err = parse_line("TRACK:NAME p1 x Song").unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidIndex {
                tag: "TRACK:NAME",
                token: "x".to_string()
            }
        );
        assert!(matches!(
            parse_line("TRACK:END p1 -1"),
            Err(RecordError::InvalidIndex { .. })
        ));
        assert_eq!(
            parse_line("TRACK:END p1"),
            Err(RecordError::MissingIndex { tag: "TRACK:END" })
        );
    }

    #[test]
    fn test_missing_value_argument() {
        assert_eq!(
            parse_line("TRACK:URI p1 0"),
            Err(RecordError::MissingArgument {
                tag: "TRACK:URI",
                what: "track uri"
            })
        );
        assert!(matches!(
            parse_line("OWNER p1"),
            Err(RecordError::MissingArgument { .. })
        ));
    }

    #[test]
    fn test_artist_name_skips_ordinal() {
        let r = record("ARTIST:NAME p1 3 0 Guns N' Roses");
        assert_eq!(
            r.command,
            Command::ArtistName {
                index: 3,
                name: "Guns N\\' Roses".to_string()
            }
        );
    }

    #[test]
    fn test_artist_uri_takes_last_argument() {
        let short = record("ARTIST:URI p1 0 spotify:artist:a");
        let long = record("ARTIST:URI p1 0 1 spotify:artist:a");
        let expected = Command::ArtistUri {
            index: 0,
            uri: "spotify:artist:a".to_string(),
        };
        assert_eq!(short.command, expected);
        assert_eq!(long.command, expected);
    }

    #[test]
    fn test_owner_is_not_escaped() {
        let r = record("OWNER p1 o'brien");
        assert_eq!(
            r.command,
            Command::Owner {
                owner: "o'brien".to_string()
            }
        );
    }

    #[test]
    fn test_record_tag_matches_command() {
        assert_eq!(record("TRACK:EPOCH p 2 1234").tag(), Tag::TrackEpoch);
        assert_eq!(record("PLAYLIST:END p").tag(), Tag::PlaylistEnd);
    }
}

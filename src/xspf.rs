//! XSPF document writer.
//!
//! Element order follows the XSPF 1 schema. Text nodes escape only `&`, `<`
//! and `>`, so backslash-escaped quotes land in the document untouched.

use crate::models::{Playlist, Track};
use anyhow::Result;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

pub const XSPF_NAMESPACE: &str = "http://xspf.org/ns/0/";
pub const XSPF_VERSION: &str = "1";

/// Serialize a playlist to a complete XSPF document.
pub fn to_xml(playlist: &Playlist) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer.write_event(Event::Start(
        BytesStart::new("playlist")
            .with_attributes([("version", XSPF_VERSION), ("xmlns", XSPF_NAMESPACE)]),
    ))?;

    write_text_element(&mut writer, "title", &playlist.title)?;
    write_optional(&mut writer, "creator", playlist.creator.as_deref())?;
    write_optional(&mut writer, "annotation", playlist.annotation.as_deref())?;

    if playlist.tracks.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("trackList")))?;
    } else {
        writer.write_event(Event::Start(BytesStart::new("trackList")))?;
        for track in &playlist.tracks {
            write_track(&mut writer, track)?;
        }
        writer.write_event(Event::End(BytesEnd::new("trackList")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("playlist")))?;

    let mut xml = writer.into_inner();
    xml.push(b'\n');
    Ok(xml)
}

fn write_track<W: Write>(writer: &mut Writer<W>, track: &Track) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new("track")))?;

    write_optional(writer, "identifier", track.identifier.as_deref())?;
    write_optional(writer, "title", track.title.as_deref())?;
    write_optional(writer, "creator", track.creator.as_deref())?;
    write_optional(writer, "album", track.album.as_deref())?;
    if let Some(num) = track.track_num {
        write_text_element(writer, "trackNum", &num.to_string())?;
    }
    write_optional(writer, "duration", track.duration.as_deref())?;

    for entry in &track.meta {
        let rel = entry.key.rel();
        writer.write_event(Event::Start(
            BytesStart::new("meta").with_attributes([("rel", rel.as_str())]),
        ))?;
        writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(
            entry.value.as_str(),
        ))))?;
        writer.write_event(Event::End(BytesEnd::new("meta")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("track")))?;
    Ok(())
}

fn write_optional<W: Write>(writer: &mut Writer<W>, name: &str, value: Option<&str>) -> Result<()> {
    match value {
        Some(text) => write_text_element(writer, name, text),
        None => Ok(()),
    }
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

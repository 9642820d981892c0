//! Per-record failure taxonomy.
//!
//! Every variant is recoverable: the driver logs it, counts it, and moves on
//! to the next line. Fatal conditions (I/O, output directory) travel as
//! `anyhow::Error` instead.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// Line has a tag but no playlist reference.
    #[error("malformed record: expected at least a tag and a playlist reference")]
    Malformed,

    #[error("{tag}: missing track index")]
    MissingIndex { tag: &'static str },

    #[error("{tag}: track index '{token}' is not a non-negative integer")]
    InvalidIndex { tag: &'static str, token: String },

    #[error("{tag}: missing {what}")]
    MissingArgument {
        tag: &'static str,
        what: &'static str,
    },

    /// Record addresses a playlist that was never opened (or already closed).
    #[error("{tag}: no open playlist for reference '{reference}'")]
    UnknownPlaylist { tag: &'static str, reference: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_tag() {
        let err = RecordError::InvalidIndex {
            tag: "TRACK:NAME",
            token: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "TRACK:NAME: track index 'abc' is not a non-negative integer"
        );

        let err = RecordError::UnknownPlaylist {
            tag: "TRACK:END",
            reference: "0xdead".to_string(),
        };
        assert!(err.to_string().contains("'0xdead'"));
    }
}

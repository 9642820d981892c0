//! Spotify playlist dump to XSPF converter - shared modules for the binary.

pub mod accumulator;
pub mod convert;
pub mod emit;
pub mod error;
pub mod models;
pub mod progress;
pub mod record;
pub mod safety;
pub mod text;
pub mod xspf;

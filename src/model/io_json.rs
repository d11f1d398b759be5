//! JSON serialization for the canonical transcription form.
//!
//! This is the crate's own surface, not an external annotation format:
//! converters hand transcriptions to the core through it and read query
//! results back out. It is also what the CLI and the round-trip tests
//! operate on.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::transcription::Transcription;
use crate::error::AnnTierError;

/// Reads a transcription from a JSON file in the canonical form.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, including when a
/// stored location violates a time invariant (malformed interval, empty
/// disjoint).
pub fn read_json(path: &Path) -> Result<Transcription, AnnTierError> {
    let file = File::open(path).map_err(AnnTierError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| AnnTierError::JsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a transcription to a JSON file in the canonical form.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_json(path: &Path, transcription: &Transcription) -> Result<(), AnnTierError> {
    let file = File::create(path).map_err(AnnTierError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, transcription).map_err(|source| {
        AnnTierError::JsonWrite {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Reads a transcription from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_json_str(json: &str) -> Result<Transcription, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a transcription from a JSON byte slice.
///
/// Used by the fuzz targets, which feed arbitrary bytes.
pub fn from_json_slice(json: &[u8]) -> Result<Transcription, serde_json::Error> {
    serde_json::from_slice(json)
}

/// Writes a transcription to a JSON string.
///
/// Useful for testing without file I/O.
pub fn to_json_string(transcription: &Transcription) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(transcription)
}

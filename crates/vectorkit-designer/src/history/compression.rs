//! Snapshot payload compression.
//!
//! Payloads are stored as a single deflated zip entry, base64 encoded so a
//! snapshot can travel in a JSON string field.

use std::io::{Cursor, Read, Write};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use vectorkit_core::HistoryError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const ENTRY_NAME: &str = "scene.json";

pub fn compress(text: &str) -> Result<String, HistoryError> {
    let failed = |e: &dyn std::fmt::Display| HistoryError::Compression {
        reason: e.to_string(),
    };

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer
        .start_file(ENTRY_NAME, options)
        .map_err(|e| failed(&e))?;
    writer
        .write_all(text.as_bytes())
        .map_err(|e| failed(&e))?;
    let buffer = writer.finish().map_err(|e| failed(&e))?.into_inner();
    Ok(STANDARD.encode(buffer))
}

/// Decodes a payload produced by [`compress`]. `step` is only used for the error.
pub fn decompress(payload: &str, step: usize) -> Result<String, HistoryError> {
    let corrupted = |reason: String| HistoryError::Corrupted { step, reason };

    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| corrupted(format!("invalid base64: {e}")))?;
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).map_err(|e| corrupted(format!("invalid archive: {e}")))?;
    let mut entry = archive
        .by_index(0)
        .map_err(|e| corrupted(format!("missing entry: {e}")))?;
    let mut text = String::new();
    entry
        .read_to_string(&mut text)
        .map_err(|e| corrupted(format!("unreadable entry: {e}")))?;
    Ok(text)
}

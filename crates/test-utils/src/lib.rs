//! # Shared Test Utilities
//!
//! Canned payloads used by test suites across the workspace.

use base64::{engine::general_purpose, Engine as _};

/// A one-pixel transparent PNG as the data URI a browser-based editor would
/// submit for an image placeholder.
pub const TINY_PNG_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// The decoded bytes of [`TINY_PNG_DATA_URI`], for asserting on files the
/// resolver wrote.
pub fn tiny_png_bytes() -> Vec<u8> {
    let payload = TINY_PNG_DATA_URI
        .split_once(',')
        .expect("data URI has a payload")
        .1;
    general_purpose::STANDARD
        .decode(payload)
        .expect("data URI payload is valid base64")
}

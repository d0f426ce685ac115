//! # Placeholder Resolution
//!
//! The generated writeup still carries the user's `[[...]]` placeholder tags.
//! This module swaps them for real content: image tags become markdown image
//! references backed by files written into the session directory, code tags
//! become fenced code blocks. It also provides the tag census used to check
//! that generation preserved every tag.
//!
//! Resolution is deliberately infallible. A payload that cannot be decoded
//! turns into a visible broken-image marker in the document instead of
//! failing the request, so one bad upload never costs the user their writeup.

use base64::{engine::general_purpose, Engine as _};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Matches one `[[...]]` placeholder tag.
const TAG_PATTERN: &str = r"\[\[[^\[\]]+\]\]";

/// What kind of content a placeholder tag stands for.
///
/// The kind is decided once per mapping entry, from the tag's prefix, so each
/// entry takes exactly one resolution path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    Image,
    Code,
    Unknown,
}

impl TagKind {
    pub fn of(tag: &str) -> Self {
        if tag.starts_with("[[img") {
            TagKind::Image
        } else if tag.starts_with("[[code") {
            TagKind::Code
        } else {
            TagKind::Unknown
        }
    }
}

/// Why an image payload could not be materialized into a session file.
#[derive(Error, Debug)]
enum ImagePayloadError {
    #[error("payload is not a data URI (missing comma separator)")]
    NotADataUri,
    #[error("base64 payload is invalid: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("failed to write image file: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes a `data:<mime>;base64,<payload>` URI into raw bytes and a file
/// extension taken from the MIME subtype.
fn decode_image_data_uri(raw: &str) -> Result<(Vec<u8>, String), ImagePayloadError> {
    let (header, payload) = raw.split_once(',').ok_or(ImagePayloadError::NotADataUri)?;

    let extension = header
        .split_once('/')
        .and_then(|(_, subtype)| subtype.split(';').next())
        .filter(|ext| !ext.is_empty())
        .unwrap_or("png")
        .to_string();

    let bytes = general_purpose::STANDARD.decode(payload.trim())?;
    Ok((bytes, extension))
}

/// Writes one decoded image into the session directory under a random name
/// and returns the file name.
fn write_session_image(session_dir: &Path, payload: &str) -> Result<String, ImagePayloadError> {
    let (bytes, extension) = decode_image_data_uri(payload)?;
    let filename = format!("{}.{extension}", Uuid::new_v4());
    fs::write(session_dir.join(&filename), bytes)?;
    Ok(filename)
}

/// Substitutes every mapped placeholder tag in `text` with its final content.
///
/// A pure fold over the mappings: each entry rewrites all occurrences of its
/// tag in the accumulated text, and entries never interact because tags are
/// unique keys. Entries whose tag does not occur are skipped before any side
/// effect, so a sentinel message or a dropped tag never leaves orphan image
/// files in the session. `session_dir` must already exist; image files land
/// there and are referenced as `{session_id}/{filename}` so the links keep
/// working after the document is unpacked from its archive.
pub fn resolve_placeholders(
    text: &str,
    mappings: &BTreeMap<String, String>,
    session_dir: &Path,
    session_id: &str,
) -> String {
    mappings.iter().fold(text.to_string(), |acc, (tag, content)| {
        if !acc.contains(tag.as_str()) {
            debug!(%tag, "Tag does not occur in the text. Skipping its mapping entry.");
            return acc;
        }
        match TagKind::of(tag) {
            TagKind::Image => {
                let replacement = match write_session_image(session_dir, content) {
                    Ok(filename) => format!("![{tag}]({session_id}/{filename})"),
                    Err(e) => {
                        warn!(%tag, error = %e, "Failed to materialize an image tag. Emitting a broken-image marker.");
                        format!("![{tag} (image unavailable)]()")
                    }
                };
                acc.replace(tag.as_str(), &replacement)
            }
            TagKind::Code => acc.replace(tag.as_str(), &format!("```\n{content}\n```")),
            TagKind::Unknown => {
                debug!(%tag, "Mapping entry has no known tag prefix. Leaving it untouched.");
                acc
            }
        }
    })
}

/// Counts every `[[...]]` tag occurrence in `text`.
pub fn tag_occurrences(text: &str) -> HashMap<String, usize> {
    let re = Regex::new(TAG_PATTERN).expect("tag pattern is a valid regex");
    let mut counts = HashMap::new();
    for tag in re.find_iter(text) {
        *counts.entry(tag.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Returns the tags whose occurrence count differs between `input` and
/// `output`, sorted for stable reporting.
///
/// The caller logs these; a count drift means the model broke the
/// tag-preservation rule, and the corresponding mappings will substitute
/// fewer (or more) times than the user expects. The output text itself is
/// never altered here.
pub fn preservation_violations(input: &str, output: &str) -> Vec<String> {
    let expected = tag_occurrences(input);
    let actual = tag_occurrences(output);

    let mut violations = Vec::new();
    for (tag, count) in &expected {
        if actual.get(tag).copied().unwrap_or(0) != *count {
            violations.push(tag.clone());
        }
    }
    for tag in actual.keys() {
        if !expected.contains_key(tag) {
            violations.push(tag.clone());
        }
    }
    violations.sort();
    violations
}

//! JSON serialization boundary for palette lists.
//!
//! # Responsibility
//! - Encode palette lists for storage and export.
//! - Decode stored lists and classify import documents as a single palette
//!   or a palette sequence.
//!
//! # Invariants
//! - `serialize` output always has a top-level array.
//! - `deserialize(serialize(list)) == list` for every list.
//! - Malformed JSON is a `Parse` error; well-formed JSON of the wrong shape
//!   is a `Shape` error.

use crate::model::palette::Palette;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// File name offered for a full export.
pub const EXPORT_ALL_FILE_NAME: &str = "palettes.json";
const FALLBACK_FILE_STEM: &str = "palette";

static UNSAFE_FILE_CHARS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"[/\\:*?"<>|\x00-\x1f]+"#).expect("valid file name regex"));

/// Serialization boundary error.
#[derive(Debug)]
pub enum CodecError {
    /// Text is not well-formed JSON.
    Parse(serde_json::Error),
    /// JSON is well-formed but not a palette or palette list.
    Shape(String),
    /// Encoding failed.
    Encode(serde_json::Error),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "malformed palette JSON: {err}"),
            Self::Shape(message) => write!(f, "unexpected palette document shape: {message}"),
            Self::Encode(err) => write!(f, "failed to encode palettes: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Shape(_) => None,
            Self::Encode(err) => Some(err),
        }
    }
}

/// Import document as decided at the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteDocument {
    /// A top-level palette object, e.g. a per-palette export.
    Single(Palette),
    /// A top-level array of palettes, e.g. a full export.
    Sequence(Vec<Palette>),
}

impl PaletteDocument {
    /// Number of palettes carried by the document.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Sequence(palettes) => palettes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Converts into a list, treating a single palette as one element.
    pub fn into_palettes(self) -> Vec<Palette> {
        match self {
            Self::Single(palette) => vec![palette],
            Self::Sequence(palettes) => palettes,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Single(_) => "single",
            Self::Sequence(_) => "sequence",
        }
    }
}

/// Encodes a palette list as pretty-printed JSON.
pub fn serialize(palettes: &[Palette]) -> Result<String, CodecError> {
    serde_json::to_string_pretty(palettes).map_err(CodecError::Encode)
}

/// Encodes one palette as a pretty-printed JSON object.
pub fn serialize_palette(palette: &Palette) -> Result<String, CodecError> {
    serde_json::to_string_pretty(palette).map_err(CodecError::Encode)
}

/// Decodes a stored palette list. The top-level value must be an array.
pub fn deserialize(text: &str) -> Result<Vec<Palette>, CodecError> {
    match parse_document(text)? {
        PaletteDocument::Sequence(palettes) => Ok(palettes),
        PaletteDocument::Single(_) => Err(CodecError::Shape(
            "expected a JSON array of palettes, got an object".to_string(),
        )),
    }
}

/// Decodes an import document into its tagged form.
pub fn parse_document(text: &str) -> Result<PaletteDocument, CodecError> {
    let value: Value = serde_json::from_str(text).map_err(CodecError::Parse)?;
    match value {
        Value::Array(_) => serde_json::from_value::<Vec<Palette>>(value)
            .map(PaletteDocument::Sequence)
            .map_err(|err| CodecError::Shape(err.to_string())),
        Value::Object(_) => serde_json::from_value::<Palette>(value)
            .map(PaletteDocument::Single)
            .map_err(|err| CodecError::Shape(err.to_string())),
        other => Err(CodecError::Shape(format!(
            "expected a palette object or array, got {}",
            json_kind(&other)
        ))),
    }
}

/// Suggested download file name for one palette export.
///
/// Path-unsafe characters are replaced with `_`; a blank title falls back to
/// `palette.json`.
pub fn export_file_name(title: &str) -> String {
    let cleaned = UNSAFE_FILE_CHARS_RE.replace_all(title.trim(), "_");
    let stem = cleaned.trim_matches(|c: char| c == '.' || c.is_whitespace());
    if stem.is_empty() {
        format!("{FALLBACK_FILE_STEM}.json")
    } else {
        format!("{stem}.json")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::{export_file_name, parse_document, CodecError};

    #[test]
    fn export_file_name_replaces_unsafe_characters() {
        assert_eq!(export_file_name("Web / Dark: v2"), "Web _ Dark_ v2.json");
        assert_eq!(export_file_name("Paleta 1"), "Paleta 1.json");
    }

    #[test]
    fn export_file_name_falls_back_for_blank_titles() {
        assert_eq!(export_file_name(""), "palette.json");
        assert_eq!(export_file_name("   "), "palette.json");
        assert_eq!(export_file_name(".."), "palette.json");
    }

    #[test]
    fn scalar_documents_are_shape_errors() {
        let err = parse_document("42").unwrap_err();
        assert!(matches!(err, CodecError::Shape(ref message) if message.contains("number")));
    }
}

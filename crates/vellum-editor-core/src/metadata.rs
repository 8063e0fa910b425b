//! Persisted content metadata codec.
//!
//! Selection state and the dark-mode flag ride along with serialized content
//! as a trailing HTML comment:
//!
//! ```text
//! <div>hello</div><!--{"type":0,"isDarkMode":false,"start":[0,0],"end":[0,5]}-->
//! ```
//!
//! The comment is strictly out-of-band: stripping it reproduces the captured
//! content byte-for-byte, and a malformed comment is treated as plain content
//! rather than an error.

use smol_str::SmolStr;

use crate::types::{CellCoord, ContentMetadata, NodePath, SelectionMetadata};

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Wire shape of the metadata comment. The selection variant is picked by the
/// numeric `type` field, so a single loose struct covers all three.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
struct RawMetadata {
    #[serde(rename = "type")]
    type_code: u8,
    #[serde(rename = "isDarkMode", default)]
    is_dark_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<NodePath>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<NodePath>,
    #[serde(rename = "tableId", skip_serializing_if = "Option::is_none")]
    table_id: Option<SmolStr>,
    #[serde(rename = "firstCell", skip_serializing_if = "Option::is_none")]
    first_cell: Option<CellCoord>,
    #[serde(rename = "lastCell", skip_serializing_if = "Option::is_none")]
    last_cell: Option<CellCoord>,
    #[serde(rename = "imageId", skip_serializing_if = "Option::is_none")]
    image_id: Option<SmolStr>,
}

impl From<&ContentMetadata> for RawMetadata {
    fn from(metadata: &ContentMetadata) -> Self {
        let mut raw = RawMetadata {
            type_code: metadata.selection.type_code(),
            is_dark_mode: metadata.is_dark_mode,
            start: None,
            end: None,
            table_id: None,
            first_cell: None,
            last_cell: None,
            image_id: None,
        };
        match &metadata.selection {
            SelectionMetadata::Normal { start, end } => {
                raw.start = Some(start.clone());
                raw.end = Some(end.clone());
            }
            SelectionMetadata::Table {
                table_id,
                first_cell,
                last_cell,
            } => {
                raw.table_id = Some(table_id.clone());
                raw.first_cell = Some(*first_cell);
                raw.last_cell = Some(*last_cell);
            }
            SelectionMetadata::Image { image_id } => {
                raw.image_id = Some(image_id.clone());
            }
        }
        raw
    }
}

impl RawMetadata {
    fn into_metadata(self) -> Option<ContentMetadata> {
        let selection = match self.type_code {
            0 => SelectionMetadata::Normal {
                start: self.start?,
                end: self.end?,
            },
            1 => SelectionMetadata::Table {
                table_id: self.table_id?,
                first_cell: self.first_cell?,
                last_cell: self.last_cell?,
            },
            2 => SelectionMetadata::Image {
                image_id: self.image_id?,
            },
            _ => return None,
        };
        Some(ContentMetadata {
            is_dark_mode: self.is_dark_mode,
            selection,
        })
    }
}

/// Append a metadata comment to `content`.
pub fn embed_metadata(content: &str, metadata: &ContentMetadata) -> String {
    let raw = RawMetadata::from(metadata);
    // RawMetadata has no failing serialize paths; fall back to the bare
    // content if that ever changes.
    match serde_json::to_string(&raw) {
        Ok(json) => format!("{content}{COMMENT_OPEN}{json}{COMMENT_CLOSE}"),
        Err(err) => {
            tracing::warn!(target: "vellum::metadata", %err, "metadata serialization failed");
            content.to_string()
        }
    }
}

/// Split `content` into the bare content and its trailing metadata, if any.
///
/// The comment is only stripped when it parses as metadata; a trailing
/// comment that is not ours stays part of the content.
pub fn extract_metadata(content: &str) -> (&str, Option<ContentMetadata>) {
    let Some(stripped) = content.strip_suffix(COMMENT_CLOSE) else {
        return (content, None);
    };
    let Some(open) = stripped.rfind(COMMENT_OPEN) else {
        return (content, None);
    };
    let json = &stripped[open + COMMENT_OPEN.len()..];
    match serde_json::from_str::<RawMetadata>(json) {
        Ok(raw) => match raw.into_metadata() {
            Some(metadata) => (&content[..open], Some(metadata)),
            None => (content, None),
        },
        Err(_) => (content, None),
    }
}

/// Parse just the metadata out of a content string.
pub fn parse_metadata(content: &str) -> Option<ContentMetadata> {
    extract_metadata(content).1
}

/// Drop the metadata comment, returning the bare content.
pub fn strip_metadata(content: &str) -> &str {
    extract_metadata(content).0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normal_metadata() -> ContentMetadata {
        ContentMetadata {
            is_dark_mode: false,
            selection: SelectionMetadata::Normal {
                start: NodePath::from(vec![0, 0]),
                end: NodePath::from(vec![0, 5]),
            },
        }
    }

    #[test]
    fn test_embed_snapshot() {
        let embedded = embed_metadata("<div>hello</div>", &normal_metadata());
        insta::assert_snapshot!(embedded);
    }

    #[test]
    fn test_round_trip_normal() {
        let content = "<div>hello</div>";
        let metadata = normal_metadata();

        let embedded = embed_metadata(content, &metadata);
        let (stripped, parsed) = extract_metadata(&embedded);

        assert_eq!(stripped, content);
        assert_eq!(parsed, Some(metadata));
    }

    #[test]
    fn test_round_trip_table() {
        let metadata = ContentMetadata {
            is_dark_mode: true,
            selection: SelectionMetadata::Table {
                table_id: "table-1".into(),
                first_cell: CellCoord::new(0, 1),
                last_cell: CellCoord::new(2, 3),
            },
        };
        let embedded = embed_metadata("<table id=\"table-1\"></table>", &metadata);
        assert_eq!(parse_metadata(&embedded), Some(metadata));
    }

    #[test]
    fn test_round_trip_image() {
        let metadata = ContentMetadata {
            is_dark_mode: false,
            selection: SelectionMetadata::Image {
                image_id: "img-7".into(),
            },
        };
        let embedded = embed_metadata("<img id=\"img-7\" />", &metadata);
        let (stripped, parsed) = extract_metadata(&embedded);
        assert_eq!(stripped, "<img id=\"img-7\" />");
        assert_eq!(parsed, Some(metadata));
    }

    #[test]
    fn test_re_embedding_is_byte_identical() {
        let metadata = normal_metadata();
        let embedded = embed_metadata("<p>x</p>", &metadata);
        let (stripped, parsed) = extract_metadata(&embedded);
        let re_embedded = embed_metadata(stripped, &parsed.unwrap());
        assert_eq!(re_embedded, embedded);
    }

    #[test]
    fn test_malformed_comment_is_content() {
        let content = "<div>a</div><!--not json-->";
        let (stripped, parsed) = extract_metadata(content);
        assert_eq!(stripped, content);
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_unknown_type_code_is_content() {
        let content = "<div>a</div><!--{\"type\":9,\"isDarkMode\":false}-->";
        let (stripped, parsed) = extract_metadata(content);
        assert_eq!(stripped, content);
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_no_comment() {
        let (stripped, parsed) = extract_metadata("<div>plain</div>");
        assert_eq!(stripped, "<div>plain</div>");
        assert_eq!(parsed, None);
    }

    #[test]
    fn test_comment_in_middle_is_not_metadata() {
        let content = "<div><!--{\"type\":0}--></div>";
        let (stripped, parsed) = extract_metadata(content);
        assert_eq!(stripped, content);
        assert_eq!(parsed, None);
    }
}

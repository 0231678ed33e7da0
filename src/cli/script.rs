//! JSON-lines scripts of ingestion events and queries.
//!
//! One JSON object per line, tagged by `"op"`:
//!
//! ```text
//! {"op":"add_slice","peer_id":1,"type":"photo","message_ids":[10,20],"no_skip_range":{"from":0,"till":20},"count":2}
//! {"op":"add_new","peer_id":1,"types":["photo"],"message_id":30}
//! {"op":"query","peer_id":1,"type":"photo","message_id":20,"limit_before":1,"limit_after":1}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{
    in_history, MediaError, MediaResult, MsgId, MsgRange, PeerId, SharedMediaAddExisting,
    SharedMediaAddNew, SharedMediaAddSlice, SharedMediaRemoveAll, SharedMediaRemoveOne,
    SharedMediaType,
};

/// A query line. Missing limits fall back to the configured defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptQuery {
    pub peer_id: PeerId,
    #[serde(rename = "type")]
    pub media_type: SharedMediaType,
    pub message_id: MsgId,
    #[serde(default)]
    pub limit_before: Option<usize>,
    #[serde(default)]
    pub limit_after: Option<usize>,
    /// Keep the query open for the rest of the script and report every
    /// change to its result.
    #[serde(default)]
    pub live: bool,
}

/// One script line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptOp {
    AddNew(SharedMediaAddNew),
    AddExisting(SharedMediaAddExisting),
    AddSlice(SharedMediaAddSlice),
    RemoveOne(SharedMediaRemoveOne),
    RemoveAll(SharedMediaRemoveAll),
    Query(ScriptQuery),
}

impl ScriptOp {
    fn range(&self) -> Option<MsgRange> {
        match self {
            Self::AddExisting(event) => Some(event.no_skip_range),
            Self::AddSlice(event) => Some(event.no_skip_range),
            _ => None,
        }
    }

    /// Message ids the op records or removes.
    fn message_ids(&self) -> &[MsgId] {
        match self {
            Self::AddNew(event) => std::slice::from_ref(&event.message_id),
            Self::AddExisting(event) => std::slice::from_ref(&event.message_id),
            Self::AddSlice(event) => &event.message_ids,
            Self::RemoveOne(event) => std::slice::from_ref(&event.message_id),
            Self::RemoveAll(_) | Self::Query(_) => &[],
        }
    }
}

/// A parsed line with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub op: ScriptOp,
}

/// Parse a whole script.
pub fn parse_script(content: &str) -> MediaResult<Vec<ScriptLine>> {
    let mut lines = Vec::new();
    for (index, raw) in content.lines().enumerate() {
        let text = raw.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }
        let line = index + 1;
        let op: ScriptOp =
            serde_json::from_str(text).map_err(|source| MediaError::Script { line, source })?;
        if let Some(range) = op.range() {
            MsgRange::try_new(range.from, range.till)?;
        }
        if let Some(&id) = op.message_ids().iter().find(|id| !in_history(**id)) {
            return Err(MediaError::InvalidMessageId { line, id });
        }
        lines.push(ScriptLine { line, op });
    }
    Ok(lines)
}

/// Read and parse a script file.
pub fn load_script(path: &Path) -> MediaResult<Vec<ScriptLine>> {
    let content = std::fs::read_to_string(path)?;
    parse_script(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SharedMediaTypesMask;

    #[test]
    fn parses_every_op() {
        let script = r#"
# history page
{"op":"add_slice","peer_id":1,"type":"photo","message_ids":[10,20],"no_skip_range":{"from":0,"till":20},"count":2}
{"op":"add_new","peer_id":1,"types":["photo","file"],"message_id":30}
{"op":"add_existing","peer_id":1,"types":["gif"],"message_id":5,"no_skip_range":{"from":1,"till":9}}
{"op":"remove_one","peer_id":1,"types":["photo"],"message_id":10}
{"op":"remove_all","peer_id":1}
{"op":"query","peer_id":1,"type":"photo","message_id":20,"limit_before":1}
"#;
        let lines = parse_script(script).unwrap();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0].line, 3);
        match &lines[1].op {
            ScriptOp::AddNew(event) => {
                assert_eq!(
                    event.types,
                    SharedMediaTypesMask::single(SharedMediaType::Photo) | SharedMediaType::File
                );
            }
            other => panic!("unexpected op {:?}", other),
        }
        match &lines[5].op {
            ScriptOp::Query(query) => {
                assert_eq!(query.limit_before, Some(1));
                assert_eq!(query.limit_after, None);
                assert!(!query.live);
            }
            other => panic!("unexpected op {:?}", other),
        }
    }

    #[test]
    fn reports_line_of_bad_json() {
        let err = parse_script("{\"op\":\"remove_all\",\"peer_id\":1}\n{\"op\":\"bogus\"}\n")
            .unwrap_err();
        assert!(matches!(err, MediaError::Script { line: 2, .. }));
    }

    #[test]
    fn rejects_inverted_range() {
        let err = parse_script(
            r#"{"op":"add_slice","peer_id":1,"type":"link","message_ids":[],"no_skip_range":{"from":9,"till":3}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::InvalidRange { from: 9, till: 3 }));
    }

    #[test]
    fn rejects_ids_past_end_sentinel() {
        let script = r#"{"op":"remove_all","peer_id":1}
{"op":"add_new","peer_id":1,"types":["photo"],"message_id":2000000000}
"#;
        let err = parse_script(script).unwrap_err();
        assert!(matches!(
            err,
            MediaError::InvalidMessageId { line: 2, id: 2_000_000_000 }
        ));

        let err = parse_script(
            r#"{"op":"remove_one","peer_id":1,"types":["file"],"message_id":-4}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::InvalidMessageId { line: 1, id: -4 }));
    }

    #[test]
    fn rejects_range_past_start_sentinel() {
        let err = parse_script(
            r#"{"op":"add_slice","peer_id":1,"type":"photo","message_ids":[-3,5],"no_skip_range":{"from":-10,"till":10}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, MediaError::InvalidRange { from: -10, till: 10 }));
    }
}

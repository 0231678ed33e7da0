//! CLI command implementations.

use std::path::Path;

use crate::config::MediaConfig;
use crate::types::{
    MediaResult, MsgId, PeerId, SharedMediaResult, SharedMediaType, SharedMediaTypesMask,
};

use super::replay::{Replay, ReplayEntry};
use super::script::{load_script, ScriptQuery};

/// Replay a script and print every notification and query result.
pub fn cmd_replay(path: &Path, config: MediaConfig, json: bool) -> MediaResult<()> {
    let lines = load_script(path)?;
    let mut replay = Replay::new(config);
    replay.run(lines);

    let entries = replay.take_entries();
    if json {
        let values: Vec<serde_json::Value> = entries.iter().map(entry_json).collect();
        println!(
            "{}",
            serde_json::to_string_pretty(&values).unwrap_or_default()
        );
    } else {
        for entry in &entries {
            println!("{}", entry_text(entry));
        }
    }
    Ok(())
}

/// Replay a script, then answer one query.
#[allow(clippy::too_many_arguments)]
pub fn cmd_query(
    path: &Path,
    config: MediaConfig,
    peer_id: PeerId,
    media_type: SharedMediaType,
    anchor: MsgId,
    limit_before: Option<usize>,
    limit_after: Option<usize>,
    json: bool,
) -> MediaResult<()> {
    let lines = load_script(path)?;
    let mut replay = Replay::new(config);
    replay.run(lines);

    let query = replay.resolve_query(&ScriptQuery {
        peer_id,
        media_type,
        message_id: anchor,
        limit_before,
        limit_after,
        live: false,
    });
    let result = replay.media().query_snapshot(&query);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "query": query,
                "result": result,
            }))
            .unwrap_or_default()
        );
    } else {
        println!(
            "Query {} {} around {} (-{} / +{})",
            peer_id, media_type, anchor, query.limit_before, query.limit_after
        );
        println!("{}", result_text(&result));
    }
    Ok(())
}

/// Replay a script, then summarize every list of the given types.
pub fn cmd_stats(
    path: &Path,
    config: MediaConfig,
    types: SharedMediaTypesMask,
    json: bool,
) -> MediaResult<()> {
    let lines = load_script(path)?;
    let mut replay = Replay::new(config);
    replay.run(lines);
    let stats: Vec<_> = replay
        .media()
        .stats()
        .into_iter()
        .filter(|s| types.contains(s.media_type))
        .collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).unwrap_or_default()
        );
    } else if stats.is_empty() {
        println!("No shared media indexed.");
    } else {
        println!("Conversations: {}", replay.media().peers().count());
        for s in &stats {
            println!(
                "  peer {} {}: {} slices, {} known ids, total {}",
                s.peer_id,
                s.media_type,
                s.slices,
                s.known_ids,
                format_optional(s.count)
            );
        }
    }
    Ok(())
}

fn entry_json(entry: &ReplayEntry) -> serde_json::Value {
    match entry {
        ReplayEntry::SliceUpdated(update) => serde_json::json!({
            "event": "slice_updated",
            "peer_id": update.peer_id,
            "type": update.media_type,
            "message_ids": update.messages.as_slice(),
            "range": update.range,
            "count": update.count,
        }),
        ReplayEntry::OneRemoved(event) => serde_json::json!({
            "event": "one_removed",
            "peer_id": event.peer_id,
            "types": event.types,
            "message_id": event.message_id,
        }),
        ReplayEntry::AllRemoved(event) => serde_json::json!({
            "event": "all_removed",
            "peer_id": event.peer_id,
        }),
        ReplayEntry::QueryResult {
            line,
            query,
            result,
        } => serde_json::json!({
            "event": "query_result",
            "line": line,
            "query": query,
            "result": result,
        }),
    }
}

fn entry_text(entry: &ReplayEntry) -> String {
    match entry {
        ReplayEntry::SliceUpdated(update) => format!(
            "slice  peer {} {} {} ids={:?} total={}",
            update.peer_id,
            update.media_type,
            update.range,
            update.messages,
            format_optional(update.count)
        ),
        ReplayEntry::OneRemoved(event) => format!(
            "remove peer {} message {} from {:?}",
            event.peer_id,
            event.message_id,
            event.types.iter().map(|t| t.name()).collect::<Vec<_>>()
        ),
        ReplayEntry::AllRemoved(event) => format!("clear  peer {}", event.peer_id),
        ReplayEntry::QueryResult {
            line,
            query,
            result,
        } => format!(
            "query  line {} peer {} {} @{}: {}",
            line,
            query.key.peer_id,
            query.key.media_type,
            query.key.message_id,
            result_text(result)
        ),
    }
}

fn result_text(result: &SharedMediaResult) -> String {
    format!(
        "ids={:?} skipped_before={} skipped_after={} total={}",
        result.message_ids,
        format_optional(result.skipped_before),
        format_optional(result.skipped_after),
        format_optional(result.count)
    )
}

fn format_optional(value: Option<usize>) -> String {
    value.map_or_else(|| "?".to_string(), |v| v.to_string())
}

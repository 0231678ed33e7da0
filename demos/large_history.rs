//! Page through a large history in random order and watch the slices merge.

use std::time::Instant;

use shared_media::*;

const HISTORY: MsgId = 1_000_000;
const PAGE: MsgId = 5_000;

fn main() {
    let mut list = SharedMediaList::new();
    let pages = HISTORY / PAGE;

    // Visit pages in a scattered but deterministic order
    let order: Vec<MsgId> = (0..pages).map(|i| (i * 37) % pages).collect();

    let start = Instant::now();
    for (visited, page) in order.iter().enumerate() {
        let from = page * PAGE + 1;
        let till = from + PAGE - 1;
        let from = if from == 1 { HISTORY_START } else { from };
        let till = if till == HISTORY { HISTORY_END } else { till };
        let ids = (from.max(1)..=till.min(HISTORY)).filter(|id| id % 3 == 0);
        list.add_slice(ids, MsgRange::new(from, till), None);

        if visited % 40 == 0 {
            println!(
                "{:>4} pages: {:>4} slices, {:>7} ids known",
                visited + 1,
                list.slice_count(),
                list.known_ids()
            );
        }
    }
    println!(
        "ingested {} pages in {:?}: {} slice(s), {} ids",
        pages,
        start.elapsed(),
        list.slice_count(),
        list.known_ids()
    );

    let query = SharedMediaQuery::new(
        SharedMediaKey::new(1, SharedMediaType::File, HISTORY / 2),
        10,
        10,
    );
    let start = Instant::now();
    let result = list.query(&query);
    println!(
        "window around {}: {:?} (skipped {:?} / {:?}) in {:?}",
        HISTORY / 2,
        result.message_ids,
        result.skipped_before,
        result.skipped_after,
        start.elapsed()
    );
}

//! Basic ingest -> live query -> mutate flow.

use std::cell::RefCell;
use std::rc::Rc;

use shared_media::*;

fn main() {
    let peer: PeerId = 1;
    let mut media = SharedMedia::new();

    // Print every slice change
    let _updates = media.slice_updated().subscribe(|update| {
        println!(
            "slice changed: peer {} {} {} -> {} ids",
            update.peer_id,
            update.media_type,
            update.range,
            update.messages.len()
        );
    });

    // First page of photo history: everything from the start up to 30
    media.add_slice(SharedMediaAddSlice::new(
        peer,
        SharedMediaType::Photo,
        vec![10, 20, 30],
        MsgRange::new(HISTORY_START, 30),
        Some(5),
    ));

    // Watch a window around message 20
    let latest = Rc::new(RefCell::new(SharedMediaResult::default()));
    let sink = Rc::clone(&latest);
    let live = media.query(
        SharedMediaQuery::new(SharedMediaKey::new(peer, SharedMediaType::Photo, 20), 1, 1),
        move |result| {
            println!(
                "window: {:?} (skipped before {:?}, after {:?}, total {:?})",
                result.message_ids, result.skipped_before, result.skipped_after, result.count
            );
            *sink.borrow_mut() = result.clone();
        },
    );

    // A deletion, then a new message, then the page that closes the gap
    media.remove_one(SharedMediaRemoveOne::new(peer, SharedMediaType::Photo, 20));
    media.add_new(SharedMediaAddNew::new(peer, SharedMediaType::Photo, 40));
    media.add_slice(SharedMediaAddSlice::new(
        peer,
        SharedMediaType::Photo,
        (31..=39).collect(),
        MsgRange::new(30, 40),
        Some(14),
    ));

    println!("last delivered window: {:?}", latest.borrow().message_ids);
    drop(live);

    for stats in media.stats() {
        println!(
            "peer {} {}: {} slices, {} ids known, total {:?}",
            stats.peer_id, stats.media_type, stats.slices, stats.known_ids, stats.count
        );
    }
}

//! Channel aggregate maintenance
//!
//! Each channel in `meta/threads` caches its thread count and pointers to
//! the latest thread and reply. The aggregate is updated opportunistically:
//! read the whole list, rewrite the matching entry, write the list back.
//!
//! # Design
//!
//! - The list transforms (`with_*`) are pure and return whether a channel
//!   matched; the `record_*` functions do the read-modify-write.
//! - No per-channel locking. Two concurrent writers in the same channel race
//!   and the later write wins, which can drop an increment.
//! - An unknown channel leaves the list unchanged and logs a warning.

use crate::meta;
use pelilauta_core::schema::{Channel, LatestEntry, Reply, Thread};
use pelilauta_core::Result;
use pelilauta_engine::Database;
use tracing::{debug, warn};

/// Pointer to a thread as stored in the channel aggregate
pub fn thread_entry(thread: &Thread) -> LatestEntry {
    LatestEntry {
        key: thread.key.clone(),
        created_at: thread.created_at,
        author: thread.author().to_string(),
    }
}

/// Pointer to a reply as stored in the channel aggregate
pub fn reply_entry(reply: &Reply) -> LatestEntry {
    LatestEntry {
        key: reply.key.clone(),
        created_at: reply.created_at,
        author: reply.author().to_string(),
    }
}

/// Channel list after `thread` was created
///
/// The matching channel's count goes up by one, its latest-thread and
/// latest-reply pointers both point at the new thread, and its flow time
/// becomes the thread's.
pub fn with_new_thread(mut topics: Vec<Channel>, thread: &Thread) -> (Vec<Channel>, bool) {
    let entry = thread_entry(thread);
    let mut matched = false;
    for channel in topics.iter_mut().filter(|c| c.slug == thread.channel) {
        channel.thread_count += 1;
        channel.latest_thread = Some(entry.clone());
        channel.latest_reply = Some(entry.clone());
        channel.flow_time = thread.flow_time;
        matched = true;
    }
    (topics, matched)
}

/// Channel list after a thread in `slug` was removed
///
/// The count never drops below zero.
pub fn with_removed_thread(mut topics: Vec<Channel>, slug: &str) -> (Vec<Channel>, bool) {
    let mut matched = false;
    for channel in topics.iter_mut().filter(|c| c.slug == slug) {
        channel.thread_count = (channel.thread_count - 1).max(0);
        matched = true;
    }
    (topics, matched)
}

/// Channel list after a reply was added to a thread in `slug`
pub fn with_new_reply(
    mut topics: Vec<Channel>,
    slug: &str,
    entry: LatestEntry,
    flow_time: i64,
) -> (Vec<Channel>, bool) {
    let mut matched = false;
    for channel in topics.iter_mut().filter(|c| c.slug == slug) {
        channel.latest_reply = Some(entry.clone());
        channel.flow_time = channel.flow_time.max(flow_time);
        matched = true;
    }
    (topics, matched)
}

fn rewrite(
    db: &Database,
    slug: &str,
    event: &'static str,
    transform: impl FnOnce(Vec<Channel>) -> (Vec<Channel>, bool),
) -> Result<bool> {
    let mut meta = meta::channels(db)?;
    let (topics, matched) = transform(std::mem::take(&mut meta.topics));
    meta.topics = topics;

    if !matched {
        warn!(target: "pelilauta::channels", channel = slug, event, "No channel matches; list written back unchanged");
    }
    meta::save_channels(db, &meta)?;
    debug!(target: "pelilauta::channels", channel = slug, event, matched, "Channel aggregate updated");
    Ok(matched)
}

/// Apply [`with_new_thread`] to the stored list
pub fn record_new_thread(db: &Database, thread: &Thread) -> Result<bool> {
    rewrite(db, &thread.channel, "thread_created", |topics| {
        with_new_thread(topics, thread)
    })
}

/// Apply [`with_removed_thread`] to the stored list
pub fn record_removed_thread(db: &Database, slug: &str) -> Result<bool> {
    rewrite(db, slug, "thread_removed", |topics| {
        with_removed_thread(topics, slug)
    })
}

/// Apply [`with_new_reply`] to the stored list
pub fn record_new_reply(db: &Database, slug: &str, reply: &Reply) -> Result<bool> {
    let entry = reply_entry(reply);
    rewrite(db, slug, "reply_added", |topics| {
        with_new_reply(topics, slug, entry, reply.flow_time)
    })
}

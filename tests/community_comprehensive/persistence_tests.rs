//! Tier 2: Snapshot Persistence
//!
//! A flushed database reopened from the same directory sees every document,
//! including the denormalized aggregates, exactly as written.

use super::test_utils::*;
use pelilauta_engine::PersistenceMode;
use serde_json::json;
use tempfile::TempDir;

#[test]
fn test_flush_and_reopen() {
    let dir = TempDir::new().unwrap();
    let (thread_key, reply_key) = {
        let c = TestCommunity::persistent(dir.path());
        assert_eq!(c.db.persistence_mode(), PersistenceMode::Snapshot);
        let thread = c
            .threads
            .create_thread("owner", &json!({"title": "Pysyvä", "channel": "dnd", "tags": ["Arkisto"]}))
            .unwrap();
        let reply = c
            .replies
            .add_reply("u2", &thread.key, &json!({"markdownContent": "moi"}))
            .unwrap();
        c.sites.create_site("gm", &json!({"name": "Wiki"})).unwrap();
        c.pages
            .create_page("gm", "wiki", &json!({"name": "Etusivu", "markdownContent": "v1"}))
            .unwrap();
        c.pages
            .update_page("gm", "wiki", "etusivu", &json!({"markdownContent": "v2"}))
            .unwrap();

        let info = c.db.flush().unwrap().expect("snapshot written");
        assert!(info.documents > 0);
        (thread.key, reply.key)
    };

    let c = TestCommunity::persistent(dir.path());
    let thread = c.threads.require_thread(&thread_key).unwrap();
    assert_eq!(thread.reply_count, 1);
    assert!(c.replies.get_reply(&thread_key, &reply_key).unwrap().is_some());
    assert_eq!(c.channel_count("dnd"), 1);
    assert_eq!(c.tags.entries_for_tag("arkisto").unwrap().len(), 1);
    assert_eq!(c.pages.revert_page_content("wiki", "etusivu", 1).unwrap(), "v1");
    assert_eq!(
        c.notifications.list_notifications("owner").unwrap().len(),
        1
    );
}

#[test]
fn test_unflushed_writes_are_lost() {
    let dir = TempDir::new().unwrap();
    {
        let c = TestCommunity::persistent(dir.path());
        c.db.flush().unwrap();
        c.threads.create_thread("owner", &json!({"title": "Hetkellinen"})).unwrap();
    }
    let c = TestCommunity::persistent(dir.path());
    assert!(c.threads.list_threads(None, 10, true).unwrap().is_empty());
}

#[test]
fn test_ephemeral_flush_is_noop() {
    let c = TestCommunity::new();
    assert_eq!(c.db.persistence_mode(), PersistenceMode::Ephemeral);
    assert!(c.db.flush().unwrap().is_none());
}

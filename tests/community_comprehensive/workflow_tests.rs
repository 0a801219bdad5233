//! Tier 2: Behavioral Workflows
//!
//! Complete user journeys across several facades.

use super::test_utils::*;
use pelilauta_core::schema::EntryType;
use pelilauta_core::Error;
use serde_json::json;

#[test]
fn test_new_member_journey() {
    let c = TestCommunity::new();
    c.accounts.create_account("u1", &json!({})).unwrap();
    c.accounts.accept_eula("u1").unwrap();
    c.profiles
        .create_profile("u1", "u1", &json!({"nick": "Aino", "tags": ["GM"]}))
        .unwrap();
    c.accounts.record_login("u1").unwrap();

    let thread = c
        .threads
        .create_thread("u1", &json!({"title": "Esittäytyminen", "markdownContent": "Moi! #uusi"}))
        .unwrap();
    assert!(thread.tags.contains(&"uusi".to_string()));
    assert_eq!(c.threads.list_threads_by_owner("u1").unwrap().len(), 1);
    assert_eq!(c.channel_count("yleinen"), 1);

    // others welcome the newcomer
    for uid in ["u2", "u3"] {
        c.replies
            .add_reply(uid, &thread.key, &json!({"markdownContent": "Tervetuloa!"}))
            .unwrap();
        c.reactions.toggle_love(uid, &thread.key).unwrap();
    }
    let thread = c.threads.require_thread(&thread.key).unwrap();
    assert_eq!(thread.reply_count, 2);
    assert_eq!(thread.loved_count, 2);

    let inbox = c.notifications.list_notifications("u1").unwrap();
    assert_eq!(inbox.len(), 4);
    assert_eq!(c.notifications.mark_all_read("u1").unwrap(), 4);
    assert_eq!(c.notifications.unread_count("u1").unwrap(), 0);

    let channels = c.meta.channels().unwrap();
    let latest_reply = channels.find("yleinen").unwrap().latest_reply.clone().unwrap();
    assert_eq!(latest_reply.author, "u3");
}

#[test]
fn test_thread_deletion_cascade() {
    let c = TestCommunity::new();
    let thread = c
        .threads
        .create_thread("owner", &json!({"title": "Poistuva", "channel": "dnd", "tags": ["x"]}))
        .unwrap();
    let reply = c
        .replies
        .add_reply("u2", &thread.key, &json!({"markdownContent": "moi"}))
        .unwrap();
    c.reactions.toggle_love("u2", &thread.key).unwrap();
    c.reactions.toggle_love("owner", &reply.key).unwrap();

    c.threads.delete_thread("owner", &thread.key).unwrap();

    assert!(c.threads.get_thread(&thread.key).unwrap().is_none());
    assert!(c.replies.list_replies(&thread.key).unwrap().is_empty());
    assert!(c.reactions.get_reactions(&thread.key).unwrap().love.is_empty());
    assert!(c.reactions.get_reactions(&reply.key).unwrap().love.is_empty());
    assert!(c.tags.get(&thread.key).unwrap().is_none());
    assert_eq!(c.channel_count("dnd"), 0);
}

#[test]
fn test_wiki_workflow() {
    let c = TestCommunity::new();
    let site = c
        .sites
        .create_site("gm", &json!({"name": "Kadonneet Kaupungit", "system": "dnd5e"}))
        .unwrap();
    assert_eq!(site.key, "kadonneet-kaupungit");

    c.pages
        .create_page("gm", &site.key, &json!({"name": "Etusivu", "markdownContent": "Alku"}))
        .unwrap();
    c.pages
        .create_page("gm", &site.key, &json!({"name": "Hahmot", "tags": ["NPC"]}))
        .unwrap();
    assert!(matches!(
        c.pages.create_page("gm", &site.key, &json!({"name": "etusivu"})),
        Err(Error::AlreadyExists(_))
    ));

    let site = c.sites.require_site(&site.key).unwrap();
    assert_eq!(site.homepage.as_deref(), Some("etusivu"));
    assert_eq!(site.page_refs.len(), 2);

    let entries = c.tags.entries_for_tag("npc").unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entry_type, EntryType::Page);

    c.pages.delete_page("gm", &site.key, "hahmot").unwrap();
    let site = c.sites.require_site(&site.key).unwrap();
    assert_eq!(site.page_refs.len(), 1);
    assert!(c.tags.entries_for_tag("npc").unwrap().is_empty());

    c.sites.delete_site("gm", &site.key).unwrap();
    assert!(c.pages.list_pages(&site.key).unwrap().is_empty());
}

#[test]
fn test_character_sheets() {
    let c = TestCommunity::new();
    let sheet = c
        .sheets
        .create_sheet("u1", &json!({"name": "Aino", "system": "dnd5e"}))
        .unwrap();
    c.sheets
        .update_sheet("u1", &sheet.key, &json!({"stats": [{"type": "number", "key": "hp", "value": 12}]}))
        .unwrap();
    let listed = c.sheets.list_sheets_for_owner("u1").unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].stats[0].key, "hp");
    c.sheets.delete_sheet(ADMIN, &sheet.key).unwrap();
    assert!(c.sheets.list_sheets_for_owner("u1").unwrap().is_empty());
}

#[test]
fn test_channel_management() {
    let c = TestCommunity::new();
    c.meta
        .add_channel(ADMIN, &json!({"slug": "osr", "name": "OSR"}))
        .unwrap();
    assert!(matches!(
        c.meta.add_channel(ADMIN, &json!({"slug": "osr", "name": "OSR"})),
        Err(Error::AlreadyExists(_))
    ));
    assert!(c.meta.add_channel("owner", &json!({"slug": "x", "name": "X"})).is_err());

    c.threads
        .create_thread("owner", &json!({"title": "Vanhan koulun peli", "channel": "osr"}))
        .unwrap();
    assert_eq!(c.channel_count("osr"), 1);
}

//! Tier 2: Authorization Scenarios
//!
//! Owners change their own content, admins change anything, frozen users
//! create nothing.

use super::test_utils::*;
use pelilauta_core::Error;
use serde_json::json;

#[test]
fn test_admin_overrides_ownership() {
    let c = TestCommunity::new();
    let thread = c.threads.create_thread("owner", &json!({"title": "Hei"})).unwrap();

    assert!(matches!(
        c.threads.update_thread("stranger", &thread.key, &json!({"title": "x"})),
        Err(Error::Unauthorized(_))
    ));
    let updated = c
        .threads
        .update_thread(ADMIN, &thread.key, &json!({"sticky": true}))
        .unwrap();
    assert!(updated.sticky);
    assert_eq!(updated.owners, vec!["owner".to_string()]);

    c.threads.delete_thread(ADMIN, &thread.key).unwrap();
    assert!(c.threads.get_thread(&thread.key).unwrap().is_none());
}

#[test]
fn test_frozen_user_cannot_create() {
    let c = TestCommunity::new();
    let thread = c.threads.create_thread("owner", &json!({"title": "Hei"})).unwrap();
    c.meta.set_frozen(ADMIN, "troll", true).unwrap();

    assert!(matches!(
        c.threads.create_thread("troll", &json!({"title": "Spam"})),
        Err(Error::Unauthorized(_))
    ));
    assert!(matches!(
        c.replies
            .add_reply("troll", &thread.key, &json!({"markdownContent": "spam"})),
        Err(Error::Unauthorized(_))
    ));
    assert!(c.sites.create_site("troll", &json!({"name": "Spam"})).is_err());
    assert_eq!(c.reply_count(&thread.key), 0);

    c.meta.set_frozen(ADMIN, "troll", false).unwrap();
    assert!(c.threads.create_thread("troll", &json!({"title": "Anteeksi"})).is_ok());
}

#[test]
fn test_account_frozen_flag_blocks_creation() {
    let c = TestCommunity::new();
    c.accounts.create_account("u1", &json!({})).unwrap();
    c.accounts
        .update_account(ADMIN, "u1", &json!({"frozen": true}))
        .unwrap();
    assert!(c.sheets
        .create_sheet("u1", &json!({"name": "Aino", "system": "dnd5e"}))
        .is_err());
}

#[test]
fn test_only_admins_freeze() {
    let c = TestCommunity::new();
    assert!(matches!(
        c.meta.set_frozen("owner", "troll", true),
        Err(Error::Unauthorized(_))
    ));
    assert!(!c.meta.is_frozen("troll").unwrap());
}

#[test]
fn test_site_players_edit_pages_but_not_site() {
    let c = TestCommunity::new();
    c.sites
        .create_site("gm", &json!({"name": "Kampanja", "players": ["pelaaja"]}))
        .unwrap();
    let page = c
        .pages
        .create_page("pelaaja", "kampanja", &json!({"name": "Muistiinpanot"}))
        .unwrap();
    c.pages
        .update_page("pelaaja", "kampanja", &page.key, &json!({"markdownContent": "x"}))
        .unwrap();

    assert!(matches!(
        c.sites.update_site("pelaaja", "kampanja", &json!({"hidden": true})),
        Err(Error::Unauthorized(_))
    ));
    assert!(matches!(
        c.pages.create_page("stranger", "kampanja", &json!({"name": "Vandaali"})),
        Err(Error::Unauthorized(_))
    ));
}

#[test]
fn test_notifications_belong_to_recipient() {
    let c = TestCommunity::new();
    let thread = c.threads.create_thread("owner", &json!({"title": "Hei"})).unwrap();
    c.replies
        .add_reply("u2", &thread.key, &json!({"markdownContent": "moi"}))
        .unwrap();
    let inbox = c.notifications.list_notifications("owner").unwrap();
    let key = inbox[0].key.clone();

    assert!(c.notifications.mark_read("u2", &key).is_err());
    c.notifications.mark_read("owner", &key).unwrap();
    assert_eq!(c.notifications.unread_count("owner").unwrap(), 0);
}

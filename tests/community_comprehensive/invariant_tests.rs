//! Tier 1: Invariant Tests
//!
//! - Duplicate-keyed accounts and profiles fail instead of overwriting
//! - Deleting a reply drops the thread's reply count by exactly one
//! - Tags are lowercased before indexing
//! - Creating a thread touches exactly its own channel's aggregate

use super::test_utils::*;
use pelilauta_core::{normalize_tags, to_mekanismi_uri, Error};
use serde_json::json;

mod uniqueness {
    use super::*;

    #[test]
    fn test_duplicate_account_is_rejected() {
        let c = TestCommunity::new();
        c.accounts.create_account("u1", &json!({"language": "en"})).unwrap();
        let err = c
            .accounts
            .create_account("u1", &json!({"language": "sv"}))
            .unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));
        assert_eq!(c.accounts.get_account("u1").unwrap().unwrap().language, "en");
    }

    #[test]
    fn test_duplicate_profile_is_rejected() {
        let c = TestCommunity::new();
        c.profiles.create_profile("u1", "u1", &json!({"nick": "Eka"})).unwrap();
        assert!(matches!(
            c.profiles.create_profile("u1", "u1", &json!({"nick": "Toka"})),
            Err(Error::AlreadyExists(_))
        ));
        assert!(matches!(
            c.profiles.create_profile("u2", "u2", &json!({"nick": "EKA"})),
            Err(Error::AlreadyExists(_))
        ));
        assert_eq!(c.profiles.get_profile("u1").unwrap().unwrap().nick, "Eka");
        assert!(c.profiles.get_profile("u2").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_site_is_rejected() {
        let c = TestCommunity::new();
        c.sites.create_site("gm", &json!({"name": "Sama Nimi"})).unwrap();
        assert!(matches!(
            c.sites.create_site("gm2", &json!({"name": "sama  nimi"})),
            Err(Error::AlreadyExists(_))
        ));
    }
}

mod reply_counters {
    use super::*;

    #[test]
    fn test_delete_reply_decrements_by_exactly_one() {
        let c = TestCommunity::new();
        let thread = c.threads.create_thread("owner", &json!({"title": "Hei"})).unwrap();
        let keys: Vec<String> = (0..4)
            .map(|i| {
                c.replies
                    .add_reply("u2", &thread.key, &json!({"markdownContent": format!("r{}", i)}))
                    .unwrap()
                    .key
            })
            .collect();
        assert_eq!(c.reply_count(&thread.key), 4);

        for (deleted, key) in keys.iter().enumerate() {
            c.replies.delete_reply("u2", &thread.key, key).unwrap();
            assert_eq!(c.reply_count(&thread.key), 3 - deleted as i64);
        }
    }

    #[test]
    fn test_delete_reply_without_reaction_record() {
        let c = TestCommunity::new();
        let thread = c.threads.create_thread("owner", &json!({"title": "Hei"})).unwrap();
        let reply = c
            .replies
            .add_reply("u2", &thread.key, &json!({"markdownContent": "moi"}))
            .unwrap();
        assert!(c.reactions.get_reactions(&reply.key).unwrap().love.is_empty());
        assert!(c.replies.delete_reply("u2", &thread.key, &reply.key).is_ok());
        assert_eq!(c.reply_count(&thread.key), 0);
    }
}

mod tags {
    use super::*;

    #[test]
    fn test_tags_are_lowercased_before_indexing() {
        let c = TestCommunity::new();
        let thread = c
            .threads
            .create_thread("owner", &json!({"title": "Loitsut", "tags": ["DnD", "  Velhot "]}))
            .unwrap();
        let entry = c.tags.get(&thread.key).unwrap().unwrap();
        assert!(entry.tags.iter().all(|t| *t == t.to_lowercase()));
        assert!(entry.tags.contains(&"dnd".to_string()));
        assert!(entry.tags.contains(&"velhot".to_string()));

        assert_eq!(c.tags.entries_for_tag("DND").unwrap().len(), 1);
    }

    #[test]
    fn test_normalize_tags_dedupes() {
        assert_eq!(
            normalize_tags(&["A".to_string(), "a".to_string(), "B".to_string()]),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}

mod channels {
    use super::*;

    #[test]
    fn test_thread_creation_touches_only_its_channel() {
        let c = TestCommunity::new();
        let thread = c
            .threads
            .create_thread("owner", &json!({"title": "Hei", "channel": "dnd"}))
            .unwrap();
        assert_eq!(c.channel_count("dnd"), 1);
        assert_eq!(c.channel_count("yleinen"), 0);
        assert_eq!(c.channel_count("pbta"), 0);

        let channels = c.meta.channels().unwrap();
        let dnd = channels.find("dnd").unwrap();
        assert_eq!(dnd.latest_thread.as_ref().unwrap().key, thread.key);
        assert_eq!(dnd.latest_thread.as_ref().unwrap().author, "owner");
        assert!(channels.find("pbta").unwrap().latest_thread.is_none());
    }

    #[test]
    fn test_unknown_channel_leaves_aggregates_unchanged() {
        let c = TestCommunity::new();
        let before = c.meta.channels().unwrap();
        c.threads
            .create_thread("owner", &json!({"title": "Hei", "channel": "ei-ole"}))
            .unwrap();
        assert_eq!(c.meta.channels().unwrap(), before);
    }

    #[test]
    fn test_thread_deletion_floors_at_zero() {
        let c = TestCommunity::new();
        let thread = c
            .threads
            .create_thread("owner", &json!({"title": "Hei", "channel": "pbta"}))
            .unwrap();
        c.threads.delete_thread("owner", &thread.key).unwrap();
        assert_eq!(c.channel_count("pbta"), 0);
    }
}

mod slugs {
    use super::*;

    #[test]
    fn test_slug_examples() {
        assert_eq!(to_mekanismi_uri("  12 3  "), "12-3");
        assert_eq!(to_mekanismi_uri("Kadonneet  Kaupungit"), "kadonneet-kaupungit");
        assert_eq!(to_mekanismi_uri("--a--b--"), "a-b");
    }
}

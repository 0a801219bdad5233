//! Tier 1: Page History Tests
//!
//! Every content edit stores a reverse diff; walking the diffs back from the
//! current content must reproduce each earlier revision exactly.

use super::test_utils::*;
use proptest::prelude::*;
use serde_json::json;

fn site_with_page(c: &TestCommunity, content: &str) {
    c.sites.create_site("gm", &json!({"name": "Kampanja"})).unwrap();
    c.pages
        .create_page("gm", "kampanja", &json!({"name": "Etusivu", "markdownContent": content}))
        .unwrap();
}

fn edit(c: &TestCommunity, content: &str) {
    c.pages
        .update_page("gm", "kampanja", "etusivu", &json!({"markdownContent": content}))
        .unwrap();
}

#[test]
fn test_every_revision_is_recoverable() {
    let c = TestCommunity::new();
    let revisions = [
        "# Etusivu\n\nTervetuloa",
        "# Etusivu\n\nTervetuloa kampanjaan\n\n## Pelaajat",
        "# Etusivu\n\n## Pelaajat\n- Aino\n- Brom",
        "",
        "Uusi alku",
    ];
    site_with_page(&c, revisions[0]);
    for content in &revisions[1..] {
        edit(&c, content);
    }

    let history = c.pages.page_history("kampanja", "etusivu").unwrap();
    assert_eq!(history.history.len(), revisions.len() - 1);

    for steps_back in 0..revisions.len() {
        let expected = revisions[revisions.len() - 1 - steps_back];
        assert_eq!(
            c.pages
                .revert_page_content("kampanja", "etusivu", steps_back)
                .unwrap(),
            expected,
            "revision {} back",
            steps_back
        );
    }
    assert!(c
        .pages
        .revert_page_content("kampanja", "etusivu", revisions.len())
        .unwrap_err()
        .is_not_found());
}

#[test]
fn test_metadata_edit_records_no_history() {
    let c = TestCommunity::new();
    site_with_page(&c, "sisältö");
    c.pages
        .update_page("gm", "kampanja", "etusivu", &json!({"category": "lore"}))
        .unwrap();
    edit(&c, "sisältö");
    assert!(c
        .pages
        .page_history("kampanja", "etusivu")
        .unwrap()
        .history
        .is_empty());
}

#[test]
fn test_restore_page_is_a_new_edit() {
    let c = TestCommunity::new();
    site_with_page(&c, "v1");
    edit(&c, "v2");
    let restored = c.pages.restore_page("gm", "kampanja", "etusivu", 1).unwrap();
    assert_eq!(restored.markdown_content, "v1");
    assert_eq!(c.pages.page_history("kampanja", "etusivu").unwrap().history.len(), 2);
    assert_eq!(
        c.pages.revert_page_content("kampanja", "etusivu", 1).unwrap(),
        "v2"
    );
}

fn content_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(vec!["a", "b", "c", "", "# otsikko"]), 0..8)
        .prop_map(|lines| lines.join("\n"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_history_reproduces_revisions(
        revisions in prop::collection::vec(content_strategy(), 1..6)
    ) {
        let c = TestCommunity::new();
        site_with_page(&c, &revisions[0]);
        for content in &revisions[1..] {
            edit(&c, content);
        }
        let mut deduped: Vec<&String> = Vec::new();
        for r in &revisions {
            if deduped.last() != Some(&r) {
                deduped.push(r);
            }
        }
        for (steps_back, expected) in deduped.iter().rev().enumerate() {
            let content = c.pages.revert_page_content("kampanja", "etusivu", steps_back).unwrap();
            prop_assert_eq!(&content, *expected);
        }
    }
}

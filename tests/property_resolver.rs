use proptest::prelude::*;

use assetpipe::config::resolver::{resolve, VarMap};

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,7}"
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9/._-]{0,12}"
}

proptest! {
    // Round-trip law: a document with zero placeholders resolves to itself,
    // whatever variables are in scope.
    #[test]
    fn placeholder_free_text_is_unchanged(
        text in "[A-Za-z0-9 =._/-]{0,64}",
        vars in proptest::collection::btree_map(key_strategy(), value_strategy(), 0..5),
    ) {
        let vars: VarMap = vars;
        let resolved = resolve(&text, &vars).unwrap();
        prop_assert_eq!(resolved, text);
    }

    // Substituting known placeholders leaves no tokens behind, and a second
    // resolution pass is a no-op.
    #[test]
    fn substitution_is_complete_and_idempotent(
        entries in proptest::collection::btree_map(key_strategy(), value_strategy(), 1..5),
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..6),
        fragments in proptest::collection::vec("[A-Za-z0-9 =._/-]{0,16}", 6),
    ) {
        let entries: VarMap = entries;
        let keys: Vec<&String> = entries.keys().collect();

        let mut text = String::new();
        for (i, pick) in picks.iter().enumerate() {
            text.push_str(&fragments[i % fragments.len()]);
            let key = keys[pick.index(keys.len())];
            text.push_str(&format!("<%= {key} %>"));
        }

        let once = resolve(&text, &entries).unwrap();
        prop_assert!(!once.contains("<%="));

        let twice = resolve(&once, &entries).unwrap();
        prop_assert_eq!(once, twice);
    }
}

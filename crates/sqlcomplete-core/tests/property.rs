use proptest::prelude::*;
use sqlcomplete_core::{
    last_word, Completer, CompleterSettings, CompletionRequest, KeywordCasing, MatchEngine,
    MatchMode,
};

fn is_subsequence(query: &str, candidate: &str) -> bool {
    let mut chars = candidate.chars();
    query.chars().all(|wanted| chars.any(|ch| ch == wanted))
}

proptest! {
    #[test]
    fn prefix_matches_start_with_the_typed_word(
        word in "[a-z]{0,3}",
        pool in proptest::collection::vec("[a-zA-Z_]{1,10}", 0..20),
    ) {
        let engine = MatchEngine::new(KeywordCasing::Lower);
        let entries = engine.find_matches(&word, &pool, MatchMode::Prefix, None, "");

        let expected = pool.iter().filter(|c| c.to_lowercase().starts_with(&word)).count();
        prop_assert_eq!(entries.len(), expected);
        for entry in &entries {
            prop_assert!(entry.text.starts_with(&word), "{} does not start with {}", entry.text, word);
            prop_assert_eq!(entry.replace_from_offset, -(word.len() as isize));
        }
    }

    #[test]
    fn fuzzy_matches_contain_the_typed_word_in_order(
        word in "[a-z_]{1,4}",
        pool in proptest::collection::vec("[a-z_]{1,12}", 0..20),
    ) {
        let engine = MatchEngine::new(KeywordCasing::Lower);
        let entries = engine.find_matches(&word, &pool, MatchMode::Fuzzy, None, "");

        let expected = pool.iter().filter(|c| is_subsequence(&word, c)).count();
        prop_assert_eq!(entries.len(), expected);
        for entry in &entries {
            prop_assert!(is_subsequence(&word, &entry.text));
        }
    }

    #[test]
    fn substring_ranks_earlier_offsets_first(
        word in "[a-c]{1,2}",
        pool in proptest::collection::vec("[a-d]{1,8}", 0..20),
    ) {
        let engine = MatchEngine::new(KeywordCasing::Lower);
        let entries = engine.find_matches(&word, &pool, MatchMode::Substring, None, "");
        let offsets: Vec<usize> = entries
            .iter()
            .map(|entry| entry.text.find(&word).unwrap_or(usize::MAX))
            .collect();
        prop_assert!(offsets.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn last_word_is_a_suffix(text in "\\PC{0,40}") {
        prop_assert!(text.ends_with(last_word(&text)));
    }

    #[test]
    fn completion_never_panics(sql in "\\PC{0,80}", cursor in 0usize..100) {
        let completer = Completer::new(&CompleterSettings::default());
        let cursor = cursor.min(sql.len());
        let request = CompletionRequest::new(sql.clone(), cursor);
        let result = completer.complete_request(&request);
        prop_assert_eq!(result.is_ok(), sql.is_char_boundary(cursor));
    }
}

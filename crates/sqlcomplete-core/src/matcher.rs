//! Candidate matching and ranking.
//!
//! [`MatchEngine::find_matches`] filters a candidate pool against the word at the
//! cursor and orders the survivors. Ranking is deterministic: matches sort by
//! span length, then by match offset, then by candidate text.
//!
//! # Fuzzy matching
//!
//! The typed word's characters must appear in order in the candidate. The span is
//! found leftmost-first, like a non-greedy `c1.*?c2.*?c3` search, so the recorded
//! span is the first qualifying one rather than the shortest one anywhere in the
//! candidate. Ranking
//! depends on that discipline; do not replace it with a global shortest-span
//! search.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::types::{CompletionCategory, CompletionEntry, KeywordCasing};

/// How the typed word must occur in a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// In-order subsequence.
    Fuzzy,
    /// Literal substring anywhere.
    Substring,
    /// Literal prefix.
    Prefix,
}

/// Returns the word ending at the end of `text`.
///
/// Whitespace, `.`, `(`, `)`, `:` and `,` end a word; other punctuation is part
/// of it. Text ending in whitespace has no last word.
pub fn last_word(text: &str) -> &str {
    if text.ends_with(char::is_whitespace) {
        return "";
    }
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, ch)| !is_word_break(*ch))
        .last()
        .map_or(text.len(), |(index, _)| index);
    &text[start..]
}

fn is_word_break(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '.' | '(' | ')' | ':' | ',')
}

const CASING_UPPER: u8 = 0;
const CASING_LOWER: u8 = 1;
const CASING_AUTO: u8 = 2;

/// Session casing policy. `Auto` is fixed by the first match request and never
/// returns.
#[derive(Debug)]
pub struct CasingPolicy(AtomicU8);

impl CasingPolicy {
    pub fn new(casing: KeywordCasing) -> Self {
        Self(AtomicU8::new(encode(casing)))
    }

    pub fn get(&self) -> KeywordCasing {
        decode(self.0.load(Ordering::Acquire))
    }

    /// Fixes an `Auto` policy from the case of the typed word's last character.
    fn resolve(&self, typed: &str) -> KeywordCasing {
        let fixed = if typed.chars().last().is_some_and(char::is_lowercase) {
            KeywordCasing::Lower
        } else {
            KeywordCasing::Upper
        };
        match self.0.compare_exchange(
            CASING_AUTO,
            encode(fixed),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => fixed,
            Err(current) => decode(current),
        }
    }
}

fn encode(casing: KeywordCasing) -> u8 {
    match casing {
        KeywordCasing::Upper => CASING_UPPER,
        KeywordCasing::Lower => CASING_LOWER,
        KeywordCasing::Auto => CASING_AUTO,
    }
}

fn decode(value: u8) -> KeywordCasing {
    match value {
        CASING_UPPER => KeywordCasing::Upper,
        CASING_LOWER => KeywordCasing::Lower,
        _ => KeywordCasing::Auto,
    }
}

#[derive(Debug)]
struct Match {
    span: usize,
    offset: usize,
    candidate: String,
}

#[derive(Debug)]
pub struct MatchEngine {
    casing: CasingPolicy,
}

impl MatchEngine {
    pub fn new(casing: KeywordCasing) -> Self {
        Self {
            casing: CasingPolicy::new(casing),
        }
    }

    pub fn casing(&self) -> KeywordCasing {
        self.casing.get()
    }

    /// Matches the last word of `typed` against `pool`.
    ///
    /// Entries replace the typed word (`replace_from_offset` is minus its length)
    /// and are cased per the session policy.
    pub fn find_matches<I, S>(
        &self,
        typed: &str,
        pool: I,
        mode: MatchMode,
        category: Option<CompletionCategory>,
        schema_context: &str,
    ) -> Vec<CompletionEntry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let last = last_word(typed);
        let query = last.to_lowercase();
        let query_len = query.chars().count();

        let mut candidates: Vec<String> = pool
            .into_iter()
            .map(|candidate| candidate.as_ref().to_string())
            .collect();
        candidates.sort();

        let mut matches = match mode {
            MatchMode::Fuzzy => fuzzy_matches(&query, candidates),
            MatchMode::Substring | MatchMode::Prefix => {
                literal_matches(&query, query_len, candidates, mode == MatchMode::Prefix)
            }
        };
        matches.sort_by(|a, b| {
            (a.span, a.offset, &a.candidate).cmp(&(b.span, b.offset, &b.candidate))
        });

        let casing = match self.casing.get() {
            KeywordCasing::Auto => self.casing.resolve(last),
            fixed => fixed,
        };

        matches
            .into_iter()
            .map(|found| CompletionEntry {
                text: apply_casing(&found.candidate, casing),
                replace_from_offset: -(query_len as isize),
                category,
                schema_context: schema_context.to_string(),
            })
            .collect()
    }
}

fn fuzzy_matches(query: &str, candidates: Vec<String>) -> Vec<Match> {
    let query: Vec<char> = query.chars().collect();
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let (offset, span) = fuzzy_span(&query, &candidate.to_lowercase())?;
            Some(Match {
                span,
                offset,
                candidate,
            })
        })
        .collect()
}

/// Leftmost `(offset, span)` of `query` as an in-order subsequence of `text`,
/// counted in characters.
///
/// The span starts at the first occurrence of the first query character and
/// every later character takes its earliest occurrence after the previous one.
/// If that start cannot complete the query, no later start can.
fn fuzzy_span(query: &[char], text: &str) -> Option<(usize, usize)> {
    let Some((&first, rest)) = query.split_first() else {
        return Some((0, 0));
    };
    let mut chars = text.chars().enumerate();
    let (start, _) = chars.find(|(_, ch)| *ch == first)?;
    let mut end = start;
    for &wanted in rest {
        let (index, _) = chars.find(|(_, ch)| *ch == wanted)?;
        end = index;
    }
    Some((start, end - start + 1))
}

fn literal_matches(
    query: &str,
    query_len: usize,
    candidates: Vec<String>,
    anchored: bool,
) -> Vec<Match> {
    candidates
        .into_iter()
        .filter_map(|candidate| {
            let lower = candidate.to_lowercase();
            let offset = if anchored {
                lower.starts_with(query).then_some(0)?
            } else {
                lower[..lower.find(query)?].chars().count()
            };
            Some(Match {
                span: query_len,
                offset,
                candidate,
            })
        })
        .collect()
}

fn apply_casing(text: &str, casing: KeywordCasing) -> String {
    match casing {
        KeywordCasing::Upper => text.to_uppercase(),
        KeywordCasing::Lower | KeywordCasing::Auto => text.to_lowercase(),
    }
}

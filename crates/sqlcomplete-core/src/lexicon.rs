//! Static SQL vocabulary shared by every completion session.
//!
//! A [`Lexicon`] holds the keyword follow-map, built-in functions, datatypes,
//! reserved words and `CHANGE MASTER TO` options for one SQL dialect. It is
//! immutable once loaded and handed out as `Arc<Lexicon>`, so sessions reference
//! the same tables instead of copying them.
//!
//! The MySQL lexicon is embedded in the crate and decoded on first use with
//! [`Lexicon::mysql`]. Other dialects can be loaded with [`Lexicon::from_json`].

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, LazyLock};

use serde::Deserialize;

use crate::error::LexiconError;

const MYSQL_LITERALS: &str = include_str!("../data/mysql_literals.json");

static MYSQL_LEXICON: LazyLock<Arc<Lexicon>> = LazyLock::new(|| {
    Arc::new(Lexicon::from_json(MYSQL_LITERALS).expect("embedded MySQL lexicon is valid JSON"))
});

/// On-disk shape of a lexicon.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LexiconSource {
    /// keyword -> keywords that may follow it
    keywords: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    functions: Vec<String>,
    #[serde(default)]
    datatypes: Vec<String>,
    #[serde(default)]
    reserved: Vec<String>,
    #[serde(default)]
    change_items: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    keyword_follows: BTreeMap<String, Vec<String>>,
    /// Follow-map keys and values, flattened.
    keywords: BTreeSet<String>,
    functions: Vec<String>,
    /// Upper-cased `functions`, for membership checks.
    function_names: HashSet<String>,
    datatypes: Vec<String>,
    /// Upper-cased words that force an identifier to be quoted.
    reserved_words: HashSet<String>,
    change_items: Vec<String>,
}

impl Lexicon {
    /// Decodes a lexicon from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, LexiconError> {
        let source: LexiconSource = serde_json::from_str(json)?;
        Ok(Self::from_source(source))
    }

    /// The embedded MySQL lexicon.
    pub fn mysql() -> Arc<Lexicon> {
        Arc::clone(&MYSQL_LEXICON)
    }

    fn from_source(source: LexiconSource) -> Self {
        let keywords: BTreeSet<String> = source
            .keywords
            .iter()
            .flat_map(|(keyword, follows)| std::iter::once(keyword).chain(follows))
            .cloned()
            .collect();

        // Every word of every keyword is reserved, on top of the explicit list.
        let reserved_words = keywords
            .iter()
            .flat_map(|keyword| keyword.split_whitespace())
            .chain(source.reserved.iter().map(String::as_str))
            .map(str::to_uppercase)
            .collect();

        let function_names = source
            .functions
            .iter()
            .map(|name| name.to_uppercase())
            .collect();

        Self {
            keyword_follows: source.keywords,
            keywords,
            functions: source.functions,
            function_names,
            datatypes: source.datatypes,
            reserved_words,
            change_items: source.change_items,
        }
    }

    pub fn keywords(&self) -> &BTreeSet<String> {
        &self.keywords
    }

    /// Keywords that may start a clause, i.e. the follow-map keys.
    pub fn keyword_heads(&self) -> impl Iterator<Item = &str> {
        self.keyword_follows.keys().map(String::as_str)
    }

    /// Keywords known to follow `keyword`, or `None` when it is not in the map.
    pub fn follows(&self, keyword: &str) -> Option<&[String]> {
        self.keyword_follows.get(keyword).map(Vec::as_slice)
    }

    pub fn functions(&self) -> &[String] {
        &self.functions
    }

    pub fn datatypes(&self) -> &[String] {
        &self.datatypes
    }

    pub fn change_items(&self) -> &[String] {
        &self.change_items
    }

    /// Whether `name`, upper-cased, is a built-in function.
    pub fn is_function(&self, name: &str) -> bool {
        self.function_names.contains(&name.to_uppercase())
    }

    /// Whether `name`, upper-cased, is a reserved word.
    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_words.contains(&name.to_uppercase())
    }
}

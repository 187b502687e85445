use ahash::AHashMap;

use crate::{error::{Result, ZoneError}, types::UpdateRecord};

/// Per-language attributes from the update table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageInfo {
    pub population: i64,
    pub name: String,
    pub egids_group: String,
    pub color: String,
}

impl LanguageInfo {
    /// Whether the color code marks the language for highlighting (an integer > 0).
    pub fn is_colored(&self) -> bool {
        self.color.trim().parse::<i64>().is_ok_and(|color| color > 0)
    }
}

/// Lookups over the update table, keyed by language code. Later rows overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct UpdateIndex {
    languages: AHashMap<String, LanguageInfo>,
    codes: Vec<String>, // Codes in first-seen order.
}

impl UpdateIndex {
    /// Build the index, stripping `separator` from population values before parsing.
    pub fn new(records: &[UpdateRecord], separator: Option<char>) -> Result<Self> {
        let mut index = Self::default();

        for record in records {
            let info = LanguageInfo {
                population: parse_population(&record.language_code, &record.population, separator)?,
                name: record.language_name.clone(),
                egids_group: record.egids_group.clone(),
                color: record.color.clone(),
            };
            if index.languages.insert(record.language_code.clone(), info).is_none() {
                index.codes.push(record.language_code.clone());
            }
        }

        Ok(index)
    }

    #[inline] pub fn len(&self) -> usize { self.languages.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.languages.is_empty() }

    #[inline] pub fn contains(&self, code: &str) -> bool { self.languages.contains_key(code) }

    #[inline] pub fn get(&self, code: &str) -> Option<&LanguageInfo> { self.languages.get(code) }

    /// Look up a code that the join guarantees to be present.
    pub(crate) fn expect(&self, code: &str) -> Result<&LanguageInfo> {
        self.get(code)
            .ok_or_else(|| ZoneError::Invariant(format!("language {code} missing from update index")))
    }

    /// Language codes in the order they first appear in the table.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.iter().map(String::as_str)
    }
}

/// Parse a population figure such as `1.234.567`.
fn parse_population(code: &str, value: &str, separator: Option<char>) -> Result<i64> {
    let cleaned: String = match separator {
        Some(sep) => value.trim().chars().filter(|&c| c != sep).collect(),
        None => value.trim().to_string(),
    };
    cleaned.parse::<i64>()
        .map_err(|_| ZoneError::Parse { code: code.to_string(), value: value.to_string() })
}

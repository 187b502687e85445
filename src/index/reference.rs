use ahash::AHashMap;

use crate::types::LanguageRecord;

/// Lookups over the BPI reference table.
#[derive(Debug, Clone, Default)]
pub struct ReferenceIndex {
    occurrence_count: AHashMap<String, usize>,
    zone_languages: AHashMap<String, Vec<String>>,
    zone_country: AHashMap<String, String>,
    zones: Vec<String>, // Zone keys in first-seen order.
}

impl ReferenceIndex {
    pub fn new(records: &[LanguageRecord]) -> Self {
        let mut index = Self::default();

        for record in records {
            *index.occurrence_count.entry(record.language_code.clone()).or_default() += 1;

            index.zone_languages.entry(record.zone_id.clone())
                .or_insert_with(|| {
                    index.zones.push(record.zone_id.clone());
                    Vec::new()
                })
                .push(record.language_code.clone());

            index.zone_country.insert(record.zone_id.clone(), record.country.clone());
        }

        index
    }

    /// Number of distinct language codes.
    #[inline] pub fn num_codes(&self) -> usize { self.occurrence_count.len() }

    /// Number of distinct zones.
    #[inline] pub fn num_zones(&self) -> usize { self.zones.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.zones.is_empty() }

    /// Distinct language codes, in no particular order.
    pub fn unique_codes(&self) -> impl Iterator<Item = &str> {
        self.occurrence_count.keys().map(String::as_str)
    }

    /// Total number of rows carrying `code`, or 0 if it never occurs.
    #[inline]
    pub fn occurrence_count(&self, code: &str) -> usize {
        self.occurrence_count.get(code).copied().unwrap_or(0)
    }

    /// Language codes of a zone in input order, duplicates preserved.
    pub fn zone_languages(&self, zone: &str) -> &[String] {
        self.zone_languages.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Country of a zone, from the last row naming it.
    pub fn zone_country(&self, zone: &str) -> Option<&str> {
        self.zone_country.get(zone).map(String::as_str)
    }

    /// Iterate `(zone, codes)` in the order zones first appear.
    pub fn iter_zones(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.zones.iter().map(|zone| (zone.as_str(), self.zone_languages(zone)))
    }
}

#[cfg(test)]
mod tests {
    use super::ReferenceIndex;
    use crate::types::LanguageRecord;

    fn row(zone: &str, code: &str, country: &str) -> LanguageRecord {
        LanguageRecord { zone_id: zone.into(), language_code: code.into(), country: country.into() }
    }

    #[test]
    fn empty_input_yields_empty_index() {
        let index = ReferenceIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.num_codes(), 0);
        assert_eq!(index.occurrence_count("abc"), 0);
        assert!(index.zone_languages("Z1").is_empty());
    }

    #[test]
    fn counts_every_occurrence() {
        let index = ReferenceIndex::new(&[
            row("Z1", "L1", "C1"),
            row("Z1", "L1", "C1"),
            row("Z2", "L1", "C2"),
            row("Z2", "L2", "C2"),
        ]);
        assert_eq!(index.occurrence_count("L1"), 3);
        assert_eq!(index.occurrence_count("L2"), 1);
        assert_eq!(index.num_codes(), 2);

        let mut codes: Vec<_> = index.unique_codes().collect();
        codes.sort();
        assert_eq!(codes, ["L1", "L2"]);
    }

    #[test]
    fn zone_languages_keep_order_and_duplicates() {
        let index = ReferenceIndex::new(&[
            row("Z2", "B", "C"),
            row("Z1", "A", "C"),
            row("Z2", "A", "C"),
            row("Z2", "B", "C"),
        ]);
        assert_eq!(index.zone_languages("Z2"), ["B", "A", "B"]);

        let zones: Vec<_> = index.iter_zones().map(|(zone, _)| zone).collect();
        assert_eq!(zones, ["Z2", "Z1"]);
    }

    #[test]
    fn zone_country_is_last_write_wins() {
        let index = ReferenceIndex::new(&[row("Z1", "A", "Old"), row("Z1", "B", "New")]);
        assert_eq!(index.zone_country("Z1"), Some("New"));
        assert_eq!(index.zone_country("Z9"), None);
    }
}

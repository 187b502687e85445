use std::fmt;

/// Diagnostics gathered alongside the output records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateReport {
    /// Number of zone features processed.
    pub zone_count: usize,
    /// Number of reference zones carrying at least one tracked language.
    pub matched_zone_count: usize,
    /// Number of output records whose computed fields were redacted.
    pub suppressed_count: usize,
    /// Reference zones by occurrence-weighted language population, descending.
    pub zone_ranking: Vec<(String, f64)>,
    /// Tracked language codes that never occur in the reference table.
    pub unmatched_languages: Vec<String>,
}

impl fmt::Display for AggregateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} zones, {} matched, {} suppressed, {} unmatched languages",
            self.zone_count, self.matched_zone_count, self.suppressed_count, self.unmatched_languages.len(),
        )
    }
}

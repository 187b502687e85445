use ahash::{AHashMap, AHashSet};

use crate::{error::{Result, ZoneError}, index::{ReferenceIndex, UpdateIndex}};

/// Join of the reference and update tables: which tracked languages each zone carries.
#[derive(Debug, Clone, Default)]
pub struct Apportionment {
    matched_zones: AHashSet<String>,
    zone_language_matches: AHashMap<String, Vec<String>>,
    zone_language_population: Vec<(String, f64)>, // In reference zone order.
}

impl Apportionment {
    /// Split every tracked language's population evenly over its reference-table occurrences.
    pub fn new(reference: &ReferenceIndex, update: &UpdateIndex) -> Result<Self> {
        let mut apportionment = Self::default();

        for (zone, codes) in reference.iter_zones() {
            let mut population = 0.0;
            for code in codes.iter().filter(|code| update.contains(code)) {
                let occurrences = reference.occurrence_count(code);
                if occurrences == 0 {
                    return Err(ZoneError::Invariant(format!("language {code} has no occurrences")));
                }

                apportionment.matched_zones.insert(zone.to_string());
                apportionment.zone_language_matches.entry(zone.to_string())
                    .or_default()
                    .push(code.clone());
                population += update.expect(code)?.population as f64 / occurrences as f64;
            }
            apportionment.zone_language_population.push((zone.to_string(), population));
        }

        Ok(apportionment)
    }

    #[inline] pub fn is_matched(&self, zone: &str) -> bool { self.matched_zones.contains(zone) }

    #[inline] pub fn num_matched_zones(&self) -> usize { self.matched_zones.len() }

    /// Tracked language codes of a zone in occurrence order, duplicates preserved.
    pub fn matches(&self, zone: &str) -> &[String] {
        self.zone_language_matches.get(zone).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Occurrence-weighted population of a zone (0 for unmatched zones).
    pub fn zone_population(&self, zone: &str) -> f64 {
        self.zone_language_population.iter()
            .find(|(z, _)| z == zone)
            .map_or(0.0, |(_, population)| *population)
    }

    /// Zones by occurrence-weighted population, descending. Ties keep reference order.
    pub fn ranking(&self) -> Vec<(String, f64)> {
        let mut ranking = self.zone_language_population.clone();
        ranking.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranking
    }
}

/// Tracked language codes that never occur in the reference table, in update-table order.
pub fn unmatched_languages<'a>(reference: &ReferenceIndex, update: &'a UpdateIndex) -> Vec<&'a str> {
    update.codes()
        .filter(|code| reference.occurrence_count(code) == 0)
        .collect()
}

/// Distinct codes of `codes`, in the order first seen.
pub(crate) fn distinct_in_order(codes: &[String]) -> Vec<&str> {
    let mut seen = AHashSet::with_capacity(codes.len());
    codes.iter()
        .map(String::as_str)
        .filter(|code| seen.insert(*code))
        .collect()
}

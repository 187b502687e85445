use ahash::AHashMap;

use crate::{
    error::{Result, ZoneError},
    index::UpdateIndex,
    types::{LanguageDetail, LanguageDetails, ZoneFeature},
};
use super::apportion::{distinct_in_order, Apportionment};

/// Per-language sum of the populations of every zone in which it was matched.
#[derive(Debug, Clone, Default)]
pub struct LanguageFootprint(AHashMap<String, f64>);

impl LanguageFootprint {
    /// Total footprint of `code`, or `None` if no zone matched it.
    #[inline] pub fn get(&self, code: &str) -> Option<f64> { self.0.get(code).copied() }

    #[inline] pub fn len(&self) -> usize { self.0.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

/// First-pass counts for a single zone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ZoneTally {
    /// Number of tracked-language occurrences in the zone.
    pub number_ubl: u32,
    /// Whether any matched language carries a positive color code.
    pub colored: bool,
}

/// Second-pass estimate for a single zone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneEstimate {
    pub population_ubl: i64,
    pub perc_pop_ubl: f64,
    pub details: LanguageDetails,
}

/// First pass over every zone: occurrence counts, color flags and each language's footprint.
///
/// A zone adds its population once to each distinct language matched in it.
/// The footprint must be complete before any zone can be estimated.
pub fn tally_zones<G>(
    zones: &[ZoneFeature<G>],
    apportionment: &Apportionment,
    update: &UpdateIndex,
) -> Result<(Vec<ZoneTally>, LanguageFootprint)> {
    let mut footprint = LanguageFootprint::default();
    let tallies = zones.iter()
        .map(|zone| -> Result<ZoneTally> {
            let mut tally = ZoneTally::default();
            if !apportionment.is_matched(&zone.zone_name) { return Ok(tally) }

            let codes = apportionment.matches(&zone.zone_name);
            for code in codes {
                tally.number_ubl += 1;
                tally.colored |= update.expect(code)?.is_colored();
            }
            for code in distinct_in_order(codes) {
                *footprint.0.entry(code.to_string()).or_default() += zone.population;
            }
            Ok(tally)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((tallies, footprint))
}

/// Second pass for one zone: re-apportion each language by this zone's share of its footprint.
pub fn estimate_zone<G>(
    zone: &ZoneFeature<G>,
    apportionment: &Apportionment,
    update: &UpdateIndex,
    footprint: &LanguageFootprint,
) -> Result<ZoneEstimate> {
    let mut estimate = ZoneEstimate::default();
    if !apportionment.is_matched(&zone.zone_name) { return Ok(estimate) }

    let mut unreached = 0.0;
    let mut details = Vec::new();
    for code in distinct_in_order(apportionment.matches(&zone.zone_name)) {
        let info = update.expect(code)?;
        let total = footprint.get(code)
            .ok_or_else(|| ZoneError::Invariant(format!("language {code} has no footprint")))?;

        // A zero footprint contributes nothing but still lists the language.
        let mut population = 0;
        if total != 0.0 {
            let contribution = info.population as f64 * (zone.population / total);
            unreached += contribution;
            population = contribution.trunc() as i64;
        }
        details.push(LanguageDetail {
            name: info.name.clone(),
            population,
            egids_group: info.egids_group.clone(),
        });
    }

    details.sort_by(|a, b| b.population.cmp(&a.population));
    estimate.details = LanguageDetails(details);

    if unreached > 0.0 {
        estimate.population_ubl = unreached.round_ties_even() as i64;
        estimate.perc_pop_ubl = round_to_tenth(unreached / zone.population * 100.0);
    }

    Ok(estimate)
}

/// Round the exact value of `value` to one decimal place, ties to even.
///
/// `value * 10.0` can itself round onto a `.5` tie (`0.15 * 10.0 == 1.5`), so the product's
/// rounding error decides which way such a tie really lies.
fn round_to_tenth(value: f64) -> f64 {
    let scaled = value * 10.0;
    let error = value.mul_add(10.0, -scaled);
    let rounded = if scaled.fract().abs() == 0.5 && error != 0.0 {
        if error > 0.0 { scaled.ceil() } else { scaled.floor() }
    } else {
        scaled.round_ties_even()
    };
    rounded / 10.0
}

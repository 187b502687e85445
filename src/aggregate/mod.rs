//! Join of the language tables with the zone layer.
//!
//! The pipeline runs in fixed stages: the two tables are indexed, tracked languages are
//! apportioned over their reference occurrences, every zone is tallied (first pass) before
//! any zone is estimated (second pass), and suppressed countries are redacted last.

mod apportion;
mod redact;
mod report;
mod zone;

use std::collections::BTreeSet;

use log::{debug, info, warn};

use crate::{
    config::AggregateConfig,
    error::Result,
    index::{ReferenceIndex, UpdateIndex},
    types::{LanguageRecord, OutputRecord, UpdateRecord, ZoneFeature},
};

pub use apportion::{unmatched_languages, Apportionment};
pub use redact::redact_suppressed;
pub use report::AggregateReport;
pub use zone::{estimate_zone, tally_zones, LanguageFootprint, ZoneEstimate, ZoneTally};

/// Annotate every zone with its unreached-language statistics.
///
/// Uses the default `.` thousands separator for population values.
pub fn aggregate<G>(
    language_records: &[LanguageRecord],
    update_records: &[UpdateRecord],
    zones: Vec<ZoneFeature<G>>,
    suppressed_countries: &BTreeSet<String>,
) -> Result<Vec<OutputRecord<G>>> {
    let config = AggregateConfig {
        suppressed_countries: suppressed_countries.clone(),
        ..AggregateConfig::default()
    };
    aggregate_with_report(language_records, update_records, zones, &config)
        .map(|(records, _)| records)
}

/// Same as [`aggregate`], driven by a full config and returning run diagnostics.
pub fn aggregate_with_report<G>(
    language_records: &[LanguageRecord],
    update_records: &[UpdateRecord],
    zones: Vec<ZoneFeature<G>>,
    config: &AggregateConfig,
) -> Result<(Vec<OutputRecord<G>>, AggregateReport)> {
    let reference = ReferenceIndex::new(language_records);
    let update = UpdateIndex::new(update_records, config.thousands_separator)?;
    debug!(
        "[aggregate] reference: {} rows, {} codes, {} zones; update: {} languages",
        language_records.len(), reference.num_codes(), reference.num_zones(), update.len(),
    );

    let apportionment = Apportionment::new(&reference, &update)?;
    let report = diagnostics(&reference, &update, &apportionment, zones.len());

    let (tallies, footprint) = tally_zones(&zones, &apportionment, &update)?;
    let estimates = zones.iter()
        .map(|zone| estimate_zone(zone, &apportionment, &update, &footprint))
        .collect::<Result<Vec<_>>>()?;

    let mut records = zones.into_iter()
        .zip(tallies)
        .zip(estimates)
        .map(|((zone, tally), estimate)| {
            let mut record = OutputRecord::from_zone(zone);
            record.number_ubl = Some(tally.number_ubl);
            if tally.colored { record.color = Some(record.country.clone()) }
            record.population_ubl = Some(estimate.population_ubl);
            record.perc_pop_ubl = Some(estimate.perc_pop_ubl);
            record.language_details = Some(estimate.details);
            record
        })
        .collect::<Vec<_>>();

    let suppressed_count = redact_suppressed(&mut records, &config.suppressed_countries);
    let report = AggregateReport { suppressed_count, ..report };
    info!("[aggregate] {report}");

    Ok((records, report))
}

/// Summarize the join before the zone passes run.
fn diagnostics(
    reference: &ReferenceIndex,
    update: &UpdateIndex,
    apportionment: &Apportionment,
    zone_count: usize,
) -> AggregateReport {
    let zone_ranking = apportionment.ranking();
    for (zone, population) in zone_ranking.iter().filter(|(_, population)| *population > 0.0) {
        debug!("[aggregate] zone {zone}: {population:.1} apportioned speakers");
    }

    let unmatched = unmatched_languages(reference, update).into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !unmatched.is_empty() {
        warn!(
            "[aggregate] {} tracked languages never occur in the reference table: {}",
            unmatched.len(), unmatched.join(", "),
        );
    }

    AggregateReport {
        zone_count,
        matched_zone_count: apportionment.num_matched_zones(),
        suppressed_count: 0,
        zone_ranking,
        unmatched_languages: unmatched,
    }
}

use std::collections::BTreeSet;

use crate::types::OutputRecord;

/// Null the computed fields of every record whose country is suppressed.
/// Returns the number of redacted records.
pub fn redact_suppressed<G>(records: &mut [OutputRecord<G>], suppressed: &BTreeSet<String>) -> usize {
    if suppressed.is_empty() { return 0 }

    let mut count = 0;
    for record in records.iter_mut().filter(|record| suppressed.contains(&record.country)) {
        record.redact();
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ZoneFeature;

    fn record(country: &str) -> OutputRecord<u8> {
        let mut record = OutputRecord::from_zone(ZoneFeature {
            object_id_1: 1,
            object_id: 1,
            zone_id: "W".into(),
            zone_name: "Z".into(),
            world_abc: "A".into(),
            province: "P".into(),
            country: country.into(),
            region: "Region".into(),
            population: 42.0,
            geometry: 9,
        });
        record.number_ubl = Some(2);
        record.population_ubl = Some(30);
        record.perc_pop_ubl = Some(71.4);
        record.color = Some(country.into());
        record
    }

    #[test]
    fn empty_set_is_noop() {
        let mut records = vec![record("Country1")];
        assert_eq!(redact_suppressed(&mut records, &BTreeSet::new()), 0);
        assert_eq!(records[0].number_ubl, Some(2));
    }

    #[test]
    fn only_suppressed_countries_are_nulled() {
        let mut records = vec![record("Country1"), record("Country2")];
        let suppressed = BTreeSet::from(["Country1".to_string()]);

        assert_eq!(redact_suppressed(&mut records, &suppressed), 1);

        let hidden = &records[0];
        assert_eq!(hidden.number_ubl, None);
        assert_eq!(hidden.population_ubl, None);
        assert_eq!(hidden.perc_pop_ubl, None);
        assert_eq!(hidden.language_details, None);
        assert_eq!(hidden.color, None);
        assert_eq!(hidden.population, 42.0);
        assert_eq!(hidden.region, "Region");
        assert_eq!(hidden.geometry, 9);

        assert_eq!(records[1].population_ubl, Some(30));
        assert_eq!(records[1].color.as_deref(), Some("Country2"));
    }
}

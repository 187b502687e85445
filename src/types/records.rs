use std::fmt;

/// One language-in-zone occurrence from the BPI reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageRecord {
    /// Zone key, joined against `ZoneFeature::zone_name`.
    pub zone_id: String,
    pub language_code: String,
    pub country: String,
}

/// One row of the language-update table. `population` is kept raw until indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    pub language_code: String,
    pub country: String,
    pub population: String,
    pub language_name: String,
    pub egids_group: String,
    pub color: String,
}

/// A zone polygon with its demographic attributes. The geometry is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFeature<G> {
    pub object_id_1: i64,
    pub object_id: i64,
    pub zone_id: String,
    pub zone_name: String,
    pub world_abc: String,
    pub province: String,
    pub country: String,
    pub region: String,
    pub population: f64,
    pub geometry: G,
}

/// Zone features plus the coordinate reference they were read in.
#[derive(Debug, Clone)]
pub struct ZoneLayer<G> {
    pub features: Vec<ZoneFeature<G>>,
    pub crs: Option<String>,
}

/// A single `name;population;egids` triplet of the language summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDetail {
    pub name: String,
    pub population: i64,
    pub egids_group: String,
}

/// Ranked language summary of a zone, serialized as `;`-joined triplets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageDetails(pub Vec<LanguageDetail>);

impl LanguageDetails {
    #[inline] pub fn is_empty(&self) -> bool { self.0.is_empty() }

    #[inline] pub fn iter(&self) -> impl Iterator<Item = &LanguageDetail> { self.0.iter() }
}

impl fmt::Display for LanguageDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, detail) in self.0.iter().enumerate() {
            if i > 0 { f.write_str(";")?; }
            write!(f, "{};{};{}", detail.name, detail.population, detail.egids_group)?;
        }
        Ok(())
    }
}

/// Annotated zone emitted by the aggregation. `None` in a computed field means redacted.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRecord<G> {
    pub object_id_1: i64,
    pub object_id: i64,
    pub oz_id: String,
    pub omega_zone_name: String,
    pub world_abc: String,
    pub province: String,
    pub country: String,
    pub region: String,
    pub population: f64,
    pub number_ubl: Option<u32>,
    pub population_ubl: Option<i64>,
    pub perc_pop_ubl: Option<f64>,
    pub language_details: Option<LanguageDetails>,
    pub color: Option<String>,
    pub geometry: G,
}

impl<G> OutputRecord<G> {
    /// Start a record for `zone` with every computed field at its zero default.
    pub(crate) fn from_zone(zone: ZoneFeature<G>) -> Self {
        Self {
            object_id_1: zone.object_id_1,
            object_id: zone.object_id,
            oz_id: zone.zone_id,
            omega_zone_name: zone.zone_name,
            world_abc: zone.world_abc,
            province: zone.province,
            country: zone.country,
            region: zone.region,
            population: zone.population,
            number_ubl: Some(0),
            population_ubl: Some(0),
            perc_pop_ubl: Some(0.0),
            language_details: Some(LanguageDetails::default()),
            color: Some(String::new()),
            geometry: zone.geometry,
        }
    }

    /// Null every computed field, keeping identity, demographics and geometry.
    pub fn redact(&mut self) {
        self.number_ubl = None;
        self.population_ubl = None;
        self.perc_pop_ubl = None;
        self.language_details = None;
        self.color = None;
    }

    #[inline] pub fn is_redacted(&self) -> bool { self.number_ubl.is_none() }
}

use std::{collections::BTreeSet, fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings for one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregateConfig {
    /// Character stripped from population values before integer parsing (`None` keeps them as-is).
    pub thousands_separator: Option<char>,
    /// Countries whose computed fields are nulled in the output.
    pub suppressed_countries: BTreeSet<String>,
    /// Field separator of the BPI and update tables.
    pub delimiter: char,
    pub columns: ColumnConfig,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            thousands_separator: Some('.'),
            suppressed_countries: BTreeSet::new(),
            delimiter: ';',
            columns: ColumnConfig::default(),
        }
    }
}

impl AggregateConfig {
    /// Read a config from a JSON file. Missing keys fall back to their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("[config] Failed to open config file: {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("[config] Failed to parse config file: {}", path.display()))
    }
}

/// Header names of the three input sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    pub reference: ReferenceColumns,
    pub update: UpdateColumns,
    pub zones: ZoneColumns,
}

/// Columns of the BPI reference table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceColumns {
    pub zone: String,
    pub language_code: String,
    pub country: String,
}

impl Default for ReferenceColumns {
    fn default() -> Self {
        Self {
            zone: "OmegaZone".to_string(),
            language_code: "ROL".to_string(),
            country: "Cnty_Name".to_string(),
        }
    }
}

/// Columns of the language-update table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateColumns {
    pub language_code: String,
    pub country: String,
    pub population: String,
    pub language_name: String,
    pub egids_group: String,
    pub color: String,
}

impl Default for UpdateColumns {
    fn default() -> Self {
        Self {
            language_code: "Language Code".to_string(),
            country: "Country".to_string(),
            population: "Population".to_string(),
            language_name: "Language Name".to_string(),
            egids_group: "EGIDS Group".to_string(),
            color: "Color".to_string(),
        }
    }
}

/// Attribute names of the zone polygon layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneColumns {
    pub object_id_1: String,
    pub object_id: String,
    pub zone_id: String,
    pub zone_name: String,
    pub world_abc: String,
    pub province: String,
    pub country: String,
    pub region: String,
    pub population: String,
}

impl Default for ZoneColumns {
    fn default() -> Self {
        Self {
            object_id_1: "OBJECTID_1".to_string(),
            object_id: "OBJECTID".to_string(),
            zone_id: "WorldID".to_string(),
            zone_name: "Zone_Name".to_string(),
            world_abc: "World".to_string(),
            province: "Adm1_Name".to_string(),
            country: "Cnty_Name".to_string(),
            region: "RegionYWAM".to_string(),
            population: "Population".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_source_headers() {
        let config = AggregateConfig::default();
        assert_eq!(config.thousands_separator, Some('.'));
        assert_eq!(config.delimiter, ';');
        assert!(config.suppressed_countries.is_empty());
        assert_eq!(config.columns.reference.language_code, "ROL");
        assert_eq!(config.columns.update.egids_group, "EGIDS Group");
        assert_eq!(config.columns.zones.region, "RegionYWAM");
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: AggregateConfig = serde_json::from_str(r#"{
            "thousands_separator": null,
            "suppressed_countries": ["Country1"],
            "columns": { "update": { "population": "Pop" } }
        }"#).unwrap();

        assert_eq!(config.thousands_separator, None);
        assert!(config.suppressed_countries.contains("Country1"));
        assert_eq!(config.delimiter, ';');
        assert_eq!(config.columns.update.population, "Pop");
        assert_eq!(config.columns.update.language_code, "Language Code");
        assert_eq!(config.columns.zones, ZoneColumns::default());
    }

    #[test]
    fn reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "delimiter": "," }"#).unwrap();

        let config = AggregateConfig::from_json_file(&path).unwrap();
        assert_eq!(config.delimiter, ',');
        assert!(AggregateConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}

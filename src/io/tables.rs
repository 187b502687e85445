use std::path::Path;

use anyhow::Result;
use polars::frame::DataFrame;

use crate::{
    config::{AggregateConfig, ReferenceColumns, UpdateColumns},
    error::ZoneError,
    io::csv::read_delimited,
    types::{LanguageRecord, UpdateRecord},
};

/// Load the BPI reference table.
pub fn read_language_records(path: &Path, config: &AggregateConfig) -> Result<Vec<LanguageRecord>> {
    let df = load(path, config.delimiter)?;
    Ok(language_records_from_frame(&df, &config.columns.reference, &path.display().to_string())?)
}

/// Load the language-update table.
pub fn read_update_records(path: &Path, config: &AggregateConfig) -> Result<Vec<UpdateRecord>> {
    let df = load(path, config.delimiter)?;
    Ok(update_records_from_frame(&df, &config.columns.update, &path.display().to_string())?)
}

fn load(path: &Path, delimiter: char) -> Result<DataFrame> {
    read_delimited(path, delimiter)
        .map_err(|e| ZoneError::invalid_source(path.display().to_string(), format!("{e:#}")).into())
}

pub(crate) fn language_records_from_frame(
    df: &DataFrame,
    columns: &ReferenceColumns,
    source: &str,
) -> Result<Vec<LanguageRecord>, ZoneError> {
    let zones = text_column(df, &columns.zone, source)?;
    let codes = text_column(df, &columns.language_code, source)?;
    let countries = text_column(df, &columns.country, source)?;

    Ok(zones.into_iter().zip(codes).zip(countries)
        .map(|((zone_id, language_code), country)| LanguageRecord { zone_id, language_code, country })
        .collect())
}

pub(crate) fn update_records_from_frame(
    df: &DataFrame,
    columns: &UpdateColumns,
    source: &str,
) -> Result<Vec<UpdateRecord>, ZoneError> {
    let codes = text_column(df, &columns.language_code, source)?;
    let countries = text_column(df, &columns.country, source)?;
    let populations = text_column(df, &columns.population, source)?;
    let names = text_column(df, &columns.language_name, source)?;
    let egids = text_column(df, &columns.egids_group, source)?;
    let colors = text_column(df, &columns.color, source)?;

    Ok(codes.into_iter()
        .zip(countries).zip(populations).zip(names).zip(egids).zip(colors)
        .map(|(((((language_code, country), population), language_name), egids_group), color)| UpdateRecord {
            language_code,
            country,
            population,
            language_name,
            egids_group,
            color,
        })
        .collect())
}

/// Fetch a column as owned strings; nulls become empty strings.
fn text_column(df: &DataFrame, name: &str, source: &str) -> Result<Vec<String>, ZoneError> {
    let column = df.column(name)
        .map_err(|_| ZoneError::invalid_source(source, format!("missing column {name:?}")))?;
    let values = column.str()
        .map_err(|e| ZoneError::invalid_source(source, format!("column {name:?} is not text: {e}")))?;
    Ok(values.into_iter()
        .map(|value| value.unwrap_or_default().to_string())
        .collect())
}

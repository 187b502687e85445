use std::io::Write;

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerWriter, prelude::{Column, CsvWriter}};

use crate::types::{AttrValue, FieldType, OutputRecord, OUTPUT_FIELDS};

/// Build the attribute table of the output layer (no geometry).
pub fn output_to_dataframe<G>(records: &[OutputRecord<G>]) -> Result<DataFrame> {
    let rows = records.iter().map(OutputRecord::attributes).collect::<Vec<_>>();

    let columns = OUTPUT_FIELDS.iter().enumerate()
        .map(|(i, field)| {
            let name = field.name.into();
            match field.ty {
                FieldType::Int => Column::new(name, rows.iter()
                    .map(|row| match &row[i] { AttrValue::Int(v) => *v, _ => None })
                    .collect::<Vec<Option<i64>>>()),
                FieldType::Double => Column::new(name, rows.iter()
                    .map(|row| match &row[i] { AttrValue::Double(v) => *v, _ => None })
                    .collect::<Vec<Option<f64>>>()),
                FieldType::String => Column::new(name, rows.iter()
                    .map(|row| match &row[i] { AttrValue::Text(v) => v.clone(), _ => None })
                    .collect::<Vec<Option<String>>>()),
            }
        })
        .collect::<Vec<_>>();

    DataFrame::new(columns).context("[io::csv::write] Failed to build output table")
}

/// Write the output attribute table as delimited text.
pub fn write_output_table<G, W: Write>(records: &[OutputRecord<G>], writer: W, delimiter: char) -> Result<()> {
    let mut df = output_to_dataframe(records)?;
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(super::read::delimiter_byte(delimiter)?)
        .finish(&mut df)
        .context("[io::csv::write] Failed to write output table")
}

use std::{fs::File, path::Path};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::SerReader, prelude::CsvReadOptions};

/// Convert a delimiter to the single byte polars expects.
pub(crate) fn delimiter_byte(delimiter: char) -> Result<u8> {
    u8::try_from(delimiter).ok()
        .filter(u8::is_ascii)
        .with_context(|| format!("[io::csv] Delimiter must be a single ASCII character, got {delimiter:?}"))
}

/// Reads a delimited text file with a header row; every column is read as a string.
pub fn read_delimited(path: &Path, delimiter: char) -> Result<DataFrame> {
    let separator = delimiter_byte(delimiter)?;
    let file = File::open(path)
        .with_context(|| format!("[io::csv::read] Failed to open delimited file: {}", path.display()))?;
    CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(separator))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(file)
        .finish()
        .with_context(|| format!("[io::csv::read] Failed to read delimited file from {:?}", path))
}

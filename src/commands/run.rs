use anyhow::Result;
use log::info;

use crate::{
    aggregate::aggregate_with_report,
    cli::{Cli, RunArgs},
    io::{self, geojson, open_for_write, tables},
};

pub fn run(cli: &Cli, args: &RunArgs) -> Result<()> {
    let mut config = super::load_config(&args.tables)?;
    config.suppressed_countries.extend(args.suppress.iter().cloned());

    if cli.verbose > 0 {
        eprintln!(
            "[run] zones={} bpi={} update={} -> {}",
            args.zones.display(),
            args.bpi.display(),
            args.update.display(),
            args.output.display()
        );
    }

    // Every input is loaded before any output is opened.
    let language_records = tables::read_language_records(&args.bpi, &config)?;
    let update_records = tables::read_update_records(&args.update, &config)?;
    let layer = io::read_zone_layer(&args.zones, &config.columns.zones)?;
    info!(
        "[run] loaded {} BPI rows, {} update rows, {} zones",
        language_records.len(), update_records.len(), layer.features.len(),
    );

    let (records, report) = aggregate_with_report(&language_records, &update_records, layer.features, &config)?;

    // Both targets are opened and filled before either is committed.
    let mut geojson_out = open_for_write(&args.output, args.force)?;
    let mut csv_out = args.csv.as_deref()
        .map(|path| open_for_write(path, args.force))
        .transpose()?;

    geojson::write_geojson(&records, layer.crs.as_deref(), &mut geojson_out)?;
    if let Some(pending) = csv_out.as_mut() {
        io::csv::write_output_table(&records, pending, config.delimiter)?;
    }

    geojson_out.commit()?;
    if let Some(pending) = csv_out { pending.commit()?; }

    if !config.suppressed_countries.is_empty() {
        info!("[run] suppressed countries: {:?}", config.suppressed_countries);
    }
    println!("Wrote {} zones -> {} ({report})", records.len(), args.output.display());
    Ok(())
}

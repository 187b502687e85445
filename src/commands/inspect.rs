use anyhow::Result;

use crate::{
    aggregate::{unmatched_languages, Apportionment},
    cli::{Cli, InspectArgs},
    index::{ReferenceIndex, UpdateIndex},
    io::tables,
};

pub fn run(cli: &Cli, args: &InspectArgs) -> Result<()> {
    let config = super::load_config(&args.tables)?;
    if cli.verbose > 0 {
        eprintln!("[inspect] bpi={} update={}", args.bpi.display(), args.update.display());
    }

    let reference = ReferenceIndex::new(&tables::read_language_records(&args.bpi, &config)?);
    let update = UpdateIndex::new(&tables::read_update_records(&args.update, &config)?, config.thousands_separator)?;
    let apportionment = Apportionment::new(&reference, &update)?;

    println!(
        "{} reference zones ({} matched), {} reference codes, {} tracked languages",
        reference.num_zones(), apportionment.num_matched_zones(), reference.num_codes(), update.len(),
    );

    println!("Top zones by apportioned population:");
    for (zone, population) in apportionment.ranking().iter().take(args.top) {
        println!(
            "  {zone} [{}]: {population:.1} ({} matches)",
            reference.zone_country(zone).unwrap_or("?"),
            apportionment.matches(zone).len(),
        );
    }

    let unmatched = unmatched_languages(&reference, &update);
    if !unmatched.is_empty() {
        println!("Tracked languages absent from the reference table: {}", unmatched.join(", "));
    }
    Ok(())
}

use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Omega Zone unreached-language CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "omegazone", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Annotate a zone layer with unreached-language statistics (forbids stdout)
    Run(RunArgs),

    /// Report how the BPI and update tables join, without a zone layer
    Inspect(InspectArgs),
}

/// Options shared by every command that reads the language tables.
#[derive(Args, Debug)]
pub struct TableArgs {
    /// JSON config file (column names, separators, suppressed countries)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Thousands separator stripped from population values
    #[arg(long, conflicts_with = "no_separator")]
    pub separator: Option<char>,

    /// Parse population values without stripping any separator
    #[arg(long)]
    pub no_separator: bool,

    /// Field delimiter of the input tables
    #[arg(long)]
    pub delimiter: Option<char>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Zone polygon layer (.shp or .geojson)
    #[arg(value_hint = ValueHint::FilePath)]
    pub zones: PathBuf,

    /// BPI reference table (delimited text)
    #[arg(value_hint = ValueHint::FilePath)]
    pub bpi: PathBuf,

    /// Language-update table (delimited text)
    #[arg(value_hint = ValueHint::FilePath)]
    pub update: PathBuf,

    /// Output GeoJSON file (must be a file path; "-" is rejected)
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub output: PathBuf,

    /// Also write the attribute table as delimited text
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub csv: Option<PathBuf>,

    /// Country whose computed fields are nulled (repeatable)
    #[arg(long = "suppress", value_name = "COUNTRY")]
    pub suppress: Vec<String>,

    #[command(flatten)]
    pub tables: TableArgs,

    /// Overwrite if the file exists
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// BPI reference table (delimited text)
    #[arg(value_hint = ValueHint::FilePath)]
    pub bpi: PathBuf,

    /// Language-update table (delimited text)
    #[arg(value_hint = ValueHint::FilePath)]
    pub update: PathBuf,

    /// Number of top-ranked zones to print
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    #[command(flatten)]
    pub tables: TableArgs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_with_overrides() {
        let cli = Cli::try_parse_from([
            "omegazone", "-vv", "run", "zones.shp", "bpi.csv", "obt.csv", "-o", "out.geojson",
            "--suppress", "Country1", "--suppress", "Country2", "--separator", ",", "--force",
        ]).unwrap();

        assert_eq!(cli.verbose, 2);
        let Commands::Run(args) = cli.command else { panic!("expected run") };
        assert_eq!(args.suppress, ["Country1", "Country2"]);
        assert_eq!(args.tables.separator, Some(','));
        assert!(args.force);
        assert!(args.csv.is_none());
    }

    #[test]
    fn separator_flags_conflict() {
        let result = Cli::try_parse_from([
            "omegazone", "inspect", "bpi.csv", "obt.csv", "--separator", ".", "--no-separator",
        ]);
        assert!(result.is_err());
    }
}

pub mod inspect;
pub mod run;

use anyhow::Result;

use crate::{cli::TableArgs, config::AggregateConfig};

/// Resolve the run config: file values first, then command-line overrides.
pub(crate) fn load_config(args: &TableArgs) -> Result<AggregateConfig> {
    let mut config = match &args.config {
        Some(path) => AggregateConfig::from_json_file(path)?,
        None => AggregateConfig::default(),
    };
    if args.no_separator { config.thousands_separator = None }
    if let Some(separator) = args.separator { config.thousands_separator = Some(separator) }
    if let Some(delimiter) = args.delimiter { config.delimiter = delimiter }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_args() -> TableArgs {
        TableArgs { config: None, separator: None, no_separator: false, delimiter: None }
    }

    #[test]
    fn flags_override_defaults() {
        assert_eq!(load_config(&table_args()).unwrap(), AggregateConfig::default());

        let config = load_config(&TableArgs { no_separator: true, delimiter: Some('|'), ..table_args() }).unwrap();
        assert_eq!(config.thousands_separator, None);
        assert_eq!(config.delimiter, '|');
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "thousands_separator": " ", "delimiter": "," }"#).unwrap();

        let config = load_config(&TableArgs {
            config: Some(path),
            separator: Some(','),
            ..table_args()
        }).unwrap();
        assert_eq!(config.thousands_separator, Some(','));
        assert_eq!(config.delimiter, ',');
    }
}

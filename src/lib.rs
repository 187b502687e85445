#![doc = "Omega Zone unreached-language aggregation"]
mod aggregate;
mod config;
mod error;
mod index;
mod types;

pub mod cli;
pub mod commands;
pub mod io;

#[doc(inline)]
pub use aggregate::{
    aggregate, aggregate_with_report, estimate_zone, redact_suppressed, tally_zones, unmatched_languages,
    AggregateReport, Apportionment, LanguageFootprint, ZoneEstimate, ZoneTally,
};

#[doc(inline)]
pub use config::{AggregateConfig, ColumnConfig, ReferenceColumns, UpdateColumns, ZoneColumns};

#[doc(inline)]
pub use error::{Result, ZoneError};

#[doc(inline)]
pub use index::{LanguageInfo, ReferenceIndex, UpdateIndex};

#[doc(inline)]
pub use types::{
    AttrValue, FieldType, LanguageDetail, LanguageDetails, LanguageRecord, OutputField, OutputRecord,
    UpdateRecord, ZoneFeature, ZoneLayer, OUTPUT_FIELDS,
};

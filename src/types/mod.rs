mod records;
mod schema;

pub use records::{LanguageDetail, LanguageDetails, LanguageRecord, OutputRecord, UpdateRecord, ZoneFeature, ZoneLayer};
pub use schema::{AttrValue, FieldType, OutputField, OUTPUT_FIELDS};

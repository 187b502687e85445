//! Read-only lookup structures built from the two language tables.

mod reference;
mod update;

pub use reference::ReferenceIndex;
pub use update::{LanguageInfo, UpdateIndex};

//! Mapping tables and the per-run mapping store
//!
//! Mapping documents are named JSON key-value files in a configurable
//! directory:
//!
//! - `location_mappings.json`, `attribute_mappings.json`,
//!   `province_mappings.json`, `district_mappings.json` -- flat
//!   source-key to destination-key tables
//! - `forms/form_<id>_mappings.json` -- per-form observation mappings
//!   plus program identifiers, addressable by form id or form uuid
//! - `recode_mappings.json` -- optional per-data-element value recodings

pub mod store;
pub mod tables;

pub use store::MappingStore;
pub use tables::{FormMapping, MappingName, MappingTable, RecodeCatalog};

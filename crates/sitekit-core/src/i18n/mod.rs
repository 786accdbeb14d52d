//! Message translation backed by gettext `.po` catalogs

pub mod catalog;
pub mod po_parser;
pub mod translator;

pub use catalog::{MessageCatalog, PluralRule};
pub use po_parser::parse_po;
pub use translator::{Translator, catalog_path};

//! Catalog source adapters.

mod csv_loader;

pub use csv_loader::CsvCatalogLoader;

// src/integrations/mod.rs
//
// External Integrations Module

pub mod catalog_source;
pub mod tmdb;

pub use catalog_source::CatalogSource;
pub use tmdb::TmdbClient;

#[cfg(test)]
pub use catalog_source::MockCatalogSource;

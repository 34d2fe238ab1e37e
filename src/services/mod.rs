pub mod catalog_service;
pub use catalog_service::CatalogService;

pub mod catalog_service_impl;
pub use catalog_service_impl::RowStoreCatalogService;

pub mod projector;
pub use projector::{KeyCreativesProjector, render_key_creatives};

pub mod search;
pub use search::SearchIndex;

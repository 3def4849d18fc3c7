#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

pub const CATALOG_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod http;
pub mod mob_search;
pub mod service;
pub mod store;

pub use config::{CatalogConfig, load_config};
pub use http::{AppState, router};
pub use mob_search::{SearchError, find_mob};
pub use service::{CatalogError, CatalogService};
pub use store::{JsonFileStore, MemoryStore, MobStore};

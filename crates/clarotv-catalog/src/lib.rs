//! Location catalog for clarotv.
//!
//! Loads the static Brazilian state and city datasets (JSON arrays) once
//! and answers the lookups the schedule selector needs.

/// In-memory catalog and lookups.
pub mod catalog;
mod dataset;
mod error;
mod search;

#[allow(clippy::module_name_repetitions)]
pub use catalog::LocationCatalog;
pub use dataset::{City, State, load_cities, load_states};
pub use error::CatalogLoadError;
pub use search::fold_for_search;

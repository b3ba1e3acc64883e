//! Dataset records and JSON file loading.

use std::path::Path;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::error::CatalogLoadError;

/// A Brazilian state (`states.json` record).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct State {
    /// Display name, also the key cities refer to.
    pub name: String,
    /// Two-letter abbreviation (`sigla`), when present.
    #[serde(default, rename = "sigla")]
    pub abbreviation: Option<String>,
}

/// A city (`cities.json` record).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct City {
    /// Display name.
    pub name: String,
    /// Owning state's `name` (`UF-nome`).
    #[serde(rename = "UF-nome")]
    pub state_name: String,
}

/// Reads a JSON array of records from `path`.
fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogLoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| CatalogLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CatalogLoadError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the states dataset.
///
/// # Errors
///
/// Returns [`CatalogLoadError`] if the file is missing or malformed.
pub fn load_states(path: &Path) -> Result<Vec<State>, CatalogLoadError> {
    let states = load_records::<State>(path)?;
    tracing::debug!(path = %path.display(), count = states.len(), "States loaded");
    Ok(states)
}

/// Loads the cities dataset.
///
/// # Errors
///
/// Returns [`CatalogLoadError`] if the file is missing or malformed.
pub fn load_cities(path: &Path) -> Result<Vec<City>, CatalogLoadError> {
    let cities = load_records::<City>(path)?;
    tracing::debug!(path = %path.display(), count = cities.len(), "Cities loaded");
    Ok(cities)
}

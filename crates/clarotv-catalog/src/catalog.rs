//! `LocationCatalog` - state and city lookups.

use std::path::Path;

use super::dataset::{City, State, load_cities, load_states};
use super::error::CatalogLoadError;
use super::search::fold_for_search;

/// Read-only state/city catalog, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct LocationCatalog {
    /// States in dataset order.
    states: Vec<State>,
    /// Cities in dataset order.
    cities: Vec<City>,
}

impl LocationCatalog {
    /// Creates a catalog from already-loaded records.
    #[must_use]
    pub const fn new(states: Vec<State>, cities: Vec<City>) -> Self {
        Self { states, cities }
    }

    /// Loads both datasets.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogLoadError`] if either dataset is missing or malformed.
    pub fn load(states_path: &Path, cities_path: &Path) -> Result<Self, CatalogLoadError> {
        let states = load_states(states_path)?;
        let cities = load_cities(cities_path)?;
        tracing::info!(
            states = states.len(),
            cities = cities.len(),
            "Location catalog loaded"
        );
        Ok(Self::new(states, cities))
    }

    /// Loads both datasets, falling back to an empty catalog on failure.
    ///
    /// The failure is logged at `ERROR` and handed back so the caller can
    /// show it; the returned catalog is then empty.
    #[must_use]
    pub fn load_or_empty(
        states_path: &Path,
        cities_path: &Path,
    ) -> (Self, Option<CatalogLoadError>) {
        match Self::load(states_path, cities_path) {
            Ok(catalog) => (catalog, None),
            Err(err) => {
                tracing::error!(
                    path = %err.path().display(),
                    "Failed to load location catalog: {err}"
                );
                (Self::default(), Some(err))
            }
        }
    }

    /// Returns `true` when no states are loaded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// State records in dataset order.
    #[must_use]
    pub fn states(&self) -> &[State] {
        &self.states
    }

    /// State names in dataset order.
    #[must_use]
    pub fn list_states(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.name.as_str()).collect()
    }

    /// Names of the cities whose state key equals `state_name` exactly.
    ///
    /// Unknown states and states without cities yield an empty list.
    #[must_use]
    pub fn list_cities(&self, state_name: &str) -> Vec<&str> {
        self.cities
            .iter()
            .filter(|c| c.state_name == state_name)
            .map(|c| c.name.as_str())
            .collect()
    }

    /// State names whose folded form contains the folded `filter`.
    #[must_use]
    pub fn search_states(&self, filter: &str) -> Vec<&str> {
        let needle = fold_for_search(filter);
        self.states
            .iter()
            .filter(|s| fold_for_search(&s.name).contains(&needle))
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Resolves user input to a canonical state name.
    ///
    /// Tries an exact name, then the abbreviation, then an accent- and
    /// case-insensitive match.
    #[must_use]
    pub fn resolve_state(&self, input: &str) -> Option<&str> {
        let input = input.trim();
        if let Some(state) = self.states.iter().find(|s| s.name == input) {
            return Some(state.name.as_str());
        }
        if let Some(state) = self.states.iter().find(|s| {
            s.abbreviation
                .as_deref()
                .is_some_and(|abbr| abbr.eq_ignore_ascii_case(input))
        }) {
            return Some(state.name.as_str());
        }
        let folded = fold_for_search(input);
        self.states
            .iter()
            .find(|s| fold_for_search(&s.name) == folded)
            .map(|s| s.name.as_str())
    }

    /// Resolves user input to a canonical city name within `state_name`.
    #[must_use]
    pub fn resolve_city(&self, state_name: &str, input: &str) -> Option<&str> {
        let input = input.trim();
        let cities = self.list_cities(state_name);
        if let Some(city) = cities.iter().find(|c| **c == input) {
            return Some(*city);
        }
        let folded = fold_for_search(input);
        cities.into_iter().find(|c| fold_for_search(c) == folded)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    fn state(name: &str, abbr: &str) -> State {
        State {
            name: String::from(name),
            abbreviation: Some(String::from(abbr)),
        }
    }

    fn city(name: &str, state_name: &str) -> City {
        City {
            name: String::from(name),
            state_name: String::from(state_name),
        }
    }

    fn make_catalog() -> LocationCatalog {
        LocationCatalog::new(
            vec![
                state("São Paulo", "SP"),
                state("Rio de Janeiro", "RJ"),
                state("Amapá", "AP"),
            ],
            vec![
                city("São Paulo", "São Paulo"),
                city("Niterói", "Rio de Janeiro"),
                city("Campinas", "São Paulo"),
                city("Santos", "São Paulo"),
                city("Campinas do Sul", "Rio Grande do Sul"),
            ],
        )
    }

    #[test]
    fn test_list_states_keeps_dataset_order() {
        // Arrange
        let catalog = make_catalog();

        // Act
        let states = catalog.list_states();

        // Assert
        assert_eq!(states, ["São Paulo", "Rio de Janeiro", "Amapá"]);
    }

    #[test]
    fn test_list_cities_exact_match_only() {
        // Arrange
        let catalog = make_catalog();

        // Act
        let cities = catalog.list_cities("São Paulo");

        // Assert
        assert_eq!(cities, ["São Paulo", "Campinas", "Santos"]);
    }

    #[test]
    fn test_list_cities_is_not_accent_insensitive() {
        // Arrange
        let catalog = make_catalog();

        // Act
        let cities = catalog.list_cities("Sao Paulo");

        // Assert
        assert!(cities.is_empty());
    }

    #[test]
    fn test_list_cities_empty_for_state_without_cities() {
        // Arrange
        let catalog = make_catalog();

        // Act
        let cities = catalog.list_cities("Amapá");

        // Assert
        assert!(cities.is_empty());
    }

    #[test]
    fn test_search_states_folds_accents() {
        // Arrange
        let catalog = make_catalog();

        // Act
        let found = catalog.search_states("sao");

        // Assert
        assert_eq!(found, ["São Paulo"]);
    }

    #[test]
    fn test_resolve_state() {
        // Arrange
        let catalog = make_catalog();

        // Act & Assert
        assert_eq!(catalog.resolve_state("Rio de Janeiro"), Some("Rio de Janeiro"));
        assert_eq!(catalog.resolve_state("sp"), Some("São Paulo"));
        assert_eq!(catalog.resolve_state(" amapa "), Some("Amapá"));
        assert_eq!(catalog.resolve_state("Atlântida"), None);
    }

    #[test]
    fn test_resolve_city() {
        // Arrange
        let catalog = make_catalog();

        // Act & Assert
        assert_eq!(catalog.resolve_city("Rio de Janeiro", "niteroi"), Some("Niterói"));
        assert_eq!(catalog.resolve_city("São Paulo", "Campinas"), Some("Campinas"));
        assert_eq!(catalog.resolve_city("Rio de Janeiro", "Campinas"), None);
    }

    #[test]
    fn test_load_from_files() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let states_path = dir.path().join("states.json");
        let cities_path = dir.path().join("cities.json");
        std::fs::write(&states_path, r#"[{"name": "Bahia"}]"#).unwrap();
        std::fs::write(
            &cities_path,
            r#"[{"name": "Salvador", "UF-nome": "Bahia"}, {"name": "Ilhéus", "UF-nome": "Bahia"}]"#,
        )
        .unwrap();

        // Act
        let catalog = LocationCatalog::load(&states_path, &cities_path).unwrap();

        // Assert
        assert_eq!(catalog.list_states(), ["Bahia"]);
        assert_eq!(catalog.list_cities("Bahia"), ["Salvador", "Ilhéus"]);
    }

    #[test]
    fn test_load_or_empty_returns_diagnostic() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let states_path = dir.path().join("states.json");
        let cities_path = dir.path().join("missing.json");
        std::fs::write(&states_path, r#"[{"name": "Bahia"}]"#).unwrap();

        // Act
        let (catalog, err) = LocationCatalog::load_or_empty(&states_path, &cities_path);

        // Assert
        assert!(catalog.is_empty());
        assert!(catalog.list_cities("Bahia").is_empty());
        let err = err.unwrap();
        assert!(err.to_string().contains("missing.json"));
    }

    #[test]
    fn test_load_or_empty_logs_error() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let states_path = dir.path().join("states.json");
        std::fs::write(&states_path, "[").unwrap();

        let (subscriber, handle) = subscriber::mock()
            .event(expect::event().at_level(tracing::Level::ERROR))
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            let (catalog, err) = LocationCatalog::load_or_empty(&states_path, &states_path);
            assert!(catalog.is_empty());
            assert!(matches!(err, Some(CatalogLoadError::Malformed { .. })));
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_load_bundled_datasets() {
        // Arrange
        let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");

        // Act
        let catalog =
            LocationCatalog::load(&root.join("states.json"), &root.join("cities.json")).unwrap();

        // Assert
        assert_eq!(catalog.list_states().len(), 27);
        assert!(catalog.list_cities("São Paulo").contains(&"Campinas"));
        for state in catalog.list_states() {
            assert!(
                !catalog.list_cities(state).is_empty(),
                "no cities for {state}"
            );
        }
    }
}

//! Interaction controller.
//!
//! The selection is an immutable-per-turn [`SelectionContext`]; every
//! transition returns a new one. [`assess`] derives the location phase,
//! the time window, and whether "Carregar programação" may fire.
//! [`run_fetch`] performs the single request and turns its outcome into a
//! [`FetchPhase`].

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use chrono_tz::Tz;
use clarotv_api::epg::{
    FetchError, LocalEpgApi, ScheduleQuery, TimeWindow, WindowError, log_fetch_failure,
    to_epoch_naive,
};
use clarotv_catalog::LocationCatalog;
use tracing::instrument;

use crate::schedule::ScheduleView;

/// Message shown while the window is not strictly increasing.
pub const INVALID_WINDOW_MESSAGE: &str =
    "Data de inicio não pode ser inferior ou igual a data fim.";

/// User selection for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    /// Selected state name.
    pub state: Option<String>,
    /// Selected city name.
    pub city: Option<String>,
    /// Start day.
    pub start_date: NaiveDate,
    /// Start time of day.
    pub start_time: NaiveTime,
    /// End day.
    pub end_date: NaiveDate,
    /// End time of day.
    pub end_time: NaiveTime,
}

impl SelectionContext {
    /// Empty selection with every date/time set to `now` (minute precision).
    #[must_use]
    pub fn starting_at(now: NaiveDateTime) -> Self {
        let time = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now.time());
        Self {
            state: None,
            city: None,
            start_date: now.date(),
            start_time: time,
            end_date: now.date(),
            end_time: time,
        }
    }

    /// Picks a state. A different state clears the city.
    #[must_use]
    pub fn with_state(self, state: impl Into<String>) -> Self {
        let state = state.into();
        let city = if self.state.as_deref() == Some(state.as_str()) {
            self.city
        } else {
            None
        };
        Self {
            state: Some(state),
            city,
            ..self
        }
    }

    /// Picks a city.
    #[must_use]
    pub fn with_city(self, city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..self
        }
    }

    /// Sets the start day.
    #[must_use]
    pub fn with_start_date(self, start_date: NaiveDate) -> Self {
        Self { start_date, ..self }
    }

    /// Sets the start time.
    #[must_use]
    pub fn with_start_time(self, start_time: NaiveTime) -> Self {
        Self { start_time, ..self }
    }

    /// Sets the end day.
    #[must_use]
    pub fn with_end_date(self, end_date: NaiveDate) -> Self {
        Self { end_date, ..self }
    }

    /// Sets the end time.
    #[must_use]
    pub fn with_end_time(self, end_time: NaiveTime) -> Self {
        Self { end_time, ..self }
    }

    /// Start as wall-clock date-time.
    #[must_use]
    pub fn start_local(&self) -> NaiveDateTime {
        self.start_date.and_time(self.start_time)
    }

    /// End as wall-clock date-time.
    #[must_use]
    pub fn end_local(&self) -> NaiveDateTime {
        self.end_date.and_time(self.end_time)
    }
}

/// Where the location selection stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPhase {
    /// No state picked yet.
    NoStateSelected,
    /// The picked state has no cities; the city selector is disabled.
    CityListEmpty,
    /// Cities are available but none is picked.
    CityPending,
    /// State and city picked.
    CitySelected,
}

/// Derived view of a [`SelectionContext`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    /// Location phase.
    pub location: LocationPhase,
    /// Window built from the four date/time fields.
    pub window: Result<TimeWindow, WindowError>,
    /// Request to send, present only when the fetch action is enabled.
    query: Option<ScheduleQuery>,
}

impl Assessment {
    /// Whether "Carregar programação" is enabled.
    #[must_use]
    pub const fn fetch_enabled(&self) -> bool {
        self.query.is_some()
    }

    /// Request for the current selection, if enabled.
    #[must_use]
    pub const fn query(&self) -> Option<&ScheduleQuery> {
        self.query.as_ref()
    }

    /// Blocking message for an invalid window.
    #[must_use]
    pub fn blocking_message(&self) -> Option<&'static str> {
        match self.window {
            Ok(_) => None,
            Err(_) => Some(INVALID_WINDOW_MESSAGE),
        }
    }
}

/// Evaluates `ctx` against the catalog and timezone.
#[must_use]
pub fn assess(ctx: &SelectionContext, catalog: &LocationCatalog, tz: Tz) -> Assessment {
    let location = match ctx.state.as_deref() {
        None => LocationPhase::NoStateSelected,
        Some(state) => {
            let cities = catalog.list_cities(state);
            if cities.is_empty() {
                LocationPhase::CityListEmpty
            } else if ctx
                .city
                .as_deref()
                .is_some_and(|city| cities.contains(&city))
            {
                LocationPhase::CitySelected
            } else {
                LocationPhase::CityPending
            }
        }
    };

    let window = TimeWindow::new(
        to_epoch_naive(ctx.start_local(), tz),
        to_epoch_naive(ctx.end_local(), tz),
    );

    let query = match (location, &window, &ctx.state, &ctx.city) {
        (LocationPhase::CitySelected, Ok(window), Some(state), Some(city)) => {
            Some(ScheduleQuery::new(state.as_str(), city.as_str(), *window))
        }
        _ => None,
    };

    Assessment {
        location,
        window,
        query,
    }
}

/// Fetch lifecycle of the schedule pane.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Request in flight.
    Fetching,
    /// Last request succeeded.
    Rendered(ScheduleView),
    /// Last request failed.
    Failed(FetchError),
}

/// Sends `query` once and maps the outcome.
///
/// Failures are logged with their class and returned as
/// [`FetchPhase::Failed`]; nothing is rendered for them.
#[allow(clippy::future_not_send)]
#[instrument(skip_all, fields(location = %query.location()))]
pub async fn run_fetch(
    api: &impl LocalEpgApi,
    query: &ScheduleQuery,
    image_base_url: &str,
) -> FetchPhase {
    match api.fetch_schedule(query).await {
        Ok(response) => {
            tracing::info!(
                location = %query.location(),
                channels = response.channels.len(),
                programs = response.program_count(),
                "Schedule loaded"
            );
            FetchPhase::Rendered(ScheduleView::from_response(&response, image_base_url))
        }
        Err(error) => {
            log_fetch_failure(query, &error);
            FetchPhase::Failed(error)
        }
    }
}

/// Current wall-clock time in `tz`.
#[must_use]
pub fn local_now(tz: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&tz).naive_local()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::cell::Cell;

    use chrono::TimeDelta;
    use clarotv_api::epg::{EpgClient, EpgResponse};
    use clarotv_catalog::{City, State};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const IMAGE_BASE: &str = "http://mondrian.claro.com.br";

    struct CannedApi {
        result: Result<EpgResponse, FetchError>,
        calls: Cell<usize>,
    }

    impl CannedApi {
        fn new(result: Result<EpgResponse, FetchError>) -> Self {
            Self {
                result,
                calls: Cell::new(0),
            }
        }
    }

    impl LocalEpgApi for CannedApi {
        async fn fetch_schedule(&self, _query: &ScheduleQuery) -> Result<EpgResponse, FetchError> {
            self.calls.set(self.calls.get() + 1);
            self.result.clone()
        }
    }

    fn catalog() -> LocationCatalog {
        let state = |name: &str| State {
            name: String::from(name),
            abbreviation: None,
        };
        let city = |name: &str, state_name: &str| City {
            name: String::from(name),
            state_name: String::from(state_name),
        };
        LocationCatalog::new(
            vec![state("São Paulo"), state("Acre"), state("Distrito Federal")],
            vec![
                city("Campinas", "São Paulo"),
                city("Santos", "São Paulo"),
                city("Rio Branco", "Acre"),
            ],
        )
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(14, 0, 37)
            .unwrap()
    }

    /// All fields at `now()`, end one hour later.
    fn next_hour() -> SelectionContext {
        let ctx = SelectionContext::starting_at(now());
        let end = ctx
            .start_local()
            .checked_add_signed(TimeDelta::hours(1))
            .unwrap();
        ctx.with_end_date(end.date()).with_end_time(end.time())
    }

    fn campinas_next_hour() -> SelectionContext {
        next_hour().with_state("São Paulo").with_city("Campinas")
    }

    #[test]
    fn test_starting_at_truncates_to_minute_and_blocks_fetch() {
        // Arrange
        let ctx = SelectionContext::starting_at(now());

        // Act
        let assessment = assess(&ctx, &catalog(), chrono_tz::America::Sao_Paulo);

        // Assert
        assert_eq!(ctx.start_time, NaiveTime::from_hms_opt(14, 0, 0).unwrap());
        assert_eq!(ctx.start_local(), ctx.end_local());
        assert_eq!(assessment.location, LocationPhase::NoStateSelected);
        assert!(!assessment.fetch_enabled());
        assert_eq!(assessment.blocking_message(), Some(INVALID_WINDOW_MESSAGE));
    }

    #[test]
    fn test_start_after_end_blocks_fetch() {
        // Arrange
        let ctx = campinas_next_hour()
            .with_end_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());

        // Act
        let assessment = assess(&ctx, &catalog(), chrono_tz::America::Sao_Paulo);

        // Assert
        assert_eq!(assessment.location, LocationPhase::CitySelected);
        assert!(matches!(
            assessment.window,
            Err(WindowError::NotAfterStart { .. })
        ));
        assert!(!assessment.fetch_enabled());
        assert!(assessment.query().is_none());
    }

    #[test]
    fn test_state_city_and_valid_window_enable_fetch() {
        // Arrange
        let ctx = campinas_next_hour();

        // Act
        let assessment = assess(&ctx, &catalog(), chrono_tz::America::Sao_Paulo);

        // Assert
        assert!(assessment.fetch_enabled());
        assert_eq!(assessment.blocking_message(), None);
        let query = assessment.query().unwrap();
        assert_eq!(query.location(), "Campinas,São Paulo");
        assert_eq!(query.window.start(), 1_710_090_000);
        assert_eq!(query.window.end(), 1_710_093_600);
    }

    #[test]
    fn test_valid_window_without_city_stays_disabled() {
        // Arrange
        let ctx = next_hour().with_state("São Paulo");

        // Act
        let assessment = assess(&ctx, &catalog(), chrono_tz::America::Sao_Paulo);

        // Assert
        assert_eq!(assessment.location, LocationPhase::CityPending);
        assert!(assessment.window.is_ok());
        assert!(!assessment.fetch_enabled());
    }

    #[test]
    fn test_state_without_cities_disables_city_selection() {
        // Arrange
        let ctx = next_hour().with_state("Distrito Federal");

        // Act
        let assessment = assess(&ctx, &catalog(), chrono_tz::America::Sao_Paulo);

        // Assert
        assert_eq!(assessment.location, LocationPhase::CityListEmpty);
        assert!(!assessment.fetch_enabled());
    }

    #[test]
    fn test_changing_state_clears_city() {
        // Arrange
        let ctx = campinas_next_hour();

        // Act
        let same = ctx.clone().with_state("São Paulo");
        let other = ctx.with_state("Acre");

        // Assert
        assert_eq!(same.city.as_deref(), Some("Campinas"));
        assert_eq!(other.city, None);
        assert_eq!(
            assess(&other, &catalog(), chrono_tz::America::Sao_Paulo).location,
            LocationPhase::CityPending
        );
    }

    #[test]
    fn test_city_from_another_state_is_not_selected() {
        // Arrange
        let ctx = next_hour().with_state("São Paulo").with_city("Rio Branco");

        // Act
        let assessment = assess(&ctx, &catalog(), chrono_tz::America::Sao_Paulo);

        // Assert
        assert_eq!(assessment.location, LocationPhase::CityPending);
        assert!(!assessment.fetch_enabled());
    }

    #[tokio::test]
    async fn test_run_fetch_timeout_yields_failed_without_render() {
        // Arrange
        let api = CannedApi::new(Err(FetchError::Timeout(String::from("deadline elapsed"))));
        let query = assess(&campinas_next_hour(), &catalog(), chrono_tz::America::Sao_Paulo)
            .query()
            .cloned()
            .unwrap();

        // Act
        let phase = run_fetch(&api, &query, IMAGE_BASE).await;

        // Assert
        assert_eq!(api.calls.get(), 1);
        assert!(matches!(phase, FetchPhase::Failed(FetchError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_run_fetch_status_error_yields_failed() {
        // Arrange
        let api = CannedApi::new(Err(FetchError::HttpStatus {
            status: 404,
            url: String::from("http://localhost/epg"),
        }));
        let query = assess(&campinas_next_hour(), &catalog(), chrono_tz::America::Sao_Paulo)
            .query()
            .cloned()
            .unwrap();

        // Act
        let phase = run_fetch(&api, &query, IMAGE_BASE).await;

        // Assert
        let FetchPhase::Failed(error) = phase else {
            panic!("expected failure, got {phase:?}");
        };
        assert_eq!(error.kind(), "http_status");
    }

    #[tokio::test]
    async fn test_end_to_end_campinas_one_hour() {
        // Arrange
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/avsclient/1.2/epg/livechannels"))
            .and(query_param("startTime", "1710090000"))
            .and(query_param("endTime", "1710093600"))
            .and(query_param("location", "Campinas,São Paulo"))
            .and(query_param("channel", "PCTV"))
            .respond_with(ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/epg/livechannels_single.json"
            )))
            .expect(1)
            .mount(&mock_server)
            .await;
        let client = EpgClient::builder()
            .base_url(
                format!("{}/avsclient/1.2/epg/livechannels", mock_server.uri())
                    .parse()
                    .unwrap(),
            )
            .user_agent("test/0.0.0")
            .build()
            .unwrap();
        let assessment = assess(&campinas_next_hour(), &catalog(), chrono_tz::America::Sao_Paulo);

        // Act
        let phase = run_fetch(&client, assessment.query().unwrap(), IMAGE_BASE).await;

        // Assert
        let FetchPhase::Rendered(view) = phase else {
            panic!("expected rendered schedule, got {phase:?}");
        };
        assert_eq!(view.len(), 1);
        let titles: Vec<&str> = view.rows[0]
            .programs
            .iter()
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(titles, ["Castelo Rá-Tim-Bum", "Roda Viva"]);
    }
}

//! EPG request parameter types.

use thiserror::Error;

use super::error::TimeError;
use super::time::to_epoch;

/// Content-provider filter sent as the `channel` parameter.
pub const CHANNEL_FILTER: &str = "PCTV";

/// Reasons a time window cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// `end` is equal to or earlier than `start`.
    #[error("end ({end}) must be strictly after start ({start})")]
    NotAfterStart {
        /// Start epoch seconds.
        start: i64,
        /// End epoch seconds.
        end: i64,
    },
    /// One of the bounds could not be converted.
    #[error(transparent)]
    Time(#[from] TimeError),
}

/// Absolute `[start, end]` window in epoch seconds.
///
/// Always satisfies `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: i64,
    end: i64,
}

impl TimeWindow {
    /// Creates a window from epoch seconds.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::NotAfterStart`] unless `end > start`.
    pub const fn new(start: i64, end: i64) -> Result<Self, WindowError> {
        if end > start {
            Ok(Self { start, end })
        } else {
            Err(WindowError::NotAfterStart { start, end })
        }
    }

    /// Creates a window from two `YYYY-MM-DD HH:MM:SS` wall-clock strings.
    ///
    /// # Errors
    ///
    /// Returns [`WindowError::Time`] if either bound fails to convert, or
    /// [`WindowError::NotAfterStart`] if the order is wrong.
    pub fn from_local(start: &str, end: &str, timezone: &str) -> Result<Self, WindowError> {
        let start = to_epoch(start, timezone)?;
        let end = to_epoch(end, timezone)?;
        Self::new(start, end)
    }

    /// Start epoch seconds.
    #[must_use]
    pub const fn start(&self) -> i64 {
        self.start
    }

    /// End epoch seconds.
    #[must_use]
    pub const fn end(&self) -> i64 {
        self.end
    }

    /// Window length in seconds (always positive).
    #[must_use]
    pub const fn duration_secs(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

/// One schedule request: location plus time window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleQuery {
    /// State display name (e.g. `"São Paulo"`).
    pub state_name: String,
    /// City display name (e.g. `"Campinas"`).
    pub city_name: String,
    /// Requested window.
    pub window: TimeWindow,
}

impl ScheduleQuery {
    /// Creates a new query.
    #[must_use]
    pub fn new(
        state_name: impl Into<String>,
        city_name: impl Into<String>,
        window: TimeWindow,
    ) -> Self {
        Self {
            state_name: state_name.into(),
            city_name: city_name.into(),
            window,
        }
    }

    /// `location` parameter value: `"{city},{state}"`.
    #[must_use]
    pub fn location(&self) -> String {
        format!("{},{}", self.city_name, self.state_name)
    }

    /// Builds the query string pairs in request order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("startTime", self.window.start().to_string()),
            ("endTime", self.window.end().to_string()),
            ("location", self.location()),
            ("channel", String::from(CHANNEL_FILTER)),
        ]
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;

    #[test]
    fn test_window_requires_end_after_start() {
        // Arrange & Act
        let valid = TimeWindow::new(100, 101);
        let equal = TimeWindow::new(100, 100);
        let reversed = TimeWindow::new(200, 100);

        // Assert
        assert!(valid.is_ok());
        assert_eq!(
            equal,
            Err(WindowError::NotAfterStart {
                start: 100,
                end: 100
            })
        );
        assert!(matches!(reversed, Err(WindowError::NotAfterStart { .. })));
    }

    #[test]
    fn test_window_from_local() {
        // Arrange & Act
        let window = TimeWindow::from_local(
            "2024-01-01 00:00:00",
            "2024-01-01 01:00:00",
            "America/Sao_Paulo",
        )
        .unwrap();

        // Assert
        assert_eq!(window.start(), 1_704_078_000);
        assert_eq!(window.end(), 1_704_081_600);
        assert_eq!(window.duration_secs(), 3_600);
    }

    #[test]
    fn test_window_from_local_propagates_time_error() {
        // Arrange & Act
        let result = TimeWindow::from_local("2024-01-01", "2024-01-02", "America/Sao_Paulo");

        // Assert
        assert!(matches!(
            result,
            Err(WindowError::Time(TimeError::Parse { .. }))
        ));
    }

    #[test]
    fn test_query_location_is_city_then_state() {
        // Arrange
        let window = TimeWindow::new(1, 2).unwrap();

        // Act
        let query = ScheduleQuery::new("São Paulo", "Campinas", window);

        // Assert
        assert_eq!(query.location(), "Campinas,São Paulo");
    }

    #[test]
    fn test_query_pairs() {
        // Arrange
        let window = TimeWindow::new(1_704_078_000, 1_704_081_600).unwrap();
        let query = ScheduleQuery::new("Rio de Janeiro", "Niterói", window);

        // Act
        let pairs = query.to_query_pairs();

        // Assert
        assert_eq!(pairs.len(), 4);
        assert_eq!(pairs[0], ("startTime", String::from("1704078000")));
        assert_eq!(pairs[1], ("endTime", String::from("1704081600")));
        assert_eq!(pairs[2], ("location", String::from("Niterói,Rio de Janeiro")));
        assert_eq!(pairs[3], ("channel", String::from("PCTV")));
    }
}

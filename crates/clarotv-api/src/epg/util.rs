//! EPG diagnostics.

use super::error::FetchError;
use super::params::ScheduleQuery;

/// Emits the classified `WARN` diagnostic for a failed request.
pub fn log_fetch_failure(query: &ScheduleQuery, error: &FetchError) {
    tracing::warn!(
        kind = error.kind(),
        location = %query.location(),
        start = query.window.start(),
        end = query.window.end(),
        "EPG request failed: {error}"
    );
}

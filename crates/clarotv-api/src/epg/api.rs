//! `EpgApi` trait definition.
#![allow(clippy::future_not_send)]

use super::error::FetchError;
use super::params::ScheduleQuery;
use super::types::EpgResponse;

/// Claro TV EPG API trait.
///
/// Abstracts API operations for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(EpgApi: Send)]
pub trait LocalEpgApi {
    /// Fetches the live channel schedule for one location and window.
    ///
    /// Makes exactly one request; there is no retry.
    ///
    /// # Errors
    ///
    /// Returns a classified [`FetchError`] if the request fails, the server
    /// answers with a non-2xx status, or the body cannot be decoded.
    async fn fetch_schedule(&self, query: &ScheduleQuery) -> Result<EpgResponse, FetchError>;
}

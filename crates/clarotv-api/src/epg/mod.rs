//! Claro TV EPG API client module.
//!
//! Handles HTTP requests to the `avsclient` `epg/livechannels` endpoint
//! and decodes the per-channel schedule listing.

mod api;
mod client;
mod error;
mod params;
mod time;
mod types;
mod util;

#[allow(clippy::module_name_repetitions)]
pub use api::{EpgApi, LocalEpgApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{
    DEFAULT_BASE_URL, DEFAULT_IMAGE_BASE_URL, EpgClient, EpgClientBuilder, REQUEST_TIMEOUT,
};
pub use error::{FetchError, TimeError};
pub use params::{CHANNEL_FILTER, ScheduleQuery, TimeWindow, WindowError};
pub use time::{DEFAULT_TIMEZONE, LOCAL_DATETIME_FORMAT, parse_timezone, to_epoch, to_epoch_naive};
#[allow(clippy::module_name_repetitions)]
pub use types::{EpgChannel, EpgProgram, EpgResponse, logo_url};
pub use util::log_fetch_failure;

//! API client library for clarotv.
//!
//! Provides the client for the Claro TV EPG (`livechannels`) endpoint
//! together with the time-window and timestamp helpers it needs.

/// Claro TV EPG API client.
pub mod epg;

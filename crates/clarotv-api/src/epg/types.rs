//! EPG response types.
//!
//! Only the fields the schedule view needs are extracted; everything
//! else in the payload is ignored.

use serde::{Deserialize, Deserializer};

/// Top-level JSON envelope (`{"response": {...}}`).
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    response: Option<LiveChannelsBody>,
}

/// `response` object holding the channel listing.
#[derive(Debug, Deserialize)]
struct LiveChannelsBody {
    #[serde(default, rename = "liveChannels")]
    live_channels: Option<Vec<EpgChannel>>,
}

/// Decoded `livechannels` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Envelope")]
pub struct EpgResponse {
    /// Channels in service order.
    pub channels: Vec<EpgChannel>,
}

impl From<Envelope> for EpgResponse {
    fn from(envelope: Envelope) -> Self {
        let channels = envelope
            .response
            .and_then(|body| body.live_channels)
            .unwrap_or_default();
        Self { channels }
    }
}

impl EpgResponse {
    /// Total number of programs across all channels.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.channels.iter().map(|c| c.programs.len()).sum()
    }
}

/// A live channel with its schedule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpgChannel {
    /// Channel display name.
    pub name: String,
    /// Logo identifier on the image host (`mondrianLogo`). Empty when absent.
    #[serde(default, rename = "mondrianLogo", deserialize_with = "null_as_default")]
    pub logo_id: String,
    /// Programs in service order (`schedules`).
    #[serde(default, rename = "schedules", deserialize_with = "null_as_default")]
    pub programs: Vec<EpgProgram>,
}

impl EpgChannel {
    /// Logo URL on `image_base_url`.
    #[must_use]
    pub fn logo_url(&self, image_base_url: &str) -> String {
        logo_url(image_base_url, &self.logo_id)
    }
}

/// A scheduled program.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EpgProgram {
    /// Program title. Empty when absent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    /// Display time as formatted by the service (`formattedTime`). Empty when absent.
    #[serde(default, rename = "formattedTime", deserialize_with = "null_as_default")]
    pub formatted_time: String,
}

/// Reads `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Builds `{base}/channels/inverse/{logo_id}@2x.png`.
#[must_use]
pub fn logo_url(image_base_url: &str, logo_id: &str) -> String {
    format!(
        "{}/channels/inverse/{}@2x.png",
        image_base_url.trim_end_matches('/'),
        logo_id
    )
}

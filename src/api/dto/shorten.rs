//! DTOs for the shorten endpoint.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{ShortenStatus, Shortened};

/// Query parameters of `POST /api/shorten`.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenParams {
    /// The URL to shorten, stored exactly as given.
    #[serde(rename = "longUrl")]
    #[validate(
        required(message = "Parameter 'longUrl' not specified"),
        length(min = 1, message = "Parameter 'longUrl' not specified")
    )]
    pub long_url: Option<String>,
}

/// Response of `POST /api/shorten`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub status: ShortenStatus,
    /// Base-62 short code.
    pub id: String,
}

impl From<Shortened> for ShortenResponse {
    fn from(shortened: Shortened) -> Self {
        Self {
            status: shortened.status,
            id: shortened.record.code(),
        }
    }
}

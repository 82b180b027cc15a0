//! Stateless HTTP request builder and response parser for the amphibians API.
//!
//! # Design
//! `AmphibiansClient` holds only a `base_url`. The one operation the API
//! offers is split into `build_list_amphibians`, which produces an
//! `HttpRequest`, and `parse_list_amphibians`, which consumes an
//! `HttpResponse`. Whoever sits between the two does the actual I/O.

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::Amphibian;

/// Fixed resource path of the amphibian list.
pub const AMPHIBIANS_PATH: &str = "/amphibians";

/// Synchronous, stateless client for the amphibians API.
#[derive(Debug, Clone)]
pub struct AmphibiansClient {
    base_url: String,
}

impl AmphibiansClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_amphibians(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}{AMPHIBIANS_PATH}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
            body: None,
        }
    }

    /// Parse the list response. Element order is kept exactly as sent.
    pub fn parse_list_amphibians(&self, response: HttpResponse) -> Result<Vec<Amphibian>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// Any 2xx carries a body worth parsing; everything else is an `HttpError`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

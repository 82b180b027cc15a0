//! Domain DTO for the amphibians API.
//!
//! # Design
//! `Amphibian` mirrors the server's JSON object but is defined independently
//! of the mock-server crate; integration tests catch schema drift. The record
//! has no identifier, so the order of the server's array is the only ordering
//! and every layer above passes the `Vec` through untouched.

use serde::{Deserialize, Serialize};

/// One amphibian as returned by `GET /amphibians`.
///
/// `type` is a keyword in Rust, so the field is `kind` here and renamed on
/// the wire. The image reference keeps the server's `img_src` name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Amphibian {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub img_src: String,
}

impl Amphibian {
    pub fn new(
        name: impl Into<String>,
        kind: impl Into<String>,
        description: impl Into<String>,
        img_src: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            description: description.into(),
            img_src: img_src.into(),
        }
    }
}

//! Client core for the amphibians service.
//!
//! # Overview
//! Fetches the amphibian list from `GET /amphibians` and exposes it to a
//! presentation layer as a three-state view model: `Loading`, `Success` with
//! the list in server order, or `Error`.
//!
//! # Design
//! - `AmphibiansClient` is sans-IO: it builds the `HttpRequest` and parses the
//!   `HttpResponse`. A `Transport` executes the round-trip in between.
//! - `AmphibiansRepository` is the seam the view model depends on;
//!   `NetworkAmphibiansRepository` composes client and transport.
//! - `AmphibiansViewModel` fetches on construction and on `retry`. Only
//!   connectivity failures become `ViewState::Error`; any other failure is
//!   returned through the fetch handle and the state is left alone.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod repository;
pub mod transport;
pub mod types;
pub mod view_model;

pub use client::AmphibiansClient;
pub use config::ClientConfig;
pub use error::{ApiError, ConfigError, FetchError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use repository::{AmphibiansRepository, NetworkAmphibiansRepository};
pub use transport::{Transport, UreqTransport};
pub use types::Amphibian;
pub use view_model::{AmphibiansViewModel, FetchHandle, ViewState};

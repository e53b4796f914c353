//! Client library for the NOAA Tides and Currents data API.
//!
//! This crate defines:
//! - A validated request builder for the datagetter endpoint
//! - The API's enumerations (products, datums, units, ...)
//! - Typed result rows, plus pass-through access to the raw JSON
//! - Stored defaults for the `noaa` CLI
//!
//! It is used by `noaa-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod request;
pub mod response;
pub mod time_range;

pub use client::{TidesApi, client_from_config, noaa::NoaaClient};
pub use config::Config;
pub use error::TidesError;
pub use model::{
    DataResult, DataRow, Datum, Interval, Metadata, NamedDate, PredictionsResult,
    PredictionsRow, Product, Series, TidesResponse, TimeZone, Unit,
};
pub use request::TidesRequest;
pub use time_range::TimeRange;

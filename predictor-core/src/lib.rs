//! Core library for the `predictor` CLI.
//!
//! This crate defines:
//! - The prediction form and its wire format
//! - The submission controller and its outcome states
//! - Chart derivation and text rendering of results
//! - Configuration handling and the HTTP prediction service
//!
//! It is used by `predictor-cli`, but can also be reused by other front ends.

pub mod chart;
pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod render;
pub mod service;

pub use chart::{ChartDataset, derive_chart};
pub use config::{Config, StaleResponsePolicy};
pub use controller::{RequestOutcome, SubmissionController, SubmissionTicket};
pub use error::PredictError;
pub use model::{Condition, FormField, FormState};
pub use render::{TextOptions, View, render};
pub use service::{PredictionService, service_from_config};

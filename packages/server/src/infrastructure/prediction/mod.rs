//! Sign-language prediction service client.

mod client;

pub use client::{PredictionClient, PredictionError};

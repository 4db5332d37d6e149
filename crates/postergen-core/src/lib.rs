//! Typed client for the poster-generation backend API: template and logo
//! catalogs plus poster generation. Consumed by the postergen CLI.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use crate::client::PosterClient;
pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::models::*;

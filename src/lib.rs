//! Weather-aware outfit advice built on a staged, interruptible runner
//!
//! Two pipelines share one runner design: a forecast followed by advice for
//! a fixed place, and a member lookup followed by coordinates, weather and a
//! recommendation for that member. Presentation code drives them through
//! [`pipelines::Pipelines`] and renders [`view`] projections of their state.

pub mod config;
pub mod error;
pub mod http_client;
pub mod locations;
pub mod logger;
pub mod pipeline;
pub mod pipelines;
pub mod services;
pub mod view;

pub use config::{AppConfig, AppConfigBuilder};
pub use error::{StylecastError, StylecastResult};
pub use pipelines::{Pipelines, RecommendationPipeline, WeatherPipeline};

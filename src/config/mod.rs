//! Configuration module for budget-forecast
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence
//! - Analysis thresholds

pub mod paths;
pub mod settings;

pub use paths::ForecastPaths;
pub use settings::{AnalysisThresholds, Settings};

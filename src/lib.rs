//! budget-forecast - Terminal budget forecasting with interest-bearing bank accounts
//!
//! This library keeps a list of recurring budget items and bank accounts,
//! keeps each account's monthly interest mirrored as an income item, and
//! projects balances month by month.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution and user settings
//! - `error`: Custom error types
//! - `models`: Bank accounts, budget items and forecast points
//! - `storage`: In-memory store persisted through a pluggable backend
//! - `services`: Validation, interest math, synchronization, projection
//! - `reports`: Cash flow, bank performance and spending analyses
//! - `export`: JSON, YAML and CSV export and import
//! - `backup`: Bank backups and restore
//! - `audit`: Audit logging of every change
//!
//! # Example
//!
//! ```rust,ignore
//! use budget_forecast::config::{ForecastPaths, Settings};
//! use budget_forecast::storage::Storage;
//!
//! let paths = ForecastPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(&paths, &settings)?;
//! ```

pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;
pub mod notify;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{ForecastError, ForecastResult};

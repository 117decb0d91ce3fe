//! Service layer for budget-forecast
//!
//! Business logic on top of the storage layer: validation, interest item
//! synchronization, and forecast projection.

pub mod bank;
pub mod budget;
pub mod forecast;
pub mod interest;
pub mod sync;

pub use bank::{BankInput, BankService};
pub use budget::{BudgetInput, BudgetService};
pub use forecast::{project, ForecastOptions, MAX_FORECAST_MONTHS};
pub use interest::monthly_interest;
pub use sync::{SyncReport, SyncSchedule, Synchronizer};

//! Core data models for budget-forecast
//!
//! This module contains the data structures of the forecasting domain:
//! bank accounts, budget items, and projected forecast points.

pub mod bank;
pub mod budget_item;
pub mod forecast;
pub mod ids;

pub use bank::{interest_item_name, BankAccount, InterestType, INTEREST_SUFFIX};
pub use budget_item::{BudgetItem, BudgetType, InterestMetadata, CREATED_BY_BANK_SYSTEM};
pub use forecast::ForecastPoint;
pub use ids::{BankId, BudgetItemId};

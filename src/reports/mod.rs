//! Reports module for budget-forecast
//!
//! Read-only analyses over the entity store: budget cash flow, per-account
//! cash flow and risk, interest performance, spending trends, and the
//! advisory insights built from them.

pub mod bank_insights;
pub mod cash_flow;
pub mod insights;
pub mod spending;

pub use bank_insights::{AllocationAdvice, BankPerformance, RateHolder};
pub use cash_flow::{BankCashFlow, BudgetAnalysis, CashFlowReport, RiskReason};
pub use spending::{ExpenseShare, SpendingTrends};

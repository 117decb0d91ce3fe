//! Budget item model
//!
//! A recurring monthly income or expense entry with an active date range.
//! Items may be linked to a bank account for per-account forecasting, and
//! the synchronizer maintains one auto-generated interest item per account.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::bank::{InterestType, INTEREST_SUFFIX};
use super::ids::{BankId, BudgetItemId};

/// Longest accepted budget item name
pub const MAX_NAME_LEN: usize = 100;

/// Value of `metadata.createdBy` on synchronizer-owned items
pub const CREATED_BY_BANK_SYSTEM: &str = "bank_system";

/// Direction of a budget item's cash flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetType {
    Income,
    Expense,
}

impl BudgetType {
    /// Parse budget type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Some(Self::Income),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Apply this type's sign to a magnitude
    pub fn signed(&self, magnitude: f64) -> f64 {
        match self {
            Self::Income => magnitude.abs(),
            Self::Expense => -magnitude.abs(),
        }
    }
}

impl fmt::Display for BudgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "income"),
            Self::Expense => write!(f, "expense"),
        }
    }
}

/// Bookkeeping attached to auto-generated interest items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterestMetadata {
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Balance the interest figure was computed from
    #[serde(default)]
    pub principal_amount: f64,
    /// Annual rate the interest figure was computed from
    #[serde(default)]
    pub annual_rate: f64,
}

/// A recurring monthly budget entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetItem {
    /// Unique identifier
    pub id: BudgetItemId,

    /// Display name
    pub name: String,

    /// Signed monthly amount (negative = expense)
    pub amount: f64,

    /// Income or expense
    #[serde(rename = "type")]
    pub item_type: BudgetType,

    /// First day the item applies
    pub start_date: NaiveDate,

    /// Last day the item applies (inclusive); open-ended when absent
    #[serde(default)]
    pub end_date: Option<NaiveDate>,

    /// Bank account this item posts to
    #[serde(default)]
    pub linked_bank_id: Option<BankId>,

    /// True for interest items owned by the synchronizer
    #[serde(default)]
    pub is_auto_generated: bool,

    /// Interest mode of the linked bank (auto-generated items only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_type: Option<InterestType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<InterestMetadata>,
}

impl BudgetItem {
    /// Create a user-entered item; `magnitude` is signed according to `item_type`
    pub fn new(
        id: BudgetItemId,
        name: impl Into<String>,
        magnitude: f64,
        item_type: BudgetType,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            amount: item_type.signed(magnitude),
            item_type,
            start_date,
            end_date: None,
            linked_bank_id: None,
            is_auto_generated: false,
            interest_type: None,
            metadata: None,
        }
    }

    /// Set the end date
    pub fn with_end_date(mut self, end_date: NaiveDate) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Link to a bank account
    pub fn linked_to(mut self, bank_id: BankId) -> Self {
        self.linked_bank_id = Some(bank_id);
        self
    }

    /// Whether the item applies on `date` (both bounds inclusive)
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.map_or(true, |end| end >= date)
    }

    /// Unsigned monthly amount
    pub fn magnitude(&self) -> f64 {
        self.amount.abs()
    }

    pub fn is_income(&self) -> bool {
        self.item_type == BudgetType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.item_type == BudgetType::Expense
    }

    /// True when this is a user item linked to `bank_id`
    pub fn is_user_linked_to(&self, bank_id: BankId) -> bool {
        !self.is_auto_generated && self.linked_bank_id == Some(bank_id)
    }

    /// Bank name implied by an interest item name, if it has the suffix
    pub fn implied_bank_name(&self) -> Option<&str> {
        self.name.strip_suffix(INTEREST_SUFFIX)
    }

    /// Check the item's own invariants
    pub fn validate(&self) -> Result<(), BudgetValidationError> {
        if self.name.trim().is_empty() {
            return Err(BudgetValidationError::EmptyName);
        }

        let sign_ok = match self.item_type {
            BudgetType::Income => self.amount >= 0.0,
            BudgetType::Expense => self.amount <= 0.0,
        };
        if !sign_ok {
            return Err(BudgetValidationError::SignMismatch {
                amount: self.amount,
                item_type: self.item_type,
            });
        }

        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(BudgetValidationError::InvertedRange);
            }
        }

        Ok(())
    }
}

impl fmt::Display for BudgetItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {:.2})", self.name, self.item_type, self.magnitude())
    }
}

/// Invariant violations on a stored budget item
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetValidationError {
    EmptyName,
    SignMismatch { amount: f64, item_type: BudgetType },
    InvertedRange,
}

impl fmt::Display for BudgetValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Budget item name cannot be empty"),
            Self::SignMismatch { amount, item_type } => {
                write!(f, "Amount {} does not match type {}", amount, item_type)
            }
            Self::InvertedRange => write!(f, "End date must be after start date"),
        }
    }
}

impl std::error::Error for BudgetValidationError {}

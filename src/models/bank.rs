//! Bank account model
//!
//! Represents a balance-bearing account that earns simple or compound
//! interest.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::BankId;

/// Suffix appended to a bank name to form its interest budget item name
pub const INTEREST_SUFFIX: &str = " Interest";

/// Shortest accepted bank account name
pub const MIN_NAME_LEN: usize = 2;

/// Longest accepted bank account name
pub const MAX_NAME_LEN: usize = 100;

/// How interest accrues on an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InterestType {
    /// `balance * rate / 12` each month
    Simple,
    /// `balance * ((1 + rate)^(1/12) - 1)` each month
    #[default]
    Compound,
}

impl InterestType {
    /// Parse interest type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "simple" => Some(Self::Simple),
            "compound" => Some(Self::Compound),
            _ => None,
        }
    }
}

impl fmt::Display for InterestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Compound => write!(f, "compound"),
        }
    }
}

/// A bank account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    /// Unique identifier
    pub id: BankId,

    /// Account name, unique case-insensitively
    pub name: String,

    /// Current balance
    #[serde(default)]
    pub balance: f64,

    /// Annual interest rate as a decimal (0.045 = 4.5%)
    #[serde(default)]
    pub interest_rate: f64,

    /// Simple or compound interest
    #[serde(default)]
    pub interest_type: InterestType,
}

impl BankAccount {
    /// Create a new bank account
    pub fn new(
        id: BankId,
        name: impl Into<String>,
        balance: f64,
        interest_rate: f64,
        interest_type: InterestType,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
            interest_rate,
            interest_type,
        }
    }

    /// Name of the auto-generated budget item tracking this account's interest
    pub fn interest_item_name(&self) -> String {
        interest_item_name(&self.name)
    }

    /// Check every field, collecting all problems
    pub fn validate(&self) -> Result<(), Vec<BankValidationError>> {
        let mut errors = Vec::new();

        let name_len = self.name.trim().chars().count();
        if name_len < MIN_NAME_LEN {
            errors.push(BankValidationError::NameTooShort);
        } else if name_len > MAX_NAME_LEN {
            errors.push(BankValidationError::NameTooLong(name_len));
        }

        if !self.balance.is_finite() || self.balance < 0.0 {
            errors.push(BankValidationError::NegativeBalance);
        }

        if !self.interest_rate.is_finite() || !(0.0..=1.0).contains(&self.interest_rate) {
            errors.push(BankValidationError::RateOutOfRange);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Interest item name for a given bank name
pub fn interest_item_name(bank_name: &str) -> String {
    format!("{}{}", bank_name, INTEREST_SUFFIX)
}

impl fmt::Display for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}% {})",
            self.name,
            self.interest_rate * 100.0,
            self.interest_type
        )
    }
}

/// Validation errors for bank accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankValidationError {
    NameTooShort,
    NameTooLong(usize),
    NegativeBalance,
    RateOutOfRange,
}

impl fmt::Display for BankValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameTooShort => write!(
                f,
                "Bank name must be at least {} characters long",
                MIN_NAME_LEN
            ),
            Self::NameTooLong(len) => write!(
                f,
                "Bank name too long ({} chars, max {})",
                len, MAX_NAME_LEN
            ),
            Self::NegativeBalance => write!(f, "Balance must be a positive number"),
            Self::RateOutOfRange => write!(f, "Interest rate must be between 0 and 100%"),
        }
    }
}

impl std::error::Error for BankValidationError {}

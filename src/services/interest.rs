//! Monthly interest calculation

use crate::models::{BankAccount, InterestType};

/// Monthly interest earned on `balance` at `annual_rate`
///
/// Negative balances earn nothing. Non-finite inputs propagate to the result.
pub fn monthly_interest(balance: f64, annual_rate: f64, mode: InterestType) -> f64 {
    if balance < 0.0 {
        return 0.0;
    }

    match mode {
        InterestType::Simple => balance * annual_rate / 12.0,
        InterestType::Compound => balance * ((1.0 + annual_rate).powf(1.0 / 12.0) - 1.0),
    }
}

/// Monthly interest on an account's current balance
pub fn for_account(bank: &BankAccount) -> f64 {
    monthly_interest(bank.balance, bank.interest_rate, bank.interest_type)
}

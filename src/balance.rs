// ⚖️ Balance Calculator
//
// Credits add, debits subtract, starting from zero. Addition commutes, so the
// order of the input does not matter; only its completeness does.

use crate::entities::Transaction;
use serde::Serialize;

/// Signed sum of `transactions` (expected to be one card's).
pub fn balance<'a, I>(transactions: I) -> f64
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(0.0, |sum, tx| sum + tx.signed_value())
}

/// Credit and debit totals for one card
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BalanceSummary {
    pub total_credits: f64,
    pub total_debits: f64,
    pub transaction_count: usize,
}

impl BalanceSummary {
    pub fn from_transactions<'a, I>(transactions: I) -> Self
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .fold(BalanceSummary::default(), |mut summary, tx| {
                if tx.is_credit() {
                    summary.total_credits += tx.value;
                } else {
                    summary.total_debits += tx.value;
                }
                summary.transaction_count += 1;
                summary
            })
    }

    pub fn balance(&self) -> f64 {
        self.total_credits - self.total_debits
    }

    pub fn is_overdrawn(&self) -> bool {
        self.balance() < 0.0
    }
}

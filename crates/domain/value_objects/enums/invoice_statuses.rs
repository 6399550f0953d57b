use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    Partial,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Unpaid => "unpaid",
            InvoiceStatus::Partial => "partial",
            InvoiceStatus::Paid => "paid",
        }
    }

    pub fn from_str(value: &str) -> Self {
        match value {
            "paid" => InvoiceStatus::Paid,
            "partial" => InvoiceStatus::Partial,
            _ => InvoiceStatus::Unpaid,
        }
    }

    /// Mirrors the `CASE` expression used by the payment UPDATE.
    pub fn derive(amount_due: i64, amount_paid: i64) -> Self {
        if amount_paid >= amount_due {
            InvoiceStatus::Paid
        } else if amount_paid > 0 {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Unpaid
        }
    }
}

impl Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_follows_cumulative_payment() {
        assert_eq!(InvoiceStatus::derive(10_000, 0), InvoiceStatus::Unpaid);
        assert_eq!(InvoiceStatus::derive(10_000, 1), InvoiceStatus::Partial);
        assert_eq!(InvoiceStatus::derive(10_000, 9_999), InvoiceStatus::Partial);
        assert_eq!(InvoiceStatus::derive(10_000, 10_000), InvoiceStatus::Paid);
    }

    #[test]
    fn zero_due_invoice_is_paid() {
        assert_eq!(InvoiceStatus::derive(0, 0), InvoiceStatus::Paid);
    }
}

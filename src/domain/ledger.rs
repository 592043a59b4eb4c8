use super::money::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum AppliedPaymentType {
    Debit,
    Credit,
    Denied,
    Refund,
    Void,
}

/// An append-only ledger entry linking a payment to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedPayment {
    /// Position in the ledger, assigned on append.
    pub sequence: u64,
    pub payment_key: Uuid,
    pub invoice_key: Uuid,
    pub applied_type: AppliedPaymentType,
    pub note: String,
    pub amount: Money,
}

/// Net amount already paid against an invoice.
///
/// Debits add, credits and refunds subtract. Denied and void entries are
/// recorded with zero and do not move the total.
pub fn net_applied(entries: &[AppliedPayment]) -> Money {
    let (paid, returned) = entries.iter().fold(
        (Money::ZERO, Money::ZERO),
        |(paid, returned), entry| match entry.applied_type {
            AppliedPaymentType::Debit => (paid + entry.amount, returned),
            AppliedPaymentType::Credit | AppliedPaymentType::Refund => {
                (paid, returned + entry.amount)
            }
            AppliedPaymentType::Denied | AppliedPaymentType::Void => (paid, returned),
        },
    );
    paid - returned
}

/// Whether the ledger holds a debit for `payment_key`, i.e. the payment was
/// authorized against this invoice.
pub fn has_authorization(entries: &[AppliedPayment], payment_key: Uuid) -> bool {
    entries
        .iter()
        .any(|entry| entry.payment_key == payment_key && entry.applied_type == AppliedPaymentType::Debit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(applied_type: AppliedPaymentType, amount: Money) -> AppliedPayment {
        AppliedPayment {
            sequence: 0,
            payment_key: Uuid::nil(),
            invoice_key: Uuid::nil(),
            applied_type,
            note: String::new(),
            amount,
        }
    }

    #[test]
    fn test_net_applied_empty_ledger() {
        assert_eq!(net_applied(&[]), Money::ZERO);
    }

    #[test]
    fn test_net_applied_mixed_entries() {
        let entries = vec![
            entry(AppliedPaymentType::Debit, Money::ZERO),
            entry(AppliedPaymentType::Debit, Money::new(dec!(60.00))),
            entry(AppliedPaymentType::Denied, Money::ZERO),
            entry(AppliedPaymentType::Credit, Money::new(dec!(10.00))),
        ];
        assert_eq!(net_applied(&entries), Money::new(dec!(50.00)));
    }

    #[test]
    fn test_denied_entry_is_not_an_authorization() {
        let key = Uuid::new_v4();
        let mut denied = entry(AppliedPaymentType::Denied, Money::ZERO);
        denied.payment_key = key;
        assert!(!has_authorization(&[denied.clone()], key));

        let mut debit = entry(AppliedPaymentType::Debit, Money::ZERO);
        debit.payment_key = key;
        assert!(has_authorization(&[denied, debit], key));
    }

    #[test]
    fn test_applied_type_serialization() {
        let json = serde_json::to_string(&AppliedPaymentType::Denied).unwrap();
        assert_eq!(json, "\"denied\"");
    }
}

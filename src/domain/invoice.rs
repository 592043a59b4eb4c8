use super::money::Amount;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A billable total issued by the host order system.
///
/// Read-only to the gateway method. Payments applied against the invoice live
/// in the host ledger and are read through the provider service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub key: Uuid,
    pub number: u32,
    pub customer_key: Option<Uuid>,
    pub total: Amount,
}

impl Invoice {
    /// Issues a new invoice. Fails unless `total` is positive.
    pub fn new(number: u32, customer_key: Option<Uuid>, total: Decimal) -> Result<Self> {
        Ok(Self {
            key: Uuid::new_v4(),
            number,
            customer_key,
            total: Amount::new(total)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaymentError;
    use rust_decimal_macros::dec;

    #[test]
    fn test_invoice_requires_positive_total() {
        assert!(Invoice::new(1, None, dec!(100.00)).is_ok());
        assert!(matches!(
            Invoice::new(2, None, dec!(0)),
            Err(PaymentError::Precondition(_))
        ));
    }

    #[test]
    fn test_invoices_get_distinct_keys() {
        let a = Invoice::new(1, None, dec!(1)).unwrap();
        let b = Invoice::new(1, None, dec!(1)).unwrap();
        assert_ne!(a.key, b.key);
    }
}

use crate::core::error::MarketError;
use crate::models::account::Account;
use crate::stores::record_store::RecordStore;
use std::sync::Arc;
use tracing::{info, warn};

/// Accumulates gifts on the receiving account. Totals only ever grow.
pub struct GiftLedger {
    store: Arc<dyn RecordStore>,
}

impl GiftLedger {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// No payer balance is checked; this is a mock payment
    pub fn send_gift(&self, target: &str, amount: f64) -> Result<Account, MarketError> {
        if !amount.is_finite() || amount <= 0.0 {
            warn!(target = %target, amount = amount, "Rejected gift amount");
            return Err(MarketError::InvalidAmount(amount));
        }

        let account = self.store.update(target, |account| {
            account.gift_total += amount;
            Ok(account.clone())
        })?;

        info!(
            target = %target,
            amount = amount,
            gift_total = account.gift_total,
            "Gift sent"
        );

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::account::GenderCategory;
    use crate::stores::record_store::MemoryRecordStore;

    fn setup() -> (Arc<MemoryRecordStore>, GiftLedger) {
        let store = Arc::new(MemoryRecordStore::new());
        store
            .upsert(Account::new(
                "Rina".to_string(),
                "+880111".to_string(),
                "pw".to_string(),
                GenderCategory::Female,
            ))
            .unwrap();
        let ledger = GiftLedger::new(store.clone());
        (store, ledger)
    }

    #[test]
    fn test_gifts_accumulate() {
        let (store, ledger) = setup();

        assert_eq!(ledger.send_gift("+880111", 10.0).unwrap().gift_total, 10.0);
        assert_eq!(ledger.send_gift("+880111", 5.0).unwrap().gift_total, 15.0);

        let acc = store.find_by_identifier("+880111").unwrap().unwrap();
        assert_eq!(acc.gift_total, 15.0);
    }

    #[test]
    fn test_invalid_amounts_leave_total_unchanged() {
        let (store, ledger) = setup();
        ledger.send_gift("+880111", 10.0).unwrap();

        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                ledger.send_gift("+880111", amount),
                Err(MarketError::InvalidAmount(_))
            ));
        }

        let acc = store.find_by_identifier("+880111").unwrap().unwrap();
        assert_eq!(acc.gift_total, 10.0);
    }

    #[test]
    fn test_gift_to_unknown_account() {
        let (_, ledger) = setup();
        assert!(matches!(
            ledger.send_gift("+880999", 10.0),
            Err(MarketError::NotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_gifts_all_count() {
        let (store, ledger) = setup();
        let ledger = Arc::new(ledger);

        let senders: Vec<_> = (0..8)
            .map(|_| {
                let ledger = Arc::clone(&ledger);
                std::thread::spawn(move || {
                    for _ in 0..500 {
                        ledger.send_gift("+880111", 1.0).unwrap();
                    }
                })
            })
            .collect();
        for sender in senders {
            sender.join().unwrap();
        }

        let acc = store.find_by_identifier("+880111").unwrap().unwrap();
        assert_eq!(acc.gift_total, 4000.0);
    }
}

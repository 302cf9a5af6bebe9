//! Shared, refreshable rate table
//!
//! Calculations take a [`snapshot`](SharedRateTable::snapshot) and run every
//! lookup against it. A refresh swaps the inner `Arc`, so an in-flight
//! calculation keeps seeing the table it started with.

use log::info;
use std::sync::{Arc, PoisonError, RwLock};

use super::RateTable;

#[derive(Debug, Clone, Default)]
pub struct SharedRateTable {
    current: Arc<RwLock<Arc<RateTable>>>,
}

impl SharedRateTable {
    pub fn new(table: RateTable) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(table))),
        }
    }

    /// Consistent view of the table for one calculation
    pub fn snapshot(&self) -> Arc<RateTable> {
        // Writers only swap the Arc, so a poisoned lock still holds a complete table
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&*guard)
    }

    /// Publish a refreshed table to subsequent snapshots
    pub fn replace(&self, table: RateTable) {
        let entries = table.len();
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(table);
        info!("Rate table refreshed ({} entries)", entries);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexName;
    use crate::period::Period;
    use crate::rates::RateLookup;
    use rust_decimal_macros::dec;

    #[test]
    fn test_snapshot_unaffected_by_refresh() {
        let feb = Period::month(2023, 2).unwrap();
        let shared = SharedRateTable::new(RateTable::from_entries([(IndexName::IpcaE, feb, dec!(0.50))]).unwrap());

        let before = shared.snapshot();
        shared.replace(RateTable::from_entries([(IndexName::IpcaE, feb, dec!(0.55))]).unwrap());
        let after = shared.snapshot();

        assert_eq!(before.lookup(IndexName::IpcaE, feb).unwrap().rate, dec!(0.50));
        assert_eq!(after.lookup(IndexName::IpcaE, feb).unwrap().rate, dec!(0.55));
    }

    #[test]
    fn test_clones_share_state() {
        let shared = SharedRateTable::default();
        let other = shared.clone();

        other.replace(
            RateTable::from_entries([(IndexName::Tr, Period::month(2023, 1).unwrap(), dec!(0.17))]).unwrap(),
        );
        assert_eq!(shared.snapshot().len(), 1);
    }
}

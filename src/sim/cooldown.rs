//! Per-pad cooldown expiry table
//!
//! Entries are absolute expiry timestamps. Stale entries are never evicted;
//! once `now` passes them they simply read as ready.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::pads::PadId;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooldownTable {
    expiry: HashMap<PadId, f64>,
}

impl CooldownTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock a pair out until `now + duration`. Both ends share one expiry.
    pub fn start_pair(&mut self, a: &PadId, b: &PadId, now: f64, duration: f64) {
        let until = now + duration;
        self.expiry.insert(a.clone(), until);
        self.expiry.insert(b.clone(), until);
    }

    /// Milliseconds until `pad` is ready again, never negative
    pub fn remaining(&self, pad: &str, now: f64) -> f64 {
        self.expiry
            .get(pad)
            .map_or(0.0, |&until| (until - now).max(0.0))
    }

    pub fn is_ready(&self, pad: &str, now: f64) -> bool {
        self.remaining(pad, now) <= 0.0
    }

    pub fn expiry(&self, pad: &str) -> Option<f64> {
        self.expiry.get(pad).copied()
    }

    pub fn clear(&mut self) {
        self.expiry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_pad_is_ready() {
        let table = CooldownTable::new();
        assert_eq!(table.remaining("A", 1234.0), 0.0);
        assert!(table.is_ready("A", 0.0));
    }

    #[test]
    fn test_pair_shares_expiry() {
        let mut table = CooldownTable::new();
        table.start_pair(&"A".into(), &"B".into(), 1000.0, 5000.0);
        assert_eq!(table.expiry("A"), Some(6000.0));
        assert_eq!(table.expiry("A"), table.expiry("B"));
        assert_eq!(table.remaining("A", 3500.0), 2500.0);
        assert_eq!(table.remaining("B", 3500.0), 2500.0);
    }

    #[test]
    fn test_expired_entry_reads_zero() {
        let mut table = CooldownTable::new();
        table.start_pair(&"A".into(), &"B".into(), 0.0, 5000.0);
        assert_eq!(table.remaining("A", 5000.0), 0.0);
        assert_eq!(table.remaining("A", 9000.0), 0.0);
        assert!(table.is_ready("B", 5000.0));
        // stale entry is still there
        assert_eq!(table.expiry("A"), Some(5000.0));
    }
}

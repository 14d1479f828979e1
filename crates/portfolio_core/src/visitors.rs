//! crates/portfolio_core/src/visitors.rs
//!
//! The site-wide page-view counter, kept as a decimal string under the
//! `visitors` key.

use crate::ports::{KeyValueStore, PortError, PortResult};
use std::sync::Arc;
use tracing::warn;

pub const VISITORS_KEY: &str = "visitors";

pub struct VisitorCounter {
    backend: Arc<dyn KeyValueStore>,
}

impl VisitorCounter {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Nothing stored counts as zero. So does an unparseable value, which the
    /// next `record_visit` overwrites.
    pub fn count(&self) -> PortResult<u64> {
        let Some(raw) = self.backend.get(VISITORS_KEY)? else {
            return Ok(0);
        };
        match raw.trim().parse::<u64>() {
            Ok(count) => Ok(count),
            Err(e) => {
                warn!("Resetting visitor count, stored value {:?}: {}", raw, e);
                Ok(0)
            }
        }
    }

    /// Counts one page view and returns the new total.
    pub fn record_visit(&mut self) -> PortResult<u64> {
        let next = self
            .count()?
            .checked_add(1)
            .ok_or_else(|| PortError::Unexpected("visitor count overflow".to_string()))?;
        self.backend.set(VISITORS_KEY, &next.to_string())?;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[test]
    fn starts_at_zero_and_counts_up() {
        let backend: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let mut counter = VisitorCounter::new(backend.clone());
        assert_eq!(counter.count().unwrap(), 0);
        assert_eq!(counter.record_visit().unwrap(), 1);
        assert_eq!(counter.record_visit().unwrap(), 2);
        assert_eq!(backend.get(VISITORS_KEY).unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn garbage_restarts_the_count() {
        let mut counter =
            VisitorCounter::new(Arc::new(MemoryStore::with_entry(VISITORS_KEY, "lots")));
        assert_eq!(counter.count().unwrap(), 0);
        assert_eq!(counter.record_visit().unwrap(), 1);
    }

    #[test]
    fn existing_count_continues() {
        let mut counter =
            VisitorCounter::new(Arc::new(MemoryStore::with_entry(VISITORS_KEY, "41\n")));
        assert_eq!(counter.record_visit().unwrap(), 42);
    }
}

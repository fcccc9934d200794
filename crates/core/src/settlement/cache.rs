//! Settlement report caching using Moka.
//!
//! Reports are pure functions of their inputs, so they can be memoized on a
//! digest of everything that affects the result: rate table, policy,
//! member order and the settlement-relevant expense fields.

use moka::sync::Cache;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tallyup_shared::config::CacheConfig;

use super::error::SettlementError;
use super::service::SettlementService;
use super::types::SettlementReport;
use crate::expense::{Expense, Member};

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 100;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

const FIELD_SEPARATOR: &[u8] = &[0x1f];
const RECORD_SEPARATOR: &[u8] = &[0x1e];

/// Cache for settlement reports. Thread-safe and cheap to clone.
#[derive(Clone)]
pub struct SettlementCache {
    cache: Cache<String, Arc<SettlementReport>>,
}

impl SettlementCache {
    /// Creates a new cache with default settings (100 entries, 5 minute TTL).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Creates a cache from the cache configuration section.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        Self::with_config(config.max_capacity, config.ttl_secs)
    }

    /// Computes a report, returning a cached copy if one exists.
    ///
    /// Cached copies come back with `cached: true`. Failed computations are
    /// not cached.
    ///
    /// # Errors
    ///
    /// Returns an error if the report cannot be computed.
    pub fn report_cached(
        &self,
        service: &SettlementService,
        expenses: &[Expense],
        members: &[Member],
    ) -> Result<SettlementReport, SettlementError> {
        let key = Self::cache_key(service, expenses, members);

        if let Some(cached) = self.cache.get(&key) {
            let mut report = (*cached).clone();
            report.cached = true;
            return Ok(report);
        }

        let report = service.report(expenses, members)?;
        self.cache.insert(key, Arc::new(report.clone()));
        Ok(report)
    }

    /// Invalidates all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance so counts and invalidations are visible.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }

    /// Hex SHA-256 over every input that can change the report.
    fn cache_key(service: &SettlementService, expenses: &[Expense], members: &[Member]) -> String {
        let mut hasher = Sha256::new();

        hasher.update(service.rates().reference().code());
        for (currency, rate) in service.rates().iter() {
            hasher.update(currency.code());
            hasher.update(FIELD_SEPARATOR);
            hasher.update(rate.normalize().to_string());
            hasher.update(FIELD_SEPARATOR);
        }
        let policy = service.policy();
        hasher.update(policy.tolerance().normalize().to_string());
        hasher.update(FIELD_SEPARATOR);
        hasher.update(policy.decimal_places().to_le_bytes());
        hasher.update(RECORD_SEPARATOR);

        for member in members {
            hasher.update(member.id.as_str());
            hasher.update(FIELD_SEPARATOR);
        }
        hasher.update(RECORD_SEPARATOR);

        for expense in expenses {
            hasher.update(expense.amount.normalize().to_string());
            hasher.update(FIELD_SEPARATOR);
            hasher.update(expense.currency.code());
            hasher.update(FIELD_SEPARATOR);
            hasher.update(expense.paid_by.as_str());
            hasher.update(FIELD_SEPARATOR);
            for member_id in &expense.split_with {
                hasher.update(member_id.as_str());
                hasher.update(FIELD_SEPARATOR);
            }
            hasher.update(RECORD_SEPARATOR);
        }

        format!("{:x}", hasher.finalize())
    }
}

impl Default for SettlementCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tallyup_shared::types::Currency;

    fn members() -> Vec<Member> {
        vec![Member::new("a", "Alice"), Member::new("b", "Bob")]
    }

    fn expenses() -> Vec<Expense> {
        vec![Expense::new("a", dec!(40), Currency::Usd)]
    }

    #[test]
    fn test_cache_miss_then_hit() {
        let cache = SettlementCache::new();
        let service = SettlementService::default();

        let first = cache.report_cached(&service, &expenses(), &members()).unwrap();
        assert!(!first.cached, "First call should not be cached");

        let second = cache.report_cached(&service, &expenses(), &members()).unwrap();
        assert!(second.cached, "Second call should be cached");
        assert_eq!(first.settlements, second.settlements);
        assert_eq!(first.balances, second.balances);
    }

    #[test]
    fn test_descriptive_fields_do_not_affect_key() {
        let cache = SettlementCache::new();
        let service = SettlementService::default();

        let _ = cache.report_cached(&service, &expenses(), &members()).unwrap();
        let renamed: Vec<Expense> = expenses()
            .into_iter()
            .map(|e| e.with_description("Groceries").with_category("Food"))
            .collect();
        let report = cache.report_cached(&service, &renamed, &members()).unwrap();
        assert!(report.cached);
    }

    #[test]
    fn test_different_inputs_not_cached() {
        let cache = SettlementCache::new();
        let service = SettlementService::default();

        let _ = cache.report_cached(&service, &expenses(), &members()).unwrap();
        let other = vec![Expense::new("b", dec!(40), Currency::Usd)];
        let report = cache.report_cached(&service, &other, &members()).unwrap();
        assert!(!report.cached, "Different expenses should not hit cache");

        let reordered = vec![Member::new("b", "Bob"), Member::new("a", "Alice")];
        let report = cache.report_cached(&service, &expenses(), &reordered).unwrap();
        assert!(!report.cached, "Member order is part of the key");
    }

    #[test]
    fn test_different_rates_not_cached() {
        let cache = SettlementCache::new();
        let standard = SettlementService::default();
        let custom = SettlementService::new(
            crate::currency::RateTable::new(Currency::Usd, [(Currency::Usd, dec!(1))]).unwrap(),
            super::super::SettlementPolicy::default(),
        );

        let _ = cache.report_cached(&standard, &expenses(), &members()).unwrap();
        let report = cache.report_cached(&custom, &expenses(), &members()).unwrap();
        assert!(!report.cached);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache = SettlementCache::new();
        let service = SettlementService::new(
            crate::currency::RateTable::new(Currency::Usd, [(Currency::Usd, dec!(1))]).unwrap(),
            super::super::SettlementPolicy::default(),
        );
        let foreign = vec![Expense::new("a", dec!(40), Currency::Eur)];

        assert!(cache.report_cached(&service, &foreign, &members()).is_err());
        cache.run_pending_tasks();
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_invalidate_all() {
        let cache = SettlementCache::from_config(&CacheConfig::default());
        let service = SettlementService::default();

        let _ = cache.report_cached(&service, &expenses(), &members()).unwrap();
        cache.invalidate_all();
        cache.run_pending_tasks();

        let report = cache.report_cached(&service, &expenses(), &members()).unwrap();
        assert!(!report.cached, "Should be cache miss after invalidate_all");
    }

    #[test]
    fn test_entry_count() {
        let cache = SettlementCache::default();
        assert_eq!(cache.entry_count(), 0);

        let _ = cache.report_cached(&SettlementService::default(), &expenses(), &members());
        cache.run_pending_tasks();
        assert!(cache.entry_count() >= 1);
    }
}

//! Memoisation of analysis runs and last-writer-wins publication.
//!
//! [`AnalysisCache`] returns the same [`Arc`] for repeated runs over an
//! identical garden snapshot. [`LatestAnalysis`] lets overlapping runs race
//! while only the most recently started one can be observed.

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    num::NonZeroUsize,
    sync::{
        Arc, Mutex, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use lru::LruCache;
use tracing::{debug, trace};

use crate::{
    Result,
    analyzer::{Analyzer, NetworkAnalysis},
    garden::Garden,
    species::SpeciesKind,
};

/// Default number of analyses retained by [`AnalysisCache`].
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(32) {
    Some(capacity) => capacity,
    None => unreachable!(),
};

/// Order-sensitive 64-bit digest of every field of a garden list.
///
/// Two lists with the same gardens in a different order have different
/// fingerprints, matching the order-dependence of edge and zone output.
/// Distinct lists can collide; callers accept that risk in exchange for a
/// fixed-size key.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct GardenSetFingerprint(u64);

impl GardenSetFingerprint {
    /// Hashes `gardens`.
    ///
    /// # Examples
    /// ```
    /// use corridor_core::{Garden, GardenSetFingerprint};
    ///
    /// let a = vec![Garden::new("a", 40.0, -111.0, 1.0, "")?];
    /// let b = vec![Garden::new("a", 40.0, -111.0, 2.0, "")?];
    /// assert_eq!(GardenSetFingerprint::of(&a), GardenSetFingerprint::of(&a.clone()));
    /// assert_ne!(GardenSetFingerprint::of(&a), GardenSetFingerprint::of(&b));
    /// # Ok::<(), corridor_core::GardenError>(())
    /// ```
    #[must_use]
    pub fn of(gardens: &[Garden]) -> Self {
        let mut hasher = DefaultHasher::new();
        gardens.len().hash(&mut hasher);
        for garden in gardens {
            garden.id().hash(&mut hasher);
            garden.coordinates().latitude().to_bits().hash(&mut hasher);
            garden.coordinates().longitude().to_bits().hash(&mut hasher);
            garden.quality_score().to_bits().hash(&mut hasher);
            garden.tier().hash(&mut hasher);
        }
        Self(hasher.finish())
    }

    /// Returns the raw digest.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
struct CacheKey {
    fingerprint: GardenSetFingerprint,
    gardens: usize,
    species: SpeciesKind,
}

/// LRU cache of analysis results for one [`Analyzer`].
///
/// The cache owns its analyzer so cached results can never mix
/// configurations.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use corridor_core::{AnalysisCache, AnalyzerBuilder, Garden, SpeciesKind};
///
/// let cache = AnalysisCache::new(AnalyzerBuilder::new().build()?);
/// let gardens = vec![Garden::new("a", 40.0, -111.0, 10.0, "")?];
/// let first = cache.get_or_run(&gardens, SpeciesKind::Bee)?;
/// let second = cache.get_or_run(&gardens, SpeciesKind::Bee)?;
/// assert!(Arc::ptr_eq(&first, &second));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct AnalysisCache {
    analyzer: Analyzer,
    entries: Mutex<LruCache<CacheKey, Arc<NetworkAnalysis>>>,
}

impl AnalysisCache {
    /// Builds a cache holding up to [`DEFAULT_CACHE_CAPACITY`] analyses.
    #[must_use]
    pub fn new(analyzer: Analyzer) -> Self {
        Self::with_capacity(analyzer, DEFAULT_CACHE_CAPACITY)
    }

    /// Builds a cache holding up to `capacity` analyses.
    #[must_use]
    pub fn with_capacity(analyzer: Analyzer, capacity: NonZeroUsize) -> Self {
        Self {
            analyzer,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns the analyzer used on cache misses.
    #[must_use]
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Returns the number of cached analyses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Reports whether nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the cached analysis for `gardens` and `species`, running the
    /// analyzer on a miss.
    ///
    /// The lock is not held while the analyzer runs. When two callers miss
    /// on the same key concurrently, both compute and the first insertion
    /// wins, so every caller still observes one shared [`Arc`].
    ///
    /// # Errors
    /// Propagates [`crate::AnalysisError`] from [`Analyzer::run`]. Failed
    /// runs are not cached.
    pub fn get_or_run(
        &self,
        gardens: &[Garden],
        species: SpeciesKind,
    ) -> Result<Arc<NetworkAnalysis>> {
        let key = CacheKey {
            fingerprint: GardenSetFingerprint::of(gardens),
            gardens: gardens.len(),
            species,
        };
        if let Some(hit) = self.lock().get(&key) {
            trace!(species = %species, "analysis cache hit");
            record_hit();
            return Ok(Arc::clone(hit));
        }
        record_miss();

        let fresh = Arc::new(self.analyzer.run(gardens, species)?);
        let mut entries = self.lock();
        if let Some(raced) = entries.get(&key) {
            return Ok(Arc::clone(raced));
        }
        if let Some((evicted, _)) = entries.push(key, Arc::clone(&fresh)) {
            debug!(species = %evicted.species, "analysis cache evicted entry");
            record_eviction();
        }
        Ok(fresh)
    }

    /// Drops every cached analysis.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LruCache<CacheKey, Arc<NetworkAnalysis>>> {
        // Entries are only ever replaced whole, so a poisoned map is still
        // consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(feature = "metrics")]
fn record_hit() {
    metrics::counter!("corridor_analysis_cache_hits").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_hit() {}

#[cfg(feature = "metrics")]
fn record_miss() {
    metrics::counter!("corridor_analysis_cache_misses").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_miss() {}

#[cfg(feature = "metrics")]
fn record_eviction() {
    metrics::counter!("corridor_analysis_cache_evictions").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_eviction() {}

/// Generation stamp issued by [`LatestAnalysis::begin`].
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub struct AnalysisTicket(u64);

impl AnalysisTicket {
    /// Returns the generation number of this ticket.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

/// Single slot holding the result of the most recently started run.
///
/// # Examples
/// ```
/// use corridor_core::{AnalyzerBuilder, LatestAnalysis, SpeciesKind};
///
/// let analyzer = AnalyzerBuilder::new().build()?;
/// let latest = LatestAnalysis::default();
/// let slow = latest.begin();
/// let fast = latest.begin();
/// assert!(latest.publish(fast, analyzer.run(&[], SpeciesKind::Bee)?));
/// assert!(!latest.publish(slow, analyzer.run(&[], SpeciesKind::All)?));
/// assert_eq!(latest.current().map(|a| a.species()), Some(SpeciesKind::Bee));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Default)]
pub struct LatestAnalysis {
    issued: AtomicU64,
    slot: Mutex<Option<(AnalysisTicket, Arc<NetworkAnalysis>)>>,
}

impl LatestAnalysis {
    /// Issues a ticket newer than every ticket issued before it.
    ///
    /// Issuing a ticket supersedes every run still holding an older one.
    pub fn begin(&self) -> AnalysisTicket {
        AnalysisTicket(self.issued.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Stores `analysis` only if `ticket` is the most recently issued one.
    ///
    /// A run whose input was superseded by a later [`Self::begin`] is
    /// discarded even when it finishes first. Returns whether the result was
    /// accepted.
    pub fn publish(
        &self,
        ticket: AnalysisTicket,
        analysis: impl Into<Arc<NetworkAnalysis>>,
    ) -> bool {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        let newest = self.issued.load(Ordering::Acquire);
        if ticket.generation() != newest {
            debug!(
                stale = ticket.generation(),
                newest, "discarding analysis superseded by a newer run"
            );
            return false;
        }
        *slot = Some((ticket, analysis.into()));
        true
    }

    /// Returns the most recently accepted analysis.
    #[must_use]
    pub fn current(&self) -> Option<Arc<NetworkAnalysis>> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|(_, analysis)| Arc::clone(analysis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::{fixture, rstest};

    use crate::builder::AnalyzerBuilder;

    #[fixture]
    fn analyzer() -> Analyzer {
        AnalyzerBuilder::new().build().expect("default configuration is valid")
    }

    fn gardens(offset: f64) -> Vec<Garden> {
        vec![
            Garden::new("a", 40.0 + offset, -111.0, 50.0, "").expect("valid"),
            Garden::new("b", 40.001 + offset, -111.0, 50.0, "").expect("valid"),
        ]
    }

    #[rstest]
    fn identical_input_shares_one_arc(analyzer: Analyzer) {
        let cache = AnalysisCache::new(analyzer);
        let first = cache.get_or_run(&gardens(0.0), SpeciesKind::All).expect("run");
        let second = cache.get_or_run(&gardens(0.0), SpeciesKind::All).expect("run");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);

        let other_species = cache.get_or_run(&gardens(0.0), SpeciesKind::Bee).expect("run");
        assert!(!Arc::ptr_eq(&first, &other_species));
        assert_eq!(cache.len(), 2);
    }

    #[rstest]
    fn least_recently_used_entry_is_evicted(analyzer: Analyzer) {
        let capacity = NonZeroUsize::new(2).expect("non-zero");
        let cache = AnalysisCache::with_capacity(analyzer, capacity);
        let first = cache.get_or_run(&gardens(0.0), SpeciesKind::All).expect("run");
        cache.get_or_run(&gardens(1.0), SpeciesKind::All).expect("run");
        cache.get_or_run(&gardens(2.0), SpeciesKind::All).expect("run");
        assert_eq!(cache.len(), 2);
        let rerun = cache.get_or_run(&gardens(0.0), SpeciesKind::All).expect("run");
        assert!(!Arc::ptr_eq(&first, &rerun));
        assert_eq!(*first, *rerun);
    }

    #[rstest]
    fn failed_runs_are_not_cached(analyzer: Analyzer) {
        let cache = AnalysisCache::new(analyzer);
        let mut duplicate = gardens(0.0);
        duplicate.push(duplicate[0].clone());
        assert!(cache.get_or_run(&duplicate, SpeciesKind::All).is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn fingerprint_is_order_sensitive() {
        let forward = gardens(0.0);
        let reversed: Vec<Garden> = forward.iter().rev().cloned().collect();
        assert_ne!(
            GardenSetFingerprint::of(&forward),
            GardenSetFingerprint::of(&reversed)
        );
    }

    #[rstest]
    fn stale_ticket_is_rejected(analyzer: Analyzer) {
        let latest = LatestAnalysis::default();
        let older = latest.begin();
        let newer = latest.begin();
        assert!(newer > older);
        let result = analyzer.run(&gardens(0.0), SpeciesKind::All).expect("run");
        assert!(latest.publish(newer, result.clone()));
        assert!(!latest.publish(older, result));
        assert_eq!(latest.current().map(|a| a.edges().len()), Some(1));
    }

    #[rstest]
    fn superseded_run_is_discarded_before_newer_finishes(analyzer: Analyzer) {
        let latest = LatestAnalysis::default();
        let older = latest.begin();
        let newer = latest.begin();
        let empty = analyzer.run(&[], SpeciesKind::All).expect("run");
        assert!(!latest.publish(older, empty.clone()));
        assert!(latest.current().is_none());
        assert!(latest.publish(newer, empty));
        assert_eq!(latest.current().map(|a| a.species()), Some(SpeciesKind::All));
    }

    #[rstest]
    fn latest_ticket_may_republish(analyzer: Analyzer) {
        let latest = LatestAnalysis::default();
        let ticket = latest.begin();
        let bee = analyzer.run(&[], SpeciesKind::Bee).expect("run");
        let moth = analyzer.run(&[], SpeciesKind::Moth).expect("run");
        assert!(latest.publish(ticket, bee));
        assert!(latest.publish(ticket, moth));
        assert_eq!(latest.current().map(|a| a.species()), Some(SpeciesKind::Moth));
    }
}

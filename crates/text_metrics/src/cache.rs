//! Bounded measurement cache
//!
//! Wraps any `TextMeasurer` with an LRU cache keyed by the full
//! measurement input. Cache correctness only affects cost, never output:
//! clearing it at any time (e.g. after font assets finish loading in the
//! host) is always safe.

use crate::{FontSpec, RenderTarget, TextMeasurer, TextMetrics};
use std::collections::{HashMap, VecDeque};

/// Default cache capacity
pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

/// Cache key: the complete measurement input
///
/// Float fields are stored fixed-point (hundredths of a pixel) so the key
/// can be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct MeasureKey {
    text: String,
    family: String,
    size_centi: u32,
    weight: crate::FontWeight,
    spacing_centi: i32,
    target: RenderTarget,
}

impl MeasureKey {
    fn new(text: &str, font: &FontSpec, target: RenderTarget) -> Self {
        Self {
            text: text.to_string(),
            family: font.family.clone(),
            size_centi: (font.size * 100.0) as u32,
            weight: font.weight,
            spacing_centi: (font.letter_spacing * 100.0) as i32,
            target,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl CacheStats {
    /// Hit ratio in [0, 1]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A `TextMeasurer` with a bounded LRU measurement cache
#[derive(Debug)]
pub struct CachedMeasurer<M> {
    inner: M,
    entries: HashMap<MeasureKey, TextMetrics>,
    lru: VecDeque<MeasureKey>,
    capacity: usize,
    stats: CacheStats,
}

impl<M: TextMeasurer> CachedMeasurer<M> {
    /// Wrap a measurer with the default cache capacity
    pub fn new(inner: M) -> Self {
        Self::with_capacity(inner, DEFAULT_CACHE_CAPACITY)
    }

    /// Wrap a measurer with a custom cache capacity
    pub fn with_capacity(inner: M, capacity: usize) -> Self {
        Self {
            inner,
            entries: HashMap::new(),
            lru: VecDeque::new(),
            capacity: capacity.max(1),
            stats: CacheStats::default(),
        }
    }

    /// Measure, hitting the cache when possible
    pub fn measure(&mut self, text: &str, font: &FontSpec, target: RenderTarget) -> TextMetrics {
        let key = MeasureKey::new(text, font, target);
        if let Some(&metrics) = self.entries.get(&key) {
            self.stats.hits += 1;
            self.touch(&key);
            return metrics;
        }

        self.stats.misses += 1;
        let metrics = self.inner.measure(text, font, target);
        self.entries.insert(key.clone(), metrics);
        self.lru.push_front(key);
        self.evict_over_capacity();
        metrics
    }

    /// Measure width only
    pub fn measure_width(&mut self, text: &str, font: &FontSpec, target: RenderTarget) -> f64 {
        self.measure(text, font, target).width
    }

    /// Measure a batch of strings under one font spec
    pub fn measure_batch(
        &mut self,
        texts: &[&str],
        font: &FontSpec,
        target: RenderTarget,
    ) -> Vec<TextMetrics> {
        texts.iter().map(|t| self.measure(t, font, target)).collect()
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drop all cached entries and reset statistics to zero
    pub fn clear(&mut self) {
        self.entries.clear();
        self.lru.clear();
        self.stats = CacheStats::default();
    }

    /// Move a key to the front of the LRU queue (most recently used)
    fn touch(&mut self, key: &MeasureKey) {
        self.lru.retain(|k| k != key);
        self.lru.push_front(key.clone());
    }

    fn evict_over_capacity(&mut self) {
        while self.entries.len() > self.capacity {
            if let Some(oldest) = self.lru.pop_back() {
                self.entries.remove(&oldest);
                self.stats.evictions += 1;
            } else {
                break;
            }
        }
    }
}

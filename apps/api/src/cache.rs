//! Analysis result cache — fingerprinted, bounded, TTL-evicting.
//!
//! Gap analysis is the most expensive call in the service, so identical
//! (candidate, job, resume, jd) tuples must hit the model at most once.
//! The cache sits behind a trait so a multi-instance deployment can swap in
//! a shared backend without touching the engine.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};

use crate::analysis::gap::AnalysisResult;
use crate::sanitize::bounded_prefix;

/// Bump to invalidate every cached analysis after a prompt or schema change.
/// Old entries die by construction — no explicit flush needed.
pub const SCHEMA_VERSION: &str = "v8";

/// Input text beyond this prefix does not participate in the fingerprint.
const FINGERPRINT_TEXT_PREFIX: usize = 2000;

const DEFAULT_CAPACITY: usize = 1024;
const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Deterministic cache key over the analysis inputs.
///
/// Identical inputs (including the version tag) always produce the same key;
/// the job id keeps near-identical postings from colliding.
pub fn fingerprint(candidate_id: &str, job_id: &str, resume_text: &str, job_text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(candidate_id.as_bytes());
    hasher.update(b"||");
    hasher.update(job_id.as_bytes());
    hasher.update(b"||");
    hasher.update(bounded_prefix(resume_text, FINGERPRINT_TEXT_PREFIX).as_bytes());
    hasher.update(b"||");
    hasher.update(bounded_prefix(job_text, FINGERPRINT_TEXT_PREFIX).as_bytes());
    hasher.update(b"||");
    hasher.update(SCHEMA_VERSION.as_bytes());
    hex::encode(hasher.finalize())
}

/// Storage seam for analysis results. `get` on a present, unexpired key must
/// return a value equivalent to what `put` stored.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &str) -> Option<AnalysisResult>;
    fn put(&self, key: String, value: AnalysisResult);
}

struct CacheEntry {
    value: AnalysisResult,
    inserted_at: Instant,
}

struct CacheInner {
    map: HashMap<String, CacheEntry>,
    /// Recency order, least-recent at the front. May briefly hold keys the
    /// map already dropped; eviction skips those.
    order: VecDeque<String>,
}

/// In-process cache: capacity-bounded LRU with a per-entry TTL.
///
/// A single mutex guards the whole structure. Contention is negligible next
/// to the multi-second LLM round trip this cache exists to avoid.
pub struct InMemoryResultCache {
    capacity: usize,
    ttl: Duration,
    inner: Mutex<CacheInner>,
}

impl InMemoryResultCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            capacity: capacity.max(1),
            ttl,
            inner: Mutex::new(CacheInner {
                map: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.inner.lock().expect("cache lock poisoned").map.len()
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &str) -> Option<AnalysisResult> {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        let expired = match inner.map.get(key) {
            Some(entry) => entry.inserted_at.elapsed() >= self.ttl,
            None => return None,
        };
        if expired {
            inner.map.remove(key);
            inner.order.retain(|k| k != key);
            return None;
        }

        // Touch for LRU ordering.
        inner.order.retain(|k| k != key);
        inner.order.push_back(key.to_string());
        inner.map.get(key).map(|entry| entry.value.clone())
    }

    fn put(&self, key: String, value: AnalysisResult) {
        let mut inner = self.inner.lock().expect("cache lock poisoned");

        if inner.map.contains_key(&key) {
            inner.order.retain(|k| k != &key);
        } else {
            while inner.map.len() >= self.capacity {
                match inner.order.pop_front() {
                    Some(oldest) => {
                        inner.map.remove(&oldest);
                    }
                    None => break,
                }
            }
        }

        inner.order.push_back(key.clone());
        inner.map.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample_result(score: i64) -> AnalysisResult {
        AnalysisResult {
            score,
            matched_skills: vec!["Python".to_string()],
            missing_skills: vec!["Kubernetes".to_string()],
            defense_strategies: BTreeMap::from([(
                "Kubernetes".to_string(),
                "I have adjacent container experience.".to_string(),
            )]),
            coach_message: "Solid match.".to_string(),
        }
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let a = fingerprint("42", "j7", "resume text", "job text");
        let b = fingerprint("42", "j7", "resume text", "job text");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_differs_per_field() {
        let base = fingerprint("42", "j7", "resume", "jd");
        assert_ne!(base, fingerprint("43", "j7", "resume", "jd"));
        assert_ne!(base, fingerprint("42", "j8", "resume", "jd"));
        assert_ne!(base, fingerprint("42", "j7", "resume!", "jd"));
        assert_ne!(base, fingerprint("42", "j7", "resume", "jd!"));
    }

    #[test]
    fn test_fingerprint_ignores_text_beyond_prefix() {
        let long_a = format!("{}{}", "x".repeat(FINGERPRINT_TEXT_PREFIX), "tail one");
        let long_b = format!("{}{}", "x".repeat(FINGERPRINT_TEXT_PREFIX), "other tail");
        assert_eq!(
            fingerprint("1", "1", &long_a, "jd"),
            fingerprint("1", "1", &long_b, "jd")
        );
    }

    #[test]
    fn test_get_returns_what_put_stored() {
        let cache = InMemoryResultCache::new(8, Duration::from_secs(60));
        cache.put("k1".to_string(), sample_result(72));
        assert_eq!(cache.get("k1"), Some(sample_result(72)));
    }

    #[test]
    fn test_miss_on_absent_key() {
        let cache = InMemoryResultCache::new(8, Duration::from_secs(60));
        assert_eq!(cache.get("nope"), None);
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = InMemoryResultCache::new(2, Duration::from_secs(60));
        cache.put("a".to_string(), sample_result(1));
        cache.put("b".to_string(), sample_result(2));
        // Touch "a" so "b" becomes the eviction candidate.
        assert!(cache.get("a").is_some());
        cache.put("c".to_string(), sample_result(3));

        assert!(cache.get("a").is_some());
        assert!(cache.get("b").is_none());
        assert!(cache.get("c").is_some());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_overwrite_does_not_grow_cache() {
        let cache = InMemoryResultCache::new(2, Duration::from_secs(60));
        cache.put("a".to_string(), sample_result(1));
        cache.put("a".to_string(), sample_result(9));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a").map(|r| r.score), Some(9));
    }

    #[test]
    fn test_ttl_expiry_removes_entry() {
        let cache = InMemoryResultCache::new(8, Duration::from_millis(0));
        cache.put("a".to_string(), sample_result(1));
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_concurrent_access_does_not_corrupt() {
        use std::sync::Arc;
        let cache = Arc::new(InMemoryResultCache::new(64, Duration::from_secs(60)));
        let mut handles = Vec::new();
        for t in 0..8 {
            let cache = Arc::clone(&cache);
            handles.push(std::thread::spawn(move || {
                for i in 0..100 {
                    let key = format!("k{}", (t * 100 + i) % 32);
                    cache.put(key.clone(), sample_result(i));
                    let _ = cache.get(&key);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
        assert!(cache.len() <= 64);
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-map memoisation of digested topology.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHasher};
use vtt_fog_region::Region;

use crate::config::VisionConfig;
use crate::digest::DigestedTopology;
use crate::error::Result;

/// Digests keyed by a fingerprint of the topology they were built from.
///
/// Owned by a single map. Call [`TopologyCache::invalidate`] when the map's
/// walls are edited.
#[derive(Debug, Default)]
pub struct TopologyCache {
    config: VisionConfig,
    entries: Mutex<FxHashMap<u64, Arc<DigestedTopology>>>,
}

impl TopologyCache {
    pub fn new(config: VisionConfig) -> Self {
        Self {
            config,
            entries: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    /// Fingerprint of a topology's exact coordinates.
    ///
    /// Uses FxHasher for speed - we don't need cryptographic hashing
    pub fn fingerprint(topology: &Region) -> u64 {
        let mut hasher = FxHasher::default();

        topology.shape_count().hash(&mut hasher);
        for contour in topology.contours() {
            contour.len().hash(&mut hasher);
            for point in contour {
                point[0].to_bits().hash(&mut hasher);
                point[1].to_bits().hash(&mut hasher);
            }
        }

        hasher.finish()
    }

    /// Return the cached digest of `topology`, building it on a miss.
    ///
    /// The digest runs outside the lock; two threads missing at once both
    /// build it and the later insert wins.
    pub fn get_or_digest(&self, topology: &Region) -> Result<Arc<DigestedTopology>> {
        let key = Self::fingerprint(topology);

        {
            let entries = self.entries.lock();
            if let Some(cached) = entries.get(&key) {
                if cached.topology() == topology {
                    tracing::trace!(key, "Topology cache hit");
                    return Ok(Arc::clone(cached));
                }
            }
        }

        let digest = Arc::new(DigestedTopology::digest(topology, &self.config)?);
        tracing::debug!(key, regions = digest.len(), "Topology cache miss, digested");

        self.entries.lock().insert(key, Arc::clone(&digest));
        Ok(digest)
    }

    /// Drop the entry for one topology, if cached
    pub fn remove(&self, topology: &Region) -> bool {
        let key = Self::fingerprint(topology);
        self.entries.lock().remove(&key).is_some()
    }

    /// Drop every cached digest
    pub fn invalidate(&self) {
        let mut entries = self.entries.lock();
        tracing::debug!(entries = entries.len(), "Invalidating topology cache");
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_returns_same_digest() {
        let cache = TopologyCache::new(VisionConfig::default());
        let walls = Region::rectangle(0.0, 0.0, 4.0, 1.0);

        let first = cache.get_or_digest(&walls).unwrap();
        let second = cache.get_or_digest(&walls.clone()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_edit_and_invalidate() {
        let cache = TopologyCache::new(VisionConfig::default());
        let before = Region::rectangle(0.0, 0.0, 4.0, 1.0);
        let after = before.union(&Region::rectangle(10.0, 0.0, 1.0, 1.0));

        assert_ne!(TopologyCache::fingerprint(&before), TopologyCache::fingerprint(&after));

        cache.get_or_digest(&before).unwrap();
        let edited = cache.get_or_digest(&after).unwrap();
        assert_eq!(edited.len(), 2);
        assert_eq!(cache.len(), 2);

        assert!(cache.remove(&before));
        assert!(!cache.remove(&before));

        cache.invalidate();
        assert!(cache.is_empty());
    }
}

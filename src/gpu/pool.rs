use std::collections::HashMap;

use crate::foundation::error::BitmapResult;
use crate::surface::Surface;

/// Retention limits for released texture storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TexturePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained textures per `(w, h)` bucket.
    pub max_per_bucket: usize,
}

impl Default for TexturePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 64 * 1024 * 1024,
            max_per_bucket: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct PoolKey {
    w: u32,
    h: u32,
}

impl PoolKey {
    fn byte_len(self) -> usize {
        (self.w as usize)
            .saturating_mul(self.h as usize)
            .saturating_mul(4)
    }
}

/// Counters describing pool behaviour.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TexturePoolStats {
    /// Storages currently parked in buckets.
    pub retained: usize,
    /// Bytes currently parked in buckets.
    pub retained_bytes: usize,
    /// Fresh allocations.
    pub allocated: u64,
    /// Requests served from a bucket.
    pub reused: u64,
    /// Releases that were dropped because a limit was hit.
    pub dropped_on_release: u64,
}

/// Bounded retained storage for texture backings, keyed by size.
pub(crate) struct TexturePool {
    opts: TexturePoolOpts,
    stats: TexturePoolStats,
    buckets: HashMap<PoolKey, Vec<Surface>>,
}

impl TexturePool {
    pub(crate) fn new(opts: TexturePoolOpts) -> Self {
        Self {
            opts,
            stats: TexturePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    pub(crate) fn stats(&self) -> TexturePoolStats {
        self.stats.clone()
    }

    /// Hand out a cleared surface, reusing retained storage of the same size when possible.
    pub(crate) fn take(&mut self, w: u32, h: u32) -> BitmapResult<Surface> {
        let key = PoolKey { w, h };
        if let Some(bucket) = self.buckets.get_mut(&key)
            && let Some(mut s) = bucket.pop()
        {
            self.stats.retained = self.stats.retained.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            self.stats.reused = self.stats.reused.saturating_add(1);
            s.clear();
            return Ok(s);
        }
        let s = Surface::new(w, h)?;
        self.stats.allocated = self.stats.allocated.saturating_add(1);
        Ok(s)
    }

    /// Park `surface` for reuse, or drop it when a limit is reached.
    pub(crate) fn give_back(&mut self, surface: Surface) {
        let key = PoolKey {
            w: surface.width(),
            h: surface.height(),
        };
        let bytes = key.byte_len();
        if self.opts.max_per_bucket == 0
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        bucket.push(surface);
        self.stats.retained = self.stats.retained.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/gpu/pool.rs"]
mod tests;

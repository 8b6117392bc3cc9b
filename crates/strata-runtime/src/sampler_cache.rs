use std::sync::{Arc, Mutex, PoisonError};

use hashbrown::HashMap;
use strata_world::PerlinSampler;

/// Shares one sampler per lattice seed across workers.
///
/// Samplers are immutable once built, so handing out `Arc`s is enough; the
/// lock only guards first construction.
#[derive(Default)]
pub struct SamplerCache {
    samplers: Mutex<HashMap<i32, Arc<PerlinSampler>>>,
}

impl SamplerCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, lattice_seed: i32) -> Arc<PerlinSampler> {
        let mut map = self.samplers.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            map.entry(lattice_seed)
                .or_insert_with(|| Arc::new(PerlinSampler::new(lattice_seed))),
        )
    }

    pub fn len(&self) -> usize {
        self.samplers
            .lock()
            .map(|m| m.len())
            .unwrap_or_else(|e| e.into_inner().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_shares_one_sampler() {
        let cache = SamplerCache::new();
        let a = cache.get(7);
        let b = cache.get(7);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.lattice_seed(), 7);
        let c = cache.get(8);
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(cache.len(), 2);
    }
}

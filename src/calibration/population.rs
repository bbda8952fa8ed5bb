//! Bounded collection of calibration snapshots ranked by quality.
//!
//! A plain list scanned for the best and worst entries. Ties go to the
//! earliest inserted entry in both directions.

use super::levels::LevelsSet;

#[derive(Clone, Debug, Default)]
pub struct Population {
    sets: Vec<LevelsSet>,
    capacity: usize,
}

impl Population {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            sets: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.sets.len() >= self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelsSet> {
        self.sets.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut LevelsSet> {
        self.sets.iter_mut()
    }

    pub fn clear(&mut self) {
        self.sets.clear();
    }

    /// Adds a set. When full, one of the worst entries is evicted first and
    /// returned.
    pub fn insert(&mut self, set: LevelsSet) -> Option<LevelsSet> {
        let evicted = if self.is_full() { self.evict_worst() } else { None };
        self.sets.push(set);
        evicted
    }

    pub fn best_quality(&self) -> Option<u32> {
        self.sets.iter().map(|s| s.quality).max()
    }

    pub fn worst_quality(&self) -> Option<u32> {
        self.sets.iter().map(|s| s.quality).min()
    }

    /// Removes and returns one entry of maximum quality.
    pub fn take_best(&mut self) -> Option<LevelsSet> {
        let best = self.best_quality()?;
        let idx = self.sets.iter().position(|s| s.quality == best)?;
        Some(self.sets.remove(idx))
    }

    /// Removes and returns one entry of minimum quality.
    pub fn evict_worst(&mut self) -> Option<LevelsSet> {
        let worst = self.worst_quality()?;
        let idx = self.sets.iter().position(|s| s.quality == worst)?;
        Some(self.sets.remove(idx))
    }

    /// Entries in descending quality order; equal qualities keep insertion order.
    pub fn ranked(&self) -> Vec<&LevelsSet> {
        let mut ranked: Vec<&LevelsSet> = self.sets.iter().collect();
        ranked.sort_by(|a, b| b.quality.cmp(&a.quality));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(quality: u32) -> LevelsSet {
        LevelsSet {
            quality,
            ..LevelsSet::blank(1, 5)
        }
    }

    #[test]
    fn test_take_best_in_order() {
        let mut pop = Population::new(10);
        for q in [40, 80, 60] {
            pop.insert(set(q));
        }
        assert_eq!(pop.take_best().map(|s| s.quality), Some(80));
        assert_eq!(pop.take_best().map(|s| s.quality), Some(60));
        assert_eq!(pop.take_best().map(|s| s.quality), Some(40));
        assert!(pop.take_best().is_none());
    }

    #[test]
    fn test_insert_when_full_evicts_worst() {
        let mut pop = Population::new(3);
        for q in [50, 20, 90] {
            assert!(pop.insert(set(q)).is_none());
        }
        assert!(pop.is_full());

        let evicted = pop.insert(set(70));
        assert_eq!(evicted.map(|s| s.quality), Some(20));
        assert_eq!(pop.len(), 3);
        assert_eq!(pop.worst_quality(), Some(50));
    }

    #[test]
    fn test_ties_take_earliest() {
        let mut pop = Population::new(4);
        let mut first = set(50);
        first.good = 1;
        pop.insert(first);
        pop.insert(set(50));
        assert_eq!(pop.take_best().map(|s| s.good), Some(1));
    }

    #[test]
    fn test_ranked_descending() {
        let mut pop = Population::new(5);
        for q in [10, 30, 20, 30] {
            pop.insert(set(q));
        }
        let qualities: Vec<u32> = pop.ranked().iter().map(|s| s.quality).collect();
        assert_eq!(qualities, vec![30, 30, 20, 10]);
    }
}

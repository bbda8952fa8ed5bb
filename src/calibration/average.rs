//! Fixed-window integer moving average.

use std::collections::VecDeque;

/// Moving average over the most recent `capacity` samples.
///
/// `Clone` produces a fully independent copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovingAverage {
    history: VecDeque<i32>,
    capacity: usize,
    sum: i64,
    value: i32,
}

impl MovingAverage {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: VecDeque::with_capacity(capacity),
            capacity,
            sum: 0,
            value: 0,
        }
    }

    /// Current average. Zero while empty.
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Fills the window with copies of `v`, discarding any history.
    pub fn init(&mut self, v: i32) {
        self.history.clear();
        self.history.extend(std::iter::repeat(v).take(self.capacity));
        self.sum = v as i64 * self.capacity as i64;
        self.value = v;
    }

    /// Like `init`, but only when there is no history yet.
    pub fn set(&mut self, v: i32) {
        if self.is_empty() {
            self.init(v);
        }
    }

    /// Adds a sample, evicting the oldest once the window is full.
    pub fn add(&mut self, v: i32) {
        if self.history.len() == self.capacity {
            if let Some(old) = self.history.pop_front() {
                self.sum -= old as i64;
            }
        }
        self.history.push_back(v);
        self.sum += v as i64;
        self.value = (self.sum / self.history.len() as i64) as i32;
    }
}

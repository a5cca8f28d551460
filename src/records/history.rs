use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Bounded oldest-first record of accepted samples for one instrument.
///
/// Appending past capacity evicts the oldest sample in the same call, so the window
/// open is a moving horizon over the most recent `capacity` samples.
#[derive(Debug, Clone)]
pub struct HistoryBuffer {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl HistoryBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn append(&mut self, sample: f64) {
        self.samples.push_back(sample);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    /// Oldest sample still retained.
    pub fn window_open(&self) -> Option<f64> {
        self.samples.front().copied()
    }

    /// `(current - open) / open * 100`, or `None` when there is no usable open.
    pub fn percent_change_from_open(&self, current: f64) -> Option<f64> {
        let open = self.window_open()?;
        if open == 0.0 {
            return None;
        }
        let change = (current - open) / open * 100.0;
        change.is_finite().then_some(change)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

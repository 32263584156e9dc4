use super::SignalFilter;
use std::collections::VecDeque;

/// Moving average filter
pub struct MovingAverageFilter {
    window_size: usize,
    buffer: VecDeque<f64>,
}

impl MovingAverageFilter {
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "Window size must be greater than 0");
        Self {
            window_size,
            buffer: VecDeque::with_capacity(window_size),
        }
    }
}

impl SignalFilter for MovingAverageFilter {
    #[allow(clippy::cast_precision_loss)] // Window sizes are small
    fn apply(&mut self, value: f64) -> f64 {
        if self.buffer.len() >= self.window_size {
            self.buffer.pop_front();
        }
        self.buffer.push_back(value);

        self.buffer.iter().sum::<f64>() / self.buffer.len() as f64
    }

    fn reset(&mut self) {
        self.buffer.clear();
    }

    fn name(&self) -> &str {
        "MovingAverageFilter"
    }
}

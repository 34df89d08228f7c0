/// Running sum of samples for a plain arithmetic mean
#[derive(Debug, Default, Clone, Copy)]
pub struct Averager {
    sum: f32,
    count: u32,
}

impl Averager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: f32) {
        self.sum += sample;
        self.count += 1;
    }

    /// Mean of the pushed samples, 0.0 when empty
    pub fn mean(&self) -> f32 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f32
        }
    }
}

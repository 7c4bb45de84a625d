/// Fixed-capacity window over the most recent samples, oldest first.
///
/// Starts out silent; each `push` shifts older samples towards the front.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    data: Vec<f32>,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0.0; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Append `samples`, dropping the oldest ones to stay at capacity.
    pub fn push(&mut self, samples: &[f32]) {
        let cap = self.data.len();
        if samples.len() >= cap {
            self.data.copy_from_slice(&samples[samples.len() - cap..]);
            return;
        }
        let keep = cap - samples.len();
        self.data.copy_within(samples.len().., 0);
        self.data[keep..].copy_from_slice(samples);
    }

    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_silent() {
        let buf = SampleBuffer::new(8);
        assert_eq!(buf.capacity(), 8);
        assert!(buf.as_slice().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn push_shifts_towards_front() {
        let mut buf = SampleBuffer::new(5);
        buf.push(&[1.0, 2.0]);
        assert_eq!(buf.as_slice(), &[0.0, 0.0, 0.0, 1.0, 2.0]);
        buf.push(&[3.0, 4.0, 5.0]);
        assert_eq!(buf.as_slice(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        buf.push(&[6.0]);
        assert_eq!(buf.as_slice(), &[2.0, 3.0, 4.0, 5.0, 6.0]);
        buf.push(&[]);
        assert_eq!(buf.as_slice(), &[2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn oversized_push_keeps_newest() {
        let mut buf = SampleBuffer::new(3);
        buf.push(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(buf.as_slice(), &[3.0, 4.0, 5.0]);
        buf.clear();
        assert_eq!(buf.as_slice(), &[0.0, 0.0, 0.0]);
    }
}

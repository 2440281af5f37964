use crate::color::sample::{PixelSample, TileColor};

/// Reduces a block of pixel samples to one representative color
///
/// Samples whose three color channels are all zero are treated as empty
/// background and left out of the average. Alpha never participates. When a
/// block holds only background samples the result is
/// [`TileColor::SENTINEL`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ColorAverager {
    sums: [u64; 3],
    count: u64,
}

impl ColorAverager {
    /// Create an averager with no accumulated samples
    pub const fn new() -> Self {
        Self {
            sums: [0; 3],
            count: 0,
        }
    }

    /// Accumulate one sample, skipping background pixels
    pub const fn add(&mut self, sample: PixelSample) {
        if sample.is_background() {
            return;
        }
        self.sums[0] += sample.r as u64;
        self.sums[1] += sample.g as u64;
        self.sums[2] += sample.b as u64;
        self.count += 1;
    }

    /// Number of samples that contributed to the average
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Truncating per-channel mean of the accumulated samples
    pub const fn finish(&self) -> TileColor {
        if self.count == 0 {
            return TileColor::SENTINEL;
        }
        // Each mean is bounded by the largest contributing channel value
        TileColor::new(
            (self.sums[0] / self.count) as u8,
            (self.sums[1] / self.count) as u8,
            (self.sums[2] / self.count) as u8,
        )
    }

    /// Average an entire sequence of samples in one call
    pub fn average<I>(samples: I) -> TileColor
    where
        I: IntoIterator<Item = PixelSample>,
    {
        let mut averager = Self::new();
        for sample in samples {
            averager.add(sample);
        }
        averager.finish()
    }
}

// THEORY:
// The `histogram` module records the distribution of per-pixel differences. The
// min/max statistics say how bad the worst pixel is; the histogram says how many
// pixels are that bad, which is what separates "one stray pixel" from "the whole
// image shifted".
//
// The accumulator has a fixed layout: `BIN_COUNT` equal-width bins spanning
// [RANGE_MIN, RANGE_MAX], every observation carrying a weight of one. Bins are
// half-open, `[lower, lower + width)`, except the last one, which also admits
// `RANGE_MAX` itself. Out-of-range values are never produced by the YIQ metric,
// but they are still counted (in `underflow` / `overflow`) rather than dropped.
//
// Rendering (log-scale plots, axis ticks) and density normalization belong to
// whoever consumes the counts.

use serde::Serialize;

pub const BIN_COUNT: usize = 100;
pub const RANGE_MIN: f64 = 0.0;
pub const RANGE_MAX: f64 = 1.0;

/// A single histogram bin as exposed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    /// Inclusive lower edge of the bin.
    pub lower: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    counts: [u64; BIN_COUNT],
    underflow: u64,
    overflow: u64,
    entries: u64,
    sum: f64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    pub fn new() -> Self {
        Self {
            counts: [0; BIN_COUNT],
            underflow: 0,
            overflow: 0,
            entries: 0,
            sum: 0.0,
        }
    }

    /// Inclusive lower edge of bin `index`.
    pub fn lower_bound(index: usize) -> f64 {
        RANGE_MIN + (RANGE_MAX - RANGE_MIN) * index as f64 / BIN_COUNT as f64
    }

    /// Records one observation with unit weight.
    pub fn observe(&mut self, value: f64) {
        self.entries += 1;
        self.sum += value;

        if value < RANGE_MIN {
            self.underflow += 1;
            return;
        }
        // NaN lands here as well.
        if !(value <= RANGE_MAX) {
            self.overflow += 1;
            return;
        }
        self.counts[Self::bin_index(value)] += 1;
    }

    fn bin_index(value: f64) -> usize {
        let scaled = (value - RANGE_MIN) / (RANGE_MAX - RANGE_MIN) * BIN_COUNT as f64;
        let mut index = (scaled as usize).min(BIN_COUNT - 1);

        // Keep the index consistent with `lower_bound` when the scaling rounds
        // across a bin edge.
        if index > 0 && value < Self::lower_bound(index) {
            index -= 1;
        } else if index + 1 < BIN_COUNT && value >= Self::lower_bound(index + 1) {
            index += 1;
        }
        index
    }

    pub fn count(&self, index: usize) -> Option<u64> {
        self.counts.get(index).copied()
    }

    pub fn counts(&self) -> &[u64; BIN_COUNT] {
        &self.counts
    }

    /// All bins, lowest first.
    pub fn bins(&self) -> impl Iterator<Item = Bin> + '_ {
        self.counts.iter().enumerate().map(|(index, &count)| Bin {
            lower: Self::lower_bound(index),
            count,
        })
    }

    /// Number of observations that fell inside [RANGE_MIN, RANGE_MAX].
    pub fn in_range(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of observations, in range or not.
    pub fn entries(&self) -> u64 {
        self.entries
    }

    pub fn underflow(&self) -> u64 {
        self.underflow
    }

    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Mean of every observed value, or `None` before the first observation.
    pub fn mean(&self) -> Option<f64> {
        if self.entries == 0 {
            return None;
        }
        Some(self.sum / self.entries as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_histogram() {
        let h = Histogram::new();
        assert_eq!(h.entries(), 0);
        assert_eq!(h.in_range(), 0);
        assert_eq!(h.mean(), None);
        assert_eq!(h.bins().count(), BIN_COUNT);
    }

    #[test]
    fn zero_goes_to_first_bin() {
        let mut h = Histogram::new();
        h.observe(0.0);
        assert_eq!(h.count(0), Some(1));
    }

    #[test]
    fn one_goes_to_last_bin() {
        let mut h = Histogram::new();
        h.observe(1.0);
        assert_eq!(h.count(BIN_COUNT - 1), Some(1));
        assert_eq!(h.overflow(), 0);
    }

    #[test]
    fn bins_are_half_open() {
        let mut h = Histogram::new();
        for index in 1..BIN_COUNT {
            let edge = Histogram::lower_bound(index);
            h.observe(edge);
            assert_eq!(h.count(index), Some(1), "edge {edge} of bin {index}");
        }
        assert_eq!(h.count(0), Some(0));
    }

    #[test]
    fn value_just_below_an_edge_stays_in_lower_bin() {
        let mut h = Histogram::new();
        h.observe(0.29999999);
        assert_eq!(h.count(29), Some(1));
        h.observe(0.9330436790328738);
        assert_eq!(h.count(93), Some(1));
    }

    #[test]
    fn out_of_range_values_are_counted_apart() {
        let mut h = Histogram::new();
        h.observe(-0.5);
        h.observe(1.5);
        h.observe(f64::NAN);
        h.observe(0.5);
        assert_eq!(h.underflow(), 1);
        assert_eq!(h.overflow(), 2);
        assert_eq!(h.in_range(), 1);
        assert_eq!(h.entries(), 4);
    }

    #[test]
    fn mean_of_observations() {
        let mut h = Histogram::new();
        h.observe(0.25);
        h.observe(0.75);
        assert_eq!(h.mean(), Some(0.5));
    }

    #[test]
    fn lower_bounds_span_the_range() {
        let bins: Vec<Bin> = Histogram::new().bins().collect();
        assert_eq!(bins[0].lower, 0.0);
        assert!((bins[BIN_COUNT - 1].lower - 0.99).abs() < 1e-12);
        assert!(bins.windows(2).all(|pair| pair[0].lower < pair[1].lower));
    }

    #[test]
    fn count_out_of_range_index() {
        assert_eq!(Histogram::new().count(BIN_COUNT), None);
    }
}

// THEORY:
// The `DiffEngine` is the central nervous system of the comparison. It owns neither
// image; it borrows both, lays them onto the integer plane, and sweeps the region
// where they overlap exactly once.
//
// Key architectural principles:
// 1.  **Union Canvas, Intersection Sweep**: The difference map spans the union of the
//     two bounding rectangles so that nothing either image contains is silently
//     cropped away. Only the intersection can be compared; everything else is
//     filled with the `UNKNOWN_INTENSITY` sentinel before the sweep starts. The
//     sentinel is an intensity the metric never produces.
// 2.  **Single Deterministic Pass**: Pixels are visited in row-major order on one
//     thread. Each visit feeds the same value to the three consumers: the histogram,
//     the running statistics, and the difference map.
// 3.  **Statistics Policy**: `dmax` sees every value, zero included. `dmin` only sees
//     strictly positive values, so it reports the smallest non-trivial difference;
//     pixel-exact matches never pull it to zero. Both start at infinite sentinels and
//     stay there when the images do not overlap.
// 4.  **Infallible Core**: Given two valid frames the sweep cannot fail. All fallible
//     work (decoding, normalization) has already happened upstream.

use crate::core_modules::bounds::{Bounds, Coordinate};
use crate::core_modules::frame::RgbaFrame;
use crate::core_modules::histogram::Histogram;
use crate::core_modules::smart_pixel::smart_pixel::{YiqDelta, yiq_delta};
use image::{ImageBuffer, Luma};
use log::{debug, warn};

pub type Intensity = u16;
pub type DiffImage = ImageBuffer<Luma<Intensity>, Vec<Intensity>>;

/// Fill value for difference-map pixels that lie outside the compared region.
///
/// No pair of 8-bit colors scales to this intensity: red against cyan is the only
/// pair above 65428 and it rounds to 65535. The value alone therefore tells a
/// filled pixel from a computed one, also in an exported map.
pub const UNKNOWN_INTENSITY: Intensity = Intensity::MAX - 1;

/// Scales a metric value in [0, 1] to the 16-bit intensity stored in the map.
pub fn to_intensity(value: YiqDelta) -> Intensity {
    (value * Intensity::MAX as f64).round() as Intensity
}

/// A 16-bit single-channel map of per-pixel differences over the union of two frames.
#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceMap {
    bounds: Bounds,
    intersection: Bounds,
    image: DiffImage,
}

impl DifferenceMap {
    fn new(bounds: Bounds, intersection: Bounds) -> Self {
        let image = ImageBuffer::from_pixel(
            bounds.width(),
            bounds.height(),
            Luma([UNKNOWN_INTENSITY]),
        );
        Self {
            bounds,
            intersection,
            image,
        }
    }

    fn set(&mut self, x: Coordinate, y: Coordinate, intensity: Intensity) {
        let local_x = x.abs_diff(self.bounds.min_x);
        let local_y = y.abs_diff(self.bounds.min_y);
        self.image.put_pixel(local_x, local_y, Luma([intensity]));
    }

    /// The union of both input frames.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The region that was actually compared.
    pub fn intersection(&self) -> Bounds {
        self.intersection
    }

    /// True when the pixel at (`x`, `y`) carries a computed difference rather than
    /// the sentinel fill. Equivalent to `intensity_at(x, y) != Some(UNKNOWN_INTENSITY)`
    /// inside the map.
    pub fn is_computed(&self, x: Coordinate, y: Coordinate) -> bool {
        self.intersection.contains(x, y)
    }

    /// Intensity at absolute coordinates, or `None` outside the map.
    pub fn intensity_at(&self, x: Coordinate, y: Coordinate) -> Option<Intensity> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        let local_x = x.abs_diff(self.bounds.min_x);
        let local_y = y.abs_diff(self.bounds.min_y);
        Some(self.image.get_pixel(local_x, local_y).0[0])
    }

    /// The map as a plain image, anchored at (0, 0). `bounds().min_*` gives the offset.
    pub fn image(&self) -> &DiffImage {
        &self.image
    }

    pub fn into_image(self) -> DiffImage {
        self.image
    }
}

/// Running extremes of the difference values seen during a sweep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffStats {
    /// Smallest strictly positive value; `+inf` until one is seen.
    pub dmin: YiqDelta,
    /// Largest value, zero included; `-inf` until any value is seen.
    pub dmax: YiqDelta,
    /// Number of pixels compared.
    pub compared: u64,
}

impl Default for DiffStats {
    fn default() -> Self {
        Self::new()
    }
}

impl DiffStats {
    pub fn new() -> Self {
        Self {
            dmin: f64::INFINITY,
            dmax: f64::NEG_INFINITY,
            compared: 0,
        }
    }

    pub fn record(&mut self, value: YiqDelta) {
        if value > 0.0 {
            self.dmin = self.dmin.min(value);
        }
        self.dmax = self.dmax.max(value);
        self.compared += 1;
    }

    /// False when no strictly positive difference was observed.
    pub fn min_defined(&self) -> bool {
        self.dmin.is_finite()
    }

    /// False when no pixel was compared at all.
    pub fn max_defined(&self) -> bool {
        self.dmax.is_finite()
    }

    pub fn min(&self) -> Option<YiqDelta> {
        self.min_defined().then_some(self.dmin)
    }

    pub fn max(&self) -> Option<YiqDelta> {
        self.max_defined().then_some(self.dmax)
    }
}

/// Everything one sweep produces.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOutcome {
    pub map: DifferenceMap,
    pub stats: DiffStats,
    pub histogram: Histogram,
}

/// Compares two frames over their common region.
pub struct DiffEngine<'a> {
    reference: &'a RgbaFrame,
    candidate: &'a RgbaFrame,
}

impl<'a> DiffEngine<'a> {
    pub fn new(reference: &'a RgbaFrame, candidate: &'a RgbaFrame) -> Self {
        Self {
            reference,
            candidate,
        }
    }

    pub fn union(&self) -> Bounds {
        self.reference.bounds().union(&self.candidate.bounds())
    }

    pub fn intersection(&self) -> Bounds {
        self.reference.bounds().intersect(&self.candidate.bounds())
    }

    /// Runs the sweep.
    pub fn run(&self) -> DiffOutcome {
        let union = self.union();
        let intersection = self.intersection();
        debug!(
            "diffing {} against {}: union {}, intersection {}",
            self.reference.bounds(),
            self.candidate.bounds(),
            union,
            intersection
        );

        let mut map = DifferenceMap::new(union, intersection);
        let mut stats = DiffStats::new();
        let mut histogram = Histogram::new();

        if intersection.is_empty() {
            warn!("images do not overlap; difference statistics are undefined");
        }

        for (x, y) in intersection.points() {
            let value = yiq_delta(
                &self.reference.pixel_within(x, y),
                &self.candidate.pixel_within(x, y),
            );
            histogram.observe(value);
            stats.record(value);
            map.set(x, y, to_intensity(value));
        }

        debug!(
            "compared {} pixels, dmin={}, dmax={}",
            stats.compared, stats.dmin, stats.dmax
        );

        DiffOutcome {
            map,
            stats,
            histogram,
        }
    }
}

/// Shorthand for `DiffEngine::new(reference, candidate).run()`.
pub fn diff_frames(reference: &RgbaFrame, candidate: &RgbaFrame) -> DiffOutcome {
    DiffEngine::new(reference, candidate).run()
}

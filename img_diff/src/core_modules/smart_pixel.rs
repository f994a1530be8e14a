// THEORY:
// The `smart_pixel` module provides the analytical capability of the diff engine.
// It follows the "separation of concerns" principle by keeping the comparison out
// of the "dumb" `Pixel` data object. Its entire purpose is to compare two pixels
// and quantify, as a single number, how differently a viewer would perceive them.
//
// Key architectural principles:
// 1.  **Comparative Analysis**: The metric takes two pixels. A single projection
//     is meaningless on its own; its value is in calculating relationships.
// 2.  **One Lens**: The distance is a weighted squared Euclidean distance in YIQ
//     space (Kotsarenko & Ramos, "Measuring perceived color difference using YIQ
//     NTSC transmission color space in mobile applications"). Luminance carries
//     the largest weight.
// 3.  **Normalized Output**: The raw distance is divided by `MAX_YIQ_DELTA`, the
//     raw distance between the two most different colors of the 8-bit RGB cube,
//     so every result lies in [0, 1]. Identical colors give exactly 0 and the
//     metric is exactly symmetric.

pub mod smart_pixel {
    use crate::core_modules::pixel::pixel::{Pixel, Yiq};

    pub type YiqDelta = f64;

    /// Weight of the squared luminance difference.
    pub const Y_WEIGHT: f64 = 0.5053;
    /// Weight of the squared in-phase chrominance difference.
    pub const I_WEIGHT: f64 = 0.299;
    /// Weight of the squared quadrature chrominance difference.
    pub const Q_WEIGHT: f64 = 0.1957;
    /// Raw weighted distance between two maximally different pixels.
    pub const MAX_YIQ_DELTA: f64 = 35215.0;

    /// Normalized perceptual difference between the colors of two pixels, in [0, 1].
    /// Alpha is ignored.
    pub fn yiq_delta(first: &Pixel, second: &Pixel) -> YiqDelta {
        weighted_delta(&first.yiq(), &second.yiq())
    }

    fn weighted_delta(first: &Yiq, second: &Yiq) -> YiqDelta {
        let y = first.y - second.y;
        let i = first.i - second.i;
        let q = first.q - second.q;

        let raw = Y_WEIGHT * y * y + I_WEIGHT * i * i + Q_WEIGHT * q * q;
        raw / MAX_YIQ_DELTA
    }
}

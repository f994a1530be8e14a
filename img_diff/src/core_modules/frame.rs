// THEORY:
// The `frame` module is the normalization boundary of the engine. Whatever a decoder
// produced (8-bit RGBA, 16-bit grayscale, palette-expanded RGB, a raw byte buffer
// from a capture device) is turned into exactly one canonical shape, the
// `RgbaFrame`, before any comparison happens.
//
// Key architectural principles:
// 1.  **One Canonical Representation**: An `RgbaFrame` is an 8-bit-per-channel RGBA
//     pixel grid plus the `Bounds` it occupies. The diff engine only ever sees this
//     type, so it needs no knowledge of file formats or color models.
// 2.  **Capability Interface**: Each source type opts in by implementing
//     `Normalize`. Sources that already expose direct RGBA access are taken over
//     without touching a single pixel; everything else is re-sampled through its
//     native color model with no dithering and no gamma correction.
// 3.  **Origin Preservation**: A frame's bounding rectangle is carried verbatim.
//     Frames do not have to start at (0, 0).
// 4.  **Fail at the Boundary**: Malformed input (a byte buffer whose length does not
//     describe the claimed dimensions) is rejected here, so the engine behind it
//     never has to defend against it.

use crate::core_modules::bounds::{Bounds, Coordinate};
use crate::core_modules::pixel::pixel::Pixel;
use image::{DynamicImage, Rgba, RgbaImage};
use log::debug;
use thiserror::Error;

const CHANNELS: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error(
        "invalid pixel format: a {width}x{height} RGBA frame needs {expected} bytes, got {actual}"
    )]
    InvalidPixelFormat {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
    #[error("a {width}x{height} frame at ({x}, {y}) reaches past the coordinate range")]
    OriginOutOfRange {
        x: Coordinate,
        y: Coordinate,
        width: u32,
        height: u32,
    },
}

/// A canonical 8-bit RGBA image positioned on the integer plane.
#[derive(Debug, Clone, PartialEq)]
pub struct RgbaFrame {
    bounds: Bounds,
    pixels: RgbaImage,
}

impl RgbaFrame {
    /// Wraps an RGBA image whose top-left corner sits at the origin.
    pub fn new(pixels: RgbaImage) -> Self {
        let bounds = Bounds::from_size(pixels.width(), pixels.height());
        Self { bounds, pixels }
    }

    /// Wraps an RGBA image whose top-left corner sits at (`x`, `y`).
    pub fn with_origin(
        pixels: RgbaImage,
        x: Coordinate,
        y: Coordinate,
    ) -> Result<Self, NormalizeError> {
        let (width, height) = pixels.dimensions();
        let bounds = Bounds::checked_with_origin(x, y, width, height).ok_or(
            NormalizeError::OriginOutOfRange {
                x,
                y,
                width,
                height,
            },
        )?;
        Ok(Self { bounds, pixels })
    }

    /// A frame covering `bounds` where every pixel is `pixel`.
    pub fn filled(bounds: Bounds, pixel: Pixel) -> Self {
        let pixels = RgbaImage::from_pixel(bounds.width(), bounds.height(), Rgba::from(pixel));
        Self { bounds, pixels }
    }

    /// Builds a frame from tightly packed RGBA bytes, row-major, top-left first.
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>) -> Result<Self, NormalizeError> {
        let expected = width as usize * height as usize * CHANNELS;
        let actual = bytes.len();
        match RgbaImage::from_raw(width, height, bytes) {
            Some(pixels) if actual == expected => Ok(Self::new(pixels)),
            _ => Err(NormalizeError::InvalidPixelFormat {
                width,
                height,
                expected,
                actual,
            }),
        }
    }

    /// Moves the frame so that its top-left corner sits at (`x`, `y`).
    pub fn at_origin(self, x: Coordinate, y: Coordinate) -> Result<Self, NormalizeError> {
        Self::with_origin(self.pixels, x, y)
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// The pixel at absolute coordinates, or `None` outside the frame.
    pub fn pixel_at(&self, x: Coordinate, y: Coordinate) -> Option<Pixel> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        Some(self.pixel_within(x, y))
    }

    /// The pixel at absolute coordinates the caller already knows lie in `bounds`.
    pub(crate) fn pixel_within(&self, x: Coordinate, y: Coordinate) -> Pixel {
        let local_x = x.abs_diff(self.bounds.min_x);
        let local_y = y.abs_diff(self.bounds.min_y);
        Pixel::from(*self.pixels.get_pixel(local_x, local_y))
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }
}

/// Conversion of a decoded source into the canonical `RgbaFrame`.
pub trait Normalize {
    fn normalize(self) -> Result<RgbaFrame, NormalizeError>;
}

impl Normalize for RgbaFrame {
    fn normalize(self) -> Result<RgbaFrame, NormalizeError> {
        Ok(self)
    }
}

impl Normalize for RgbaImage {
    fn normalize(self) -> Result<RgbaFrame, NormalizeError> {
        Ok(RgbaFrame::new(self))
    }
}

impl Normalize for DynamicImage {
    fn normalize(self) -> Result<RgbaFrame, NormalizeError> {
        match self {
            DynamicImage::ImageRgba8(pixels) => Ok(RgbaFrame::new(pixels)),
            other => {
                debug!(
                    "re-sampling {:?} {}x{} image into rgba8",
                    other.color(),
                    other.width(),
                    other.height()
                );
                Ok(RgbaFrame::new(other.to_rgba8()))
            }
        }
    }
}

/// A borrowed, tightly packed RGBA byte buffer, as handed over by capture devices
/// and foreign decoders.
#[derive(Debug, Clone, Copy)]
pub struct RawRgba<'a> {
    pub width: u32,
    pub height: u32,
    pub bytes: &'a [u8],
    pub origin: (Coordinate, Coordinate),
}

impl<'a> RawRgba<'a> {
    pub fn new(width: u32, height: u32, bytes: &'a [u8]) -> Self {
        Self {
            width,
            height,
            bytes,
            origin: (0, 0),
        }
    }
}

impl Normalize for RawRgba<'_> {
    fn normalize(self) -> Result<RgbaFrame, NormalizeError> {
        let (x, y) = self.origin;
        RgbaFrame::from_raw(self.width, self.height, self.bytes.to_vec())?.at_origin(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};

    #[test]
    fn rgba8_is_taken_over_verbatim() {
        let mut source = RgbaImage::new(3, 2);
        source.put_pixel(2, 1, Rgba([9, 8, 7, 6]));
        let frame = DynamicImage::ImageRgba8(source.clone()).normalize().unwrap();
        assert_eq!(frame.as_image(), &source);
        assert_eq!(frame.bounds(), Bounds::from_size(3, 2));
    }

    #[test]
    fn rgb8_gains_an_opaque_alpha() {
        let source = RgbImage::from_pixel(2, 2, Rgb([10, 20, 30]));
        let frame = DynamicImage::ImageRgb8(source).normalize().unwrap();
        assert_eq!(frame.pixel_at(1, 1), Some(Pixel::new(10, 20, 30, 255)));
    }

    #[test]
    fn gray_is_replicated_across_channels() {
        let source = GrayImage::from_pixel(1, 1, Luma([77]));
        let frame = DynamicImage::ImageLuma8(source).normalize().unwrap();
        assert_eq!(frame.pixel_at(0, 0), Some(Pixel::opaque(77, 77, 77)));
    }

    #[test]
    fn sixteen_bit_is_narrowed() {
        let source: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_pixel(1, 1, Luma([65535]));
        let frame = DynamicImage::ImageLuma16(source).normalize().unwrap();
        assert_eq!(frame.pixel_at(0, 0), Some(Pixel::WHITE));
    }

    #[test]
    fn raw_buffer_with_origin() {
        let bytes = [1u8, 2, 3, 4, 5, 6, 7, 8];
        let raw = RawRgba {
            origin: (-4, 10),
            ..RawRgba::new(2, 1, &bytes)
        };
        let frame = raw.normalize().unwrap();
        assert_eq!(frame.bounds(), Bounds::new(-4, 10, -2, 11));
        assert_eq!(frame.pixel_at(-4, 10), Some(Pixel::new(1, 2, 3, 4)));
        assert_eq!(frame.pixel_at(-3, 10), Some(Pixel::new(5, 6, 7, 8)));
        assert_eq!(frame.pixel_at(0, 0), None);
    }

    #[test]
    fn raw_buffer_of_wrong_length_is_rejected() {
        let bytes = [0u8; 7];
        let err = RawRgba::new(2, 1, &bytes).normalize().unwrap_err();
        assert_eq!(
            err,
            NormalizeError::InvalidPixelFormat {
                width: 2,
                height: 1,
                expected: 8,
                actual: 7,
            }
        );
    }

    #[test]
    fn origin_past_the_coordinate_range_is_rejected() {
        let bytes = [0u8; 8];
        let raw = RawRgba {
            origin: (Coordinate::MAX - 1, 0),
            ..RawRgba::new(2, 1, &bytes)
        };
        assert_eq!(
            raw.normalize().unwrap_err(),
            NormalizeError::OriginOutOfRange {
                x: Coordinate::MAX - 1,
                y: 0,
                width: 2,
                height: 1,
            }
        );

        let (x, y) = (Coordinate::MAX - 1, Coordinate::MIN);
        let edge = RgbaFrame::with_origin(RgbaImage::new(1, 1), x, y).unwrap();
        assert_eq!(edge.pixel_at(x, y), Some(Pixel::new(0, 0, 0, 0)));
    }

    #[test]
    fn oversized_raw_buffer_is_rejected() {
        assert!(RgbaFrame::from_raw(1, 1, vec![0; 5]).is_err());
    }

    #[test]
    fn filled_frame_covers_bounds() {
        let bounds = Bounds::with_origin(5, 5, 3, 2);
        let frame = RgbaFrame::filled(bounds, Pixel::opaque(1, 1, 1));
        assert_eq!(frame.bounds(), bounds);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 2);
        assert_eq!(frame.pixel_at(7, 6), Some(Pixel::opaque(1, 1, 1)));
        assert_eq!(frame.pixel_at(8, 6), None);
    }
}

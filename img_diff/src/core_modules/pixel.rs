// THEORY (1D Pixel Heuristics):
// The `Pixel` module is the most fundamental unit of the diff engine. It is a "dumb"
// data container for a single RGBA pixel plus the one single-pixel transform the
// engine needs: the projection of its RGB channels into NTSC YIQ coordinates.
// Anything that needs a second pixel (the perceptual distance itself) belongs in
// `smart_pixel`, which is the pairwise layer.
//
// Why YIQ?
// - Y carries luminance, I and Q carry chrominance. Separating them lets the
//   pairwise metric weight brightness changes more heavily than hue shifts, which
//   is closer to how a viewer notices a difference.
// - The transform is linear, so it is cheap and exactly reproducible.
//
// Key principles:
// 1) Single-pixel scope (1D): nothing here reads neighbours or a second image.
// 2) Alpha is carried but never enters the YIQ projection.
// 3) All YIQ math is done in f64 on the raw 0..255 channel values, left to right,
//    so results are bit-for-bit reproducible across runs.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Luma = f64;
    pub type InPhase = f64;
    pub type Quadrature = f64;

    const CHANNELS: usize = 4;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255). Ignored by YIQ.
        pub alpha: Channel,
    }

    /// A color in NTSC YIQ coordinates, on the 0..255 scale of the source channels.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Yiq {
        /// Luminance.
        pub y: Luma,
        /// Orange-blue chrominance axis.
        pub i: InPhase,
        /// Purple-green chrominance axis.
        pub q: Quadrature,
    }

    impl Pixel {
        pub const BLACK: Pixel = Pixel::opaque(0, 0, 0);
        pub const WHITE: Pixel = Pixel::opaque(255, 255, 255);

        pub const fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// A fully opaque pixel.
        pub const fn opaque(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, 255)
        }

        /// Projects the RGB channels into YIQ.
        ///
        /// - Uses the 0..255 channel values directly (no normalization, no gamma).
        /// - Alpha does not participate.
        pub fn yiq(&self) -> Yiq {
            let r = self.red as f64;
            let g = self.green as f64;
            let b = self.blue as f64;

            Yiq {
                y: r * 0.29889531 + g * 0.58662247 + b * 0.11448223,
                i: r * 0.59597799 - g * 0.27417610 - b * 0.32180189,
                q: r * 0.21147017 - g * 0.52261711 + b * 0.31114694,
            }
        }
    }

    impl From<[Byte; CHANNELS]> for Pixel {
        fn from(bytes: [Byte; CHANNELS]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    impl From<image::Rgba<Byte>> for Pixel {
        fn from(rgba: image::Rgba<Byte>) -> Self {
            Pixel::from(rgba.0)
        }
    }

    impl From<Pixel> for image::Rgba<Byte> {
        fn from(pixel: Pixel) -> Self {
            image::Rgba([pixel.red, pixel.green, pixel.blue, pixel.alpha])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn black_projects_to_origin() {
        assert_eq!(Pixel::BLACK.yiq(), Yiq::default());
    }

    #[test]
    fn gray_has_no_chrominance() {
        // The I and Q rows of the matrix sum to (almost) zero, so neutral grays
        // carry only luminance.
        let yiq = Pixel::opaque(128, 128, 128).yiq();
        assert!(close(yiq.y, 128.0 * 1.00000001));
        assert!(yiq.i.abs() < 1e-9);
        assert!(yiq.q.abs() < 1e-9);
    }

    #[test]
    fn primaries_use_matrix_columns() {
        let red = Pixel::opaque(255, 0, 0).yiq();
        assert!(close(red.y, 255.0 * 0.29889531));
        assert!(close(red.i, 255.0 * 0.59597799));
        assert!(close(red.q, 255.0 * 0.21147017));

        let blue = Pixel::opaque(0, 0, 255).yiq();
        assert!(close(blue.y, 255.0 * 0.11448223));
        assert!(close(blue.i, -255.0 * 0.32180189));
        assert!(close(blue.q, 255.0 * 0.31114694));
    }

    #[test]
    fn alpha_is_ignored() {
        assert_eq!(Pixel::new(10, 20, 30, 0).yiq(), Pixel::new(10, 20, 30, 255).yiq());
    }

    #[test]
    fn converts_to_and_from_rgba() {
        let pixel = Pixel::new(1, 2, 3, 4);
        let rgba: image::Rgba<u8> = pixel.into();
        assert_eq!(rgba, image::Rgba([1, 2, 3, 4]));
        assert_eq!(Pixel::from(rgba), pixel);
        assert_eq!(Pixel::from([1, 2, 3, 4]), pixel);
    }
}

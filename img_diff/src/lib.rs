// THEORY:
// This file is the main entry point for the `img_diff` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers (the `img_diff` binary, CI
// harnesses, screenshot test suites).
//
// The primary goal is to export the `DiffPipeline` and its associated data
// structures (`DiffConfig`, `DiffReport`, `Verdict`) as the clean, high-level
// interface for the whole engine. The building blocks in `core_modules` stay public
// for callers that want a single stage, such as the YIQ metric on its own.

pub mod core_modules;
pub mod pipeline;

pub use core_modules::bounds::Bounds;
pub use core_modules::decision::{Verdict, decide};
pub use core_modules::diff_engine::{DiffOutcome, DiffStats, DifferenceMap, UNKNOWN_INTENSITY};
pub use core_modules::frame::{Normalize, NormalizeError, RawRgba, RgbaFrame};
pub use core_modules::histogram::Histogram;
pub use core_modules::pixel::pixel::Pixel;
pub use core_modules::smart_pixel::smart_pixel::yiq_delta;
pub use pipeline::{DEFAULT_MAX_DIFFERENCE, DiffConfig, DiffPipeline, DiffReport};

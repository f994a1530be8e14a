// THEORY:
// The `pipeline` module is the final, top-level API for the diff engine. It wraps the
// full stack (normalization, the YIQ sweep, statistics, histogram, and the batch
// decision) into a single call that turns two images into one `DiffReport`.
//
// Key architectural principles:
// 1.  **Explicit Configuration**: Every tunable lives in `DiffConfig`, passed by value
//     when the pipeline is built. There is no global state.
// 2.  **Normalize First**: `compare_images` accepts anything that implements
//     `Normalize`, so callers can hand over decoded images, raw RGBA buffers or
//     ready-made frames without converting them by hand.
// 3.  **Report, Don't Act**: The report carries the verdict and knows how to render
//     itself as text or JSON. Printing and process exit belong to the caller.

use crate::core_modules::decision::{Verdict, decide};
use crate::core_modules::diff_engine::{DiffEngine, DiffOutcome, DiffStats, DifferenceMap};
use crate::core_modules::frame::{Normalize, NormalizeError, RgbaFrame};
use crate::core_modules::histogram::{BIN_COUNT, Bin, Histogram};
use crate::core_modules::utils::number_format::format_g;
use log::warn;
use serde::Serialize;
use std::fmt;

/// Threshold used by batch mode when none is given.
pub const DEFAULT_MAX_DIFFERENCE: f64 = 0.1;

/// Configuration for the DiffPipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiffConfig {
    /// Largest `dmax` that still counts as a pass.
    pub max_difference: f64,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            max_difference: DEFAULT_MAX_DIFFERENCE,
        }
    }
}

/// The main, top-level struct for the diff engine.
#[derive(Debug, Clone, Default)]
pub struct DiffPipeline {
    config: DiffConfig,
}

impl DiffPipeline {
    pub fn new(config: DiffConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Compares two canonical frames.
    pub fn compare(&self, reference: &RgbaFrame, candidate: &RgbaFrame) -> DiffReport {
        let outcome = DiffEngine::new(reference, candidate).run();
        let verdict = decide(outcome.stats.dmax, self.config.max_difference);

        if !outcome.stats.max_defined() {
            warn!(
                "no overlapping pixels between {} and {}; reporting {} by default",
                reference.bounds(),
                candidate.bounds(),
                verdict
            );
        }

        DiffReport {
            outcome,
            verdict,
            threshold: self.config.max_difference,
        }
    }

    /// Normalizes both sources, then compares them.
    pub fn compare_images<A, B>(
        &self,
        reference: A,
        candidate: B,
    ) -> Result<DiffReport, NormalizeError>
    where
        A: Normalize,
        B: Normalize,
    {
        let reference = reference.normalize()?;
        let candidate = candidate.normalize()?;
        Ok(self.compare(&reference, &candidate))
    }
}

/// The primary output of the pipeline for one image pair.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffReport {
    pub outcome: DiffOutcome,
    pub verdict: Verdict,
    /// The threshold the verdict was decided against.
    pub threshold: f64,
}

#[derive(Serialize)]
struct JsonReport {
    dmin: Option<f64>,
    dmax: Option<f64>,
    overlap: bool,
    compared_pixels: u64,
    threshold: f64,
    verdict: Verdict,
    histogram: Vec<Bin>,
}

impl DiffReport {
    pub fn stats(&self) -> &DiffStats {
        &self.outcome.stats
    }

    pub fn dmin(&self) -> f64 {
        self.outcome.stats.dmin
    }

    pub fn dmax(&self) -> f64 {
        self.outcome.stats.dmax
    }

    pub fn difference_map(&self) -> &DifferenceMap {
        &self.outcome.map
    }

    pub fn histogram(&self) -> &Histogram {
        &self.outcome.histogram
    }

    /// False when the two images share no pixel. The statistics are undefined then,
    /// and the verdict is a pass only because nothing could exceed the threshold.
    pub fn has_overlap(&self) -> bool {
        !self.outcome.map.intersection().is_empty()
    }

    /// The one-line batch report, `diff=[<dmin>, <dmax>]`.
    ///
    /// Undefined statistics keep their infinite sentinels and print as `+Inf` / `-Inf`.
    pub fn summary(&self) -> String {
        format!("diff=[{}, {}]", format_g(self.dmin()), format_g(self.dmax()))
    }

    /// A multi-line report: the statistics followed by every non-empty histogram bin.
    /// Same text as the `Display` impl.
    pub fn details(&self) -> String {
        self.to_string()
    }

    /// The report as pretty-printed JSON. Undefined statistics become `null`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            dmin: self.outcome.stats.min(),
            dmax: self.outcome.stats.max(),
            overlap: self.has_overlap(),
            compared_pixels: self.outcome.stats.compared,
            threshold: self.threshold,
            verdict: self.verdict,
            histogram: self.histogram().bins().collect(),
        };
        serde_json::to_string_pretty(&report)
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Diff:")?;
        writeln!(f, " - min= {}", format_g(self.dmin()))?;
        writeln!(f, " - max= {}", format_g(self.dmax()))?;
        if !self.has_overlap() {
            writeln!(f, " (images do not overlap)")?;
        }

        writeln!(f, "YIQ distribution:")?;
        let histogram = self.histogram();
        for (index, bin) in histogram.bins().enumerate().filter(|(_, bin)| bin.count > 0) {
            let upper = Histogram::lower_bound(index + 1);
            let close = if index + 1 == BIN_COUNT { ']' } else { ')' };
            writeln!(f, " [{:.2}, {:.2}{} {}", bin.lower, upper, close, bin.count)?;
        }
        if let Some(mean) = histogram.mean() {
            writeln!(f, " entries= {}, mean= {}", histogram.entries(), format_g(mean))?;
        }
        Ok(())
    }
}

// THEORY:
// The `decision` module turns a difference statistic into the one bit a CI pipeline
// cares about. It is a pure function of its inputs: no logging, no process exit.
// Mapping a verdict to an exit status is the caller's business, `exit_code` only
// encodes the conventional mapping.
//
// The comparison is strict: a maximum difference equal to the threshold passes.
// An undefined maximum (`-inf`, images that never overlapped) compares below every
// threshold and therefore passes as well. That is the long-standing behavior of the
// tool and is kept as is; callers that consider "no overlap" a failure must check
// for it themselves (see `DiffReport::has_overlap`).

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        matches!(self, Verdict::Pass)
    }

    /// Conventional process exit status: 0 for pass, 1 for fail.
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::Pass => 0,
            Verdict::Fail => 1,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => f.write_str("pass"),
            Verdict::Fail => f.write_str("fail"),
        }
    }
}

/// Fails when `dmax` is strictly greater than `threshold`.
pub fn decide(dmax: f64, threshold: f64) -> Verdict {
    if dmax > threshold {
        Verdict::Fail
    } else {
        Verdict::Pass
    }
}

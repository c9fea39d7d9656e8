//! curve — measured series, fitting ranges and the text report.
//!
//! Purpose
//! -------
//! Hold the output of one measurement run ([`Curve`]), the user-selected
//! fitting window ([`Range`]) and the tab-separated report, which is the
//! only on-disk artifact the engine writes itself.
//!
//! Key behaviors
//! -------------
//! - A curve carries its [`Sign`], so estimators compute
//!   `dimension = sign * slope` without knowing which strategy ran.
//! - Strategies assert their value direction with
//!   [`Curve::check_monotone`] before handing the curve out.
//! - Ranges snap to existing keys and are stored as scale values.
//!
//! Invariants & assumptions
//! ------------------------
//! - Curves are immutable once built; refits never touch the curve.

pub mod errors;
pub mod range;
pub mod report;
pub mod series;

pub use self::{
    errors::{CurveError, CurveResult},
    range::Range,
    report::{FittedCurve, REPORT_HEADER, report_string, write_report},
    series::{Curve, Monotonicity, Sign},
};

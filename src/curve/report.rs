//! Tab-separated curve report.
//!
//! One header line `scale\tmeasure\tscaling\tfitted`, then one row per
//! curve point. `scaling` is [`Curve::scaling_behavior`]; `fitted` is the
//! fitted model value for points inside the fit range and empty otherwise.
use std::io::Write;

use super::{errors::CurveResult, range::Range, series::Curve};

pub const REPORT_HEADER: &str = "scale\tmeasure\tscaling\tfitted";

/// A fitted model that can be evaluated on curve scales.
pub trait FittedCurve {
    fn fit_range(&self) -> &Range;
    fn fitted_value(&self, scale: f64) -> f64;
}

pub fn write_report<W: Write>(
    writer: &mut W, curve: &Curve, fit: Option<&dyn FittedCurve>,
) -> CurveResult<()> {
    writeln!(writer, "{REPORT_HEADER}")?;
    let scaling = curve.scaling_behavior();
    for ((scale, measure), local) in curve.points().zip(scaling) {
        write!(writer, "{scale}\t{measure}\t{local}\t")?;
        if let Some(fit) = fit.filter(|f| f.fit_range().contains(scale)) {
            write!(writer, "{}", fit.fitted_value(scale))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Render the report into a `String`.
pub fn report_string(curve: &Curve, fit: Option<&dyn FittedCurve>) -> CurveResult<String> {
    let mut buf = Vec::new();
    write_report(&mut buf, curve, fit)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::series::Sign;

    struct Doubling {
        range: Range,
    }

    impl FittedCurve for Doubling {
        fn fit_range(&self) -> &Range {
            &self.range
        }

        fn fitted_value(&self, scale: f64) -> f64 {
            2.0 * scale
        }
    }

    #[test]
    // Purpose
    // -------
    // The report has a header, one row per point, and blank fitted cells
    // outside the fit range.
    //
    // Given
    // -----
    // - y = 2x at x = 1, 2, 4 with a fit range [2, 4].
    //
    // Expect
    // ------
    // - Row 1 ends with an empty fitted cell; rows 2 and 3 carry 4 and 8.
    fn report_layout_blanks_fitted_outside_range() {
        // Arrange
        let curve = Curve::new(vec![1.0, 2.0, 4.0], vec![2.0, 4.0, 8.0], Sign::Positive)
            .expect("valid curve");
        let fit = Doubling { range: Range::new(&curve, 2.0, 4.0).expect("non-empty range") };

        // Act
        let text = report_string(&curve, Some(&fit)).expect("in-memory write");

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], REPORT_HEADER);
        let rows: Vec<Vec<&str>> = lines[1..].iter().map(|l| l.split('\t').collect()).collect();
        for (row, (scale, measure, fitted)) in
            rows.iter().zip([("1", "2", ""), ("2", "4", "4"), ("4", "8", "8")])
        {
            assert_eq!(row.len(), 4);
            assert_eq!((row[0], row[1], row[3]), (scale, measure, fitted));
            let local: f64 = row[2].parse().expect("numeric scaling column");
            assert!((local - 1.0).abs() < 1e-12);
        }
    }
}

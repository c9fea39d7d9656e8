//! Vector feature collections.
//!
//! Measurement strategies see vector layers only through the [`FeatureSet`]
//! trait: a per-feature envelope, an exact closed intersection test against
//! an axis-aligned box, an anchor point and a mass. Topology operations
//! (buffering, overlay) stay outside the crate; a layer that can buffer
//! itself exposes that through [`BufferOracle`].
use super::{
    envelope::Envelope,
    errors::{GeometryError, GeometryResult},
};

/// Area and connectivity of a dataset buffered by `radius`.
pub trait BufferOracle: Sync {
    /// Area of the union of all features buffered by `radius`.
    fn area(&self, radius: f64) -> f64;
    /// Number of connected components of that union.
    fn components(&self, radius: f64) -> usize;
}

pub trait FeatureSet: Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn feature_envelope(&self, index: usize) -> Envelope;

    /// Exact test against a closed box; touching counts as intersecting.
    fn intersects_box(&self, index: usize, cell: &Envelope) -> bool;

    /// Representative location used by distance-based strategies and by
    /// multifractal mass assignment.
    fn anchor(&self, index: usize) -> (f64, f64) {
        self.feature_envelope(index).center()
    }

    fn mass(&self, _index: usize) -> f64 {
        1.0
    }

    /// Union of all feature envelopes, `None` for an empty set.
    fn envelope(&self) -> Option<Envelope> {
        (0..self.len())
            .map(|i| self.feature_envelope(i))
            .reduce(|acc, env| acc.union(&env))
    }

    /// Native resolution of the layer, if it has one.
    fn resolution(&self) -> Option<f64> {
        None
    }

    fn buffer_oracle(&self) -> Option<&dyn BufferOracle> {
        None
    }
}

fn check_coordinate(feature: usize, [x, y]: [f64; 2]) -> GeometryResult<()> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(GeometryError::NonFiniteCoordinate { feature, x, y })
    }
}

fn vertices_envelope(vertices: &[[f64; 2]]) -> Envelope {
    let [x0, y0] = vertices[0];
    vertices.iter().skip(1).fold(Envelope::from_point(x0, y0), |acc, &[x, y]| {
        acc.union(&Envelope::from_point(x, y))
    })
}

/// Closed segment against closed box, Liang-Barsky clipping.
pub fn segment_intersects_box(a: [f64; 2], b: [f64; 2], cell: &Envelope) -> bool {
    let (dx, dy) = (b[0] - a[0], b[1] - a[1]);
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    let checks = [
        (-dx, a[0] - cell.min_x),
        (dx, cell.max_x - a[0]),
        (-dy, a[1] - cell.min_y),
        (dy, cell.max_y - a[1]),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return false;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return false;
            }
            t1 = t1.min(t);
        }
    }
    t0 <= t1
}

/// Weighted point layer.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<[f64; 2]>,
    masses: Option<Vec<f64>>,
}

impl PointSet {
    pub fn new(points: Vec<[f64; 2]>) -> GeometryResult<Self> {
        for (i, &p) in points.iter().enumerate() {
            check_coordinate(i, p)?;
        }
        Ok(Self { points, masses: None })
    }

    pub fn with_masses(mut self, masses: Vec<f64>) -> GeometryResult<Self> {
        if masses.len() != self.points.len() {
            return Err(GeometryError::MassLengthMismatch {
                expected: self.points.len(),
                found: masses.len(),
            });
        }
        if let Some((feature, &value)) =
            masses.iter().enumerate().find(|(_, m)| !m.is_finite() || **m < 0.0)
        {
            return Err(GeometryError::InvalidMass { feature, value });
        }
        self.masses = Some(masses);
        Ok(self)
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }
}

impl FeatureSet for PointSet {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn feature_envelope(&self, index: usize) -> Envelope {
        let [x, y] = self.points[index];
        Envelope::from_point(x, y)
    }

    fn intersects_box(&self, index: usize, cell: &Envelope) -> bool {
        let [x, y] = self.points[index];
        cell.contains_point(x, y)
    }

    fn anchor(&self, index: usize) -> (f64, f64) {
        let [x, y] = self.points[index];
        (x, y)
    }

    fn mass(&self, index: usize) -> f64 {
        self.masses.as_ref().map_or(1.0, |m| m[index])
    }
}

/// Line layer; each feature is an open polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineSet {
    lines: Vec<Vec<[f64; 2]>>,
    envelopes: Vec<Envelope>,
}

impl PolylineSet {
    pub fn new(lines: Vec<Vec<[f64; 2]>>) -> GeometryResult<Self> {
        let mut envelopes = Vec::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            if line.is_empty() {
                return Err(GeometryError::DegenerateFeature { feature: i, vertices: 0 });
            }
            for &p in line {
                check_coordinate(i, p)?;
            }
            envelopes.push(vertices_envelope(line));
        }
        Ok(Self { lines, envelopes })
    }

    pub fn lines(&self) -> &[Vec<[f64; 2]>] {
        &self.lines
    }
}

impl FeatureSet for PolylineSet {
    fn len(&self) -> usize {
        self.lines.len()
    }

    fn feature_envelope(&self, index: usize) -> Envelope {
        self.envelopes[index]
    }

    fn intersects_box(&self, index: usize, cell: &Envelope) -> bool {
        if !self.envelopes[index].intersects(cell) {
            return false;
        }
        let line = &self.lines[index];
        if line.len() == 1 {
            return cell.contains_point(line[0][0], line[0][1]);
        }
        line.windows(2).any(|w| segment_intersects_box(w[0], w[1], cell))
    }
}

/// Polygon layer; each feature is a set of rings filled with the even-odd
/// rule, so holes are given as additional rings.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonSet {
    polygons: Vec<Vec<Vec<[f64; 2]>>>,
    envelopes: Vec<Envelope>,
}

impl PolygonSet {
    pub fn new(polygons: Vec<Vec<Vec<[f64; 2]>>>) -> GeometryResult<Self> {
        let mut envelopes = Vec::with_capacity(polygons.len());
        for (i, rings) in polygons.iter().enumerate() {
            let Some(outer) = rings.first() else {
                return Err(GeometryError::DegenerateFeature { feature: i, vertices: 0 });
            };
            for ring in rings {
                if ring.len() < 3 {
                    return Err(GeometryError::DegenerateFeature { feature: i, vertices: ring.len() });
                }
                for &p in ring {
                    check_coordinate(i, p)?;
                }
            }
            envelopes.push(vertices_envelope(outer));
        }
        Ok(Self { polygons, envelopes })
    }

    fn contains_point(&self, index: usize, x: f64, y: f64) -> bool {
        let mut inside = false;
        for ring in &self.polygons[index] {
            let n = ring.len();
            let mut j = n - 1;
            for i in 0..n {
                let [xi, yi] = ring[i];
                let [xj, yj] = ring[j];
                if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
                    inside = !inside;
                }
                j = i;
            }
        }
        inside
    }
}

impl FeatureSet for PolygonSet {
    fn len(&self) -> usize {
        self.polygons.len()
    }

    fn feature_envelope(&self, index: usize) -> Envelope {
        self.envelopes[index]
    }

    fn intersects_box(&self, index: usize, cell: &Envelope) -> bool {
        if !self.envelopes[index].intersects(cell) {
            return false;
        }
        let rings = &self.polygons[index];
        let edge_hit = rings.iter().any(|ring| {
            let n = ring.len();
            (0..n).any(|i| segment_intersects_box(ring[i], ring[(i + 1) % n], cell))
        });
        if edge_hit {
            return true;
        }
        // No boundary crossing: the box is either fully inside or fully
        // outside the filled area.
        let (cx, cy) = cell.center();
        self.contains_point(index, cx, cy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Segment clipping handles crossing, touching and missing segments as
    // well as axis-parallel segments that run along a box edge.
    fn segment_intersects_box_cases() {
        let cell = Envelope::new(0.0, 0.0, 1.0, 1.0);
        assert!(segment_intersects_box([-1.0, 0.5], [2.0, 0.5], &cell));
        assert!(segment_intersects_box([1.0, -1.0], [1.0, 2.0], &cell));
        assert!(segment_intersects_box([2.0, 0.0], [1.0, 0.0], &cell));
        assert!(!segment_intersects_box([1.5, -1.0], [1.5, 2.0], &cell));
        assert!(!segment_intersects_box([-1.0, 0.0], [0.0, -1.0 - 1e-9], &cell));
    }

    #[test]
    // Purpose
    // -------
    // A box fully inside a polygon intersects it; a box inside the hole does
    // not.
    //
    // Given
    // -----
    // - A 10x10 square with a 4x4 hole in the middle.
    //
    // Expect
    // ------
    // - Box inside the solid part: true. Box inside the hole: false.
    fn polygon_set_intersects_interior_and_respects_holes() {
        // Arrange
        let outer = vec![[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]];
        let hole = vec![[3.0, 3.0], [7.0, 3.0], [7.0, 7.0], [3.0, 7.0]];
        let set = PolygonSet::new(vec![vec![outer, hole]]).expect("valid polygon");

        // Act / Assert
        assert!(set.intersects_box(0, &Envelope::new(1.0, 1.0, 2.0, 2.0)));
        assert!(!set.intersects_box(0, &Envelope::new(4.0, 4.0, 6.0, 6.0)));
        assert!(set.intersects_box(0, &Envelope::new(2.5, 4.0, 3.5, 5.0)));
    }

    #[test]
    // Purpose
    // -------
    // Non-finite input and bad masses are rejected at construction.
    fn point_set_validates_inputs() {
        let err = PointSet::new(vec![[0.0, 0.0], [f64::NAN, 1.0]]).unwrap_err();
        assert!(matches!(err, GeometryError::NonFiniteCoordinate { feature: 1, .. }));

        let set = PointSet::new(vec![[0.0, 0.0]]).expect("valid points");
        let err = set.with_masses(vec![-1.0]).unwrap_err();
        assert_eq!(err, GeometryError::InvalidMass { feature: 0, value: -1.0 });
    }
}

//! Binary rasters and summed-area tables.
//!
//! A [`BinaryRaster`] is a row-major occupancy grid with a georeference:
//! pixel `(col, row)` covers `[x0 + col*res, x0 + (col+1)*res] x
//! [y0 + row*res, y0 + (row+1)*res]`. Row indices grow with `y`.
use super::{
    envelope::Envelope,
    errors::{GeometryError, GeometryResult},
};

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryRaster {
    width: usize,
    height: usize,
    resolution: f64,
    origin_x: f64,
    origin_y: f64,
    data: Vec<u8>,
}

impl BinaryRaster {
    /// Wrap a row-major buffer; any non-zero byte is foreground.
    ///
    /// The raster starts with unit resolution anchored at the origin; use
    /// [`BinaryRaster::with_georef`] to place it in map coordinates.
    ///
    /// # Errors
    /// Returns [`GeometryError::BufferLengthMismatch`] when
    /// `data.len() != width * height`.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> GeometryResult<Self> {
        let expected = width * height;
        if data.len() != expected {
            return Err(GeometryError::BufferLengthMismatch { expected, found: data.len() });
        }
        Ok(Self { width, height, resolution: 1.0, origin_x: 0.0, origin_y: 0.0, data })
    }

    /// Build a raster by evaluating `f(col, row)` for every pixel.
    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> bool) -> Self {
        let mut data = vec![0u8; width * height];
        for row in 0..height {
            for col in 0..width {
                data[row * width + col] = u8::from(f(col, row));
            }
        }
        Self { width, height, resolution: 1.0, origin_x: 0.0, origin_y: 0.0, data }
    }

    pub fn with_georef(
        mut self, origin_x: f64, origin_y: f64, resolution: f64,
    ) -> GeometryResult<Self> {
        if !resolution.is_finite() || resolution <= 0.0 {
            return Err(GeometryError::InvalidResolution { value: resolution });
        }
        if !origin_x.is_finite() || !origin_y.is_finite() {
            return Err(GeometryError::InvalidOrigin { x: origin_x, y: origin_y });
        }
        self.origin_x = origin_x;
        self.origin_y = origin_y;
        self.resolution = resolution;
        Ok(self)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn origin(&self) -> (f64, f64) {
        (self.origin_x, self.origin_y)
    }

    #[inline]
    pub fn is_set(&self, col: usize, row: usize) -> bool {
        self.data[row * self.width + col] != 0
    }

    #[inline]
    pub fn row(&self, row: usize) -> &[u8] {
        let start = row * self.width;
        &self.data[start..start + self.width]
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Foreground pixel coordinates in row-major order.
    pub fn foreground_pixels(&self) -> Vec<(u32, u32)> {
        let mut out = Vec::new();
        for row in 0..self.height {
            for (col, &v) in self.row(row).iter().enumerate() {
                if v != 0 {
                    out.push((col as u32, row as u32));
                }
            }
        }
        out
    }

    /// Map-space centre of pixel `(col, row)`.
    #[inline]
    pub fn pixel_center(&self, col: usize, row: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.resolution,
            self.origin_y + (row as f64 + 0.5) * self.resolution,
        )
    }

    /// Extent of the whole raster.
    pub fn envelope(&self) -> Envelope {
        Envelope::new(
            self.origin_x,
            self.origin_y,
            self.origin_x + self.width as f64 * self.resolution,
            self.origin_y + self.height as f64 * self.resolution,
        )
    }

    /// Tight extent of the foreground pixels, `None` when the raster is
    /// empty.
    pub fn foreground_envelope(&self) -> Option<Envelope> {
        let (mut c0, mut r0, mut c1, mut r1) = (usize::MAX, usize::MAX, 0usize, 0usize);
        let mut any = false;
        for row in 0..self.height {
            let cols = self.row(row);
            let Some(first) = cols.iter().position(|&v| v != 0) else {
                continue;
            };
            let last = cols.iter().rposition(|&v| v != 0).unwrap_or(first);
            any = true;
            c0 = c0.min(first);
            c1 = c1.max(last);
            r0 = r0.min(row);
            r1 = r1.max(row);
        }
        if !any {
            return None;
        }
        let res = self.resolution;
        Some(Envelope::new(
            self.origin_x + c0 as f64 * res,
            self.origin_y + r0 as f64 * res,
            self.origin_x + (c1 + 1) as f64 * res,
            self.origin_y + (r1 + 1) as f64 * res,
        ))
    }

    pub fn summed_area_table(&self) -> SummedAreaTable {
        SummedAreaTable::new(self)
    }
}

/// Inclusive prefix sums of foreground pixels, padded with a zero row and
/// column so that window queries need no branches.
#[derive(Debug, Clone)]
pub struct SummedAreaTable {
    width: usize,
    height: usize,
    sums: Vec<u64>,
}

impl SummedAreaTable {
    pub fn new(raster: &BinaryRaster) -> Self {
        let (w, h) = (raster.width(), raster.height());
        let stride = w + 1;
        let mut sums = vec![0u64; stride * (h + 1)];
        for row in 0..h {
            let mut run = 0u64;
            for (col, &v) in raster.row(row).iter().enumerate() {
                run += u64::from(v != 0);
                sums[(row + 1) * stride + col + 1] = sums[row * stride + col + 1] + run;
            }
        }
        Self { width: w, height: h, sums }
    }

    /// Foreground count inside the square window of half-side `radius`
    /// pixels centred on `(col, row)`, clipped to the raster.
    pub fn window_count(&self, col: usize, row: usize, radius: usize) -> u64 {
        let c0 = col.saturating_sub(radius);
        let r0 = row.saturating_sub(radius);
        let c1 = (col + radius + 1).min(self.width);
        let r1 = (row + radius + 1).min(self.height);
        self.rect_count(c0, r0, c1, r1)
    }

    /// Foreground count in the half-open pixel rectangle
    /// `[c0, c1) x [r0, r1)`.
    pub fn rect_count(&self, c0: usize, r0: usize, c1: usize, r1: usize) -> u64 {
        if c0 >= c1 || r0 >= r1 {
            return 0;
        }
        let stride = self.width + 1;
        let a = self.sums[r1 * stride + c1];
        let b = self.sums[r0 * stride + c1];
        let c = self.sums[r1 * stride + c0];
        let d = self.sums[r0 * stride + c0];
        a + d - b - c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross() -> BinaryRaster {
        // 5x5 raster with a plus sign through the centre.
        BinaryRaster::from_fn(5, 5, |c, r| c == 2 || r == 2)
    }

    #[test]
    // Purpose
    // -------
    // Buffers whose length disagrees with the dimensions are rejected.
    fn binary_raster_new_rejects_wrong_length() {
        let err = BinaryRaster::new(3, 3, vec![0; 8]).unwrap_err();
        assert_eq!(err, GeometryError::BufferLengthMismatch { expected: 9, found: 8 });
    }

    #[test]
    // Purpose
    // -------
    // The foreground envelope hugs the set pixels and honours the
    // georeference.
    //
    // Given
    // -----
    // - A 10x10 raster with pixels (2..=4, 3..=5) set, resolution 2,
    //   origin (100, 200).
    //
    // Expect
    // ------
    // - Envelope [104, 110] x [206, 212].
    fn foreground_envelope_is_tight() {
        // Arrange
        let raster = BinaryRaster::from_fn(10, 10, |c, r| (2..=4).contains(&c) && (3..=5).contains(&r))
            .with_georef(100.0, 200.0, 2.0)
            .expect("valid georef");

        // Act
        let env = raster.foreground_envelope().expect("raster is not empty");

        // Assert
        assert_eq!(env, Envelope::new(104.0, 206.0, 110.0, 212.0));
        assert_eq!(raster.foreground_count(), 9);
    }

    #[test]
    // Purpose
    // -------
    // Window counts agree with a brute-force count, including clipping at
    // the raster border.
    fn summed_area_table_window_counts_match_brute_force() {
        // Arrange
        let raster = cross();
        let sat = raster.summed_area_table();

        // Act / Assert
        for row in 0..5usize {
            for col in 0..5usize {
                for radius in 0..4usize {
                    let mut brute = 0u64;
                    for r in row.saturating_sub(radius)..(row + radius + 1).min(5) {
                        for c in col.saturating_sub(radius)..(col + radius + 1).min(5) {
                            brute += u64::from(raster.is_set(c, r));
                        }
                    }
                    assert_eq!(sat.window_count(col, row, radius), brute);
                }
            }
        }
    }
}

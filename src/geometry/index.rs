//! Uniform bucket grid over feature envelopes.
//!
//! Features are registered in every bucket their envelope overlaps. A query
//! returns the sorted, de-duplicated indices of features whose envelope
//! intersects the query envelope, which is the candidate set for exact
//! intersection tests.
use super::{envelope::Envelope, vector::FeatureSet};

/// Target number of features per bucket when sizing the grid.
const FEATURES_PER_BUCKET: f64 = 4.0;
/// Upper bound on buckets per side.
const MAX_BUCKETS_PER_SIDE: usize = 1024;

#[derive(Debug, Clone)]
pub struct EnvelopeIndex {
    bounds: Envelope,
    cols: usize,
    rows: usize,
    cell_w: f64,
    cell_h: f64,
    buckets: Vec<Vec<u32>>,
    envelopes: Vec<Envelope>,
}

impl EnvelopeIndex {
    pub fn build<F: FeatureSet + ?Sized>(set: &F) -> Self {
        let envelopes: Vec<Envelope> = (0..set.len()).map(|i| set.feature_envelope(i)).collect();
        let bounds = envelopes
            .iter()
            .copied()
            .reduce(|acc, env| acc.union(&env))
            .unwrap_or(Envelope::from_point(0.0, 0.0));

        let side = ((envelopes.len() as f64 / FEATURES_PER_BUCKET).sqrt().ceil() as usize)
            .clamp(1, MAX_BUCKETS_PER_SIDE);
        let (cols, rows) = (side, side);
        let cell_w = (bounds.width() / cols as f64).max(f64::MIN_POSITIVE);
        let cell_h = (bounds.height() / rows as f64).max(f64::MIN_POSITIVE);

        let mut index =
            Self { bounds, cols, rows, cell_w, cell_h, buckets: vec![Vec::new(); cols * rows], envelopes };
        for i in 0..index.envelopes.len() {
            let (c0, r0, c1, r1) = index.bucket_span(&index.envelopes[i]);
            for r in r0..=r1 {
                for c in c0..=c1 {
                    index.buckets[r * cols + c].push(i as u32);
                }
            }
        }
        index
    }

    pub fn len(&self) -> usize {
        self.envelopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.envelopes.is_empty()
    }

    pub fn bounds(&self) -> Envelope {
        self.bounds
    }

    pub fn envelope_of(&self, index: usize) -> &Envelope {
        &self.envelopes[index]
    }

    fn bucket_of(&self, v: f64, origin: f64, size: f64, n: usize) -> usize {
        let k = ((v - origin) / size).floor();
        if k <= 0.0 { 0 } else { (k as usize).min(n - 1) }
    }

    fn bucket_span(&self, env: &Envelope) -> (usize, usize, usize, usize) {
        (
            self.bucket_of(env.min_x, self.bounds.min_x, self.cell_w, self.cols),
            self.bucket_of(env.min_y, self.bounds.min_y, self.cell_h, self.rows),
            self.bucket_of(env.max_x, self.bounds.min_x, self.cell_w, self.cols),
            self.bucket_of(env.max_y, self.bounds.min_y, self.cell_h, self.rows),
        )
    }

    /// Indices of features whose envelope intersects `query`, ascending.
    pub fn query(&self, query: &Envelope) -> Vec<usize> {
        let mut out = Vec::new();
        self.query_into(query, &mut out);
        out
    }

    /// Same as [`EnvelopeIndex::query`], reusing `out` as scratch space.
    pub fn query_into(&self, query: &Envelope, out: &mut Vec<usize>) {
        out.clear();
        if self.envelopes.is_empty() || !self.bounds.intersects(query) {
            return;
        }
        let (c0, r0, c1, r1) = self.bucket_span(query);
        for r in r0..=r1 {
            for c in c0..=c1 {
                for &i in &self.buckets[r * self.cols + c] {
                    let i = i as usize;
                    if self.envelopes[i].intersects(query) {
                        out.push(i);
                    }
                }
            }
        }
        out.sort_unstable();
        out.dedup();
    }
}

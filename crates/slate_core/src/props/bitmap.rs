//! Compressed bitmap storage for prop outcomes.
//!
//! Each prop holds one bit per simulation run: "did the threshold hit in
//! run i". Bits are packed eight per byte (run i lives at byte `i / 8`,
//! bit `i % 8`) and the packed buffer is LZ4-compressed at rest; reads
//! decompress on demand. Joint queries AND the raw byte buffers and count
//! population, which keeps pair queries cheap even over millions of runs.
//!
//! Every prop in one store shares the same `num_sims`; buffers written with
//! one length are never read back with another.

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

#[derive(Debug, Clone)]
pub struct PropBitmap {
    num_sims: usize,
    props: FxHashMap<String, Vec<u8>>,
}

/// One prop's packed, compressed buffer, ready for the external cache
/// collaborator. The core attaches the bit count and nothing else; key
/// prefixes, TTLs, and chunking are the collaborator's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropBufferExport {
    pub name: String,
    pub num_sims: usize,
    pub data: Vec<u8>,
}

impl PropBitmap {
    pub fn new(num_sims: usize) -> Self {
        Self { num_sims, props: FxHashMap::default() }
    }

    pub fn num_sims(&self) -> usize {
        self.num_sims
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }

    /// Prop names in sorted order, for deterministic reporting.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.props.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Pack and store one prop's per-run results. The vector length must
    /// match the store's `num_sims`; on mismatch the store is unmodified.
    pub fn add_prop(&mut self, name: impl Into<String>, results: &[bool]) -> Result<()> {
        if results.len() != self.num_sims {
            return Err(SimError::LengthMismatch {
                expected: self.num_sims,
                got: results.len(),
            });
        }
        let mut packed = vec![0u8; (self.num_sims + 7) / 8];
        for (i, &hit) in results.iter().enumerate() {
            if hit {
                packed[i / 8] |= 1 << (i % 8);
            }
        }
        let compressed = lz4_flex::compress_prepend_size(&packed);
        self.props.insert(name.into(), compressed);
        Ok(())
    }

    fn unpack(&self, name: &str) -> Result<Vec<u8>> {
        let compressed = self
            .props
            .get(name)
            .ok_or_else(|| SimError::UnknownProp(name.to_string()))?;
        let packed = lz4_flex::decompress_size_prepended(compressed).map_err(|e| {
            SimError::CorruptedBuffer { name: name.to_string(), reason: e.to_string() }
        })?;
        if packed.len() != (self.num_sims + 7) / 8 {
            return Err(SimError::CorruptedBuffer {
                name: name.to_string(),
                reason: format!("expected {} bytes, got {}", (self.num_sims + 7) / 8, packed.len()),
            });
        }
        Ok(packed)
    }

    /// Fraction of runs in which the prop hit.
    pub fn probability(&self, name: &str) -> Result<f64> {
        let packed = self.unpack(name)?;
        Ok(popcount(&packed) as f64 / self.num_sims as f64)
    }

    /// Fraction of runs in which both props hit: popcount of the AND.
    pub fn joint_probability(&self, a: &str, b: &str) -> Result<f64> {
        let pa = self.unpack(a)?;
        let pb = self.unpack(b)?;
        let both: u32 = pa.iter().zip(&pb).map(|(x, y)| (x & y).count_ones()).sum();
        Ok(both as f64 / self.num_sims as f64)
    }

    /// Pearson correlation between two props, derived from the marginals and
    /// the joint probability. Returns 0 when either marginal has no
    /// variance.
    pub fn correlation(&self, a: &str, b: &str) -> Result<f64> {
        let p1 = self.probability(a)?;
        let p2 = self.probability(b)?;
        let joint = self.joint_probability(a, b)?;

        let denominator = (p1 * (1.0 - p1) * p2 * (1.0 - p2)).sqrt();
        if denominator == 0.0 {
            return Ok(0.0);
        }
        Ok((joint - p1 * p2) / denominator)
    }

    /// The exact boolean vector that was stored.
    pub fn results_for(&self, name: &str) -> Result<Vec<bool>> {
        let packed = self.unpack(name)?;
        Ok((0..self.num_sims)
            .map(|i| packed[i / 8] & (1 << (i % 8)) != 0)
            .collect())
    }

    /// Plain-data handoff for persistence: every prop's compressed buffer
    /// with its bit count, sorted by name.
    pub fn export(&self) -> Vec<PropBufferExport> {
        let mut out: Vec<PropBufferExport> = self
            .props
            .iter()
            .map(|(name, data)| PropBufferExport {
                name: name.clone(),
                num_sims: self.num_sims,
                data: data.clone(),
            })
            .collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    /// Rebuild a store from exported buffers (the read side of the
    /// persistence handoff). Buffers with a foreign `num_sims` are rejected.
    pub fn from_export(num_sims: usize, entries: Vec<PropBufferExport>) -> Result<Self> {
        let mut props = FxHashMap::default();
        for entry in entries {
            if entry.num_sims != num_sims {
                return Err(SimError::LengthMismatch {
                    expected: num_sims,
                    got: entry.num_sims,
                });
            }
            props.insert(entry.name, entry.data);
        }
        Ok(Self { num_sims, props })
    }
}

fn popcount(bytes: &[u8]) -> u32 {
    bytes.iter().map(|b| b.count_ones()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vector(n: usize, hits: impl Fn(usize) -> bool) -> Vec<bool> {
        (0..n).map(hits).collect()
    }

    #[test]
    fn length_mismatch_leaves_store_unmodified() {
        let mut store = PropBitmap::new(100);
        let err = store.add_prop("short", &vector(99, |_| true)).unwrap_err();
        assert_eq!(err, SimError::LengthMismatch { expected: 100, got: 99 });
        assert!(!store.contains("short"));
    }

    #[test]
    fn unknown_prop_is_an_error_not_a_crash() {
        let store = PropBitmap::new(10);
        assert!(matches!(store.probability("ghost"), Err(SimError::UnknownProp(_))));
        let mut populated = PropBitmap::new(10);
        populated.add_prop("real", &vector(10, |_| false)).unwrap();
        assert!(matches!(
            populated.joint_probability("real", "ghost"),
            Err(SimError::UnknownProp(_))
        ));
    }

    #[test]
    fn probability_counts_set_bits() {
        let mut store = PropBitmap::new(1000);
        store.add_prop("p", &vector(1000, |i| i < 300)).unwrap();
        assert!((store.probability("p").unwrap() - 0.3).abs() < 1e-12);
    }

    #[test]
    fn probability_is_idempotent() {
        let mut store = PropBitmap::new(777);
        store.add_prop("p", &vector(777, |i| i % 3 == 0)).unwrap();
        let a = store.probability("p").unwrap();
        let b = store.probability("p").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn joint_probability_of_a_prop_with_itself_is_its_probability() {
        let mut store = PropBitmap::new(512);
        store.add_prop("p", &vector(512, |i| i % 5 == 0)).unwrap();
        let p = store.probability("p").unwrap();
        let joint = store.joint_probability("p", "p").unwrap();
        assert_eq!(p, joint);
    }

    #[test]
    fn pack_unpack_round_trip_is_exact() {
        let original = vector(1013, |i| (i * 2654435761) % 7 < 3);
        let mut store = PropBitmap::new(1013);
        store.add_prop("p", &original).unwrap();
        assert_eq!(store.results_for("p").unwrap(), original);
    }

    #[test]
    fn correlation_matches_closed_form() {
        // A hits in 300 runs, B in 400, both in 120.
        let a = vector(1000, |i| i < 300);
        let b = vector(1000, |i| i < 120 || (300..580).contains(&i));
        let mut store = PropBitmap::new(1000);
        store.add_prop("a", &a).unwrap();
        store.add_prop("b", &b).unwrap();

        assert!((store.probability("a").unwrap() - 0.3).abs() < 1e-12);
        assert!((store.probability("b").unwrap() - 0.4).abs() < 1e-12);
        assert!((store.joint_probability("a", "b").unwrap() - 0.12).abs() < 1e-12);

        let expected = (0.12 - 0.3 * 0.4) / (0.3 * 0.7 * 0.4 * 0.6f64).sqrt();
        assert!((store.correlation("a", "b").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn correlation_with_zero_variance_is_zero() {
        let mut store = PropBitmap::new(64);
        store.add_prop("always", &vector(64, |_| true)).unwrap();
        store.add_prop("mixed", &vector(64, |i| i % 2 == 0)).unwrap();
        assert_eq!(store.correlation("always", "mixed").unwrap(), 0.0);
        assert_eq!(store.correlation("mixed", "always").unwrap(), 0.0);
    }

    #[test]
    fn export_round_trips_through_from_export() {
        let mut store = PropBitmap::new(256);
        store.add_prop("x", &vector(256, |i| i % 4 == 0)).unwrap();
        store.add_prop("y", &vector(256, |i| i % 9 == 0)).unwrap();

        let restored = PropBitmap::from_export(256, store.export()).unwrap();
        assert_eq!(restored.probability("x").unwrap(), store.probability("x").unwrap());
        assert_eq!(restored.results_for("y").unwrap(), store.results_for("y").unwrap());

        let err = PropBitmap::from_export(128, store.export()).unwrap_err();
        assert!(matches!(err, SimError::LengthMismatch { .. }));
    }

    #[test]
    fn export_is_sorted_by_name() {
        let mut store = PropBitmap::new(8);
        store.add_prop("zeta", &vector(8, |_| false)).unwrap();
        store.add_prop("alpha", &vector(8, |_| true)).unwrap();
        let exported = store.export();
        let names: Vec<&str> = exported.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }
}

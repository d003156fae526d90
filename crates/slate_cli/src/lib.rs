//! Prop cache files.
//!
//! PropBitmap export → MessagePack → LZ4 → SHA-256 checksum. The cache file
//! is the plain-data handoff to whatever key-value store sits downstream;
//! this crate knows nothing about TTLs or key layout.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use slate_core::{PropBitmap, PropBufferExport};

pub const CACHE_SCHEMA_VERSION: u32 = 1;

/// On-disk payload: the store's bit count plus every prop's compressed
/// buffer.
#[derive(Debug, Serialize, Deserialize)]
struct CachePayload {
    schema_version: u32,
    num_sims: usize,
    entries: Vec<PropBufferExport>,
}

/// Metadata written alongside the cache file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    pub schema_version: u32,
    /// SHA-256 of the compressed cache file, hex encoded.
    pub checksum: String,
    /// Creation time, RFC3339.
    pub created_at: String,
    pub num_sims: usize,
    pub num_props: usize,
    pub compressed_size: u64,
}

/// Write a prop store to a cache file and return its metadata.
pub fn write_prop_cache(store: &PropBitmap, output: &Path) -> Result<CacheMetadata> {
    let payload = CachePayload {
        schema_version: CACHE_SCHEMA_VERSION,
        num_sims: store.num_sims(),
        entries: store.export(),
    };
    let num_props = payload.entries.len();

    let msgpack_bytes =
        rmp_serde::to_vec(&payload).context("Failed to serialize prop cache to MessagePack")?;
    let compressed = lz4_flex::compress_prepend_size(&msgpack_bytes);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = format!("{:x}", hasher.finalize());

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output, &compressed)
        .with_context(|| format!("Failed to write cache file: {}", output.display()))?;

    Ok(CacheMetadata {
        schema_version: CACHE_SCHEMA_VERSION,
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        num_sims: payload.num_sims,
        num_props,
        compressed_size: compressed.len() as u64,
    })
}

/// Load a cache file back into a queryable store.
pub fn read_prop_cache(cache_file: &Path) -> Result<PropBitmap> {
    let compressed = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;
    let msgpack_bytes =
        lz4_flex::decompress_size_prepended(&compressed).context("Failed to decompress LZ4")?;
    let payload: CachePayload =
        rmp_serde::from_slice(&msgpack_bytes).context("Failed to deserialize MessagePack")?;

    if payload.schema_version != CACHE_SCHEMA_VERSION {
        bail!(
            "unsupported cache schema version {} (expected {})",
            payload.schema_version,
            CACHE_SCHEMA_VERSION
        );
    }

    PropBitmap::from_export(payload.num_sims, payload.entries)
        .context("Cache entries do not match the declared run count")
}

/// Check a cache file against its recorded checksum.
pub fn verify_cache(cache_file: &Path, expected_checksum: &str) -> Result<bool> {
    let bytes = fs::read(cache_file)
        .with_context(|| format!("Failed to read cache file: {}", cache_file.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let actual = format!("{:x}", hasher.finalize());
    Ok(actual == expected_checksum)
}

pub fn save_metadata(path: &Path, metadata: &CacheMetadata) -> Result<()> {
    let json = serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write metadata file: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store() -> PropBitmap {
        let mut store = PropBitmap::new(64);
        store
            .add_prop("player_hits_1_plus", &(0..64).map(|i| i % 2 == 0).collect::<Vec<_>>())
            .unwrap();
        store
            .add_prop("player_hits_2_plus", &(0..64).map(|i| i % 4 == 0).collect::<Vec<_>>())
            .unwrap();
        store
    }

    #[test]
    fn cache_round_trips_with_matching_checksum() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("props.cache");

        let original = store();
        let metadata = write_prop_cache(&original, &path)?;
        assert_eq!(metadata.num_props, 2);
        assert_eq!(metadata.num_sims, 64);
        assert!(verify_cache(&path, &metadata.checksum)?);

        let restored = read_prop_cache(&path)?;
        assert_eq!(restored.num_sims(), 64);
        assert_eq!(
            restored.probability("player_hits_1_plus")?,
            original.probability("player_hits_1_plus")?
        );
        assert_eq!(
            restored.results_for("player_hits_2_plus")?,
            original.results_for("player_hits_2_plus")?
        );
        Ok(())
    }

    #[test]
    fn tampered_cache_fails_verification() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("props.cache");
        let metadata = write_prop_cache(&store(), &path)?;

        let mut bytes = fs::read(&path)?;
        let last = bytes.len() - 1;
        bytes[last] ^= 0xFF;
        fs::write(&path, &bytes)?;

        assert!(!verify_cache(&path, &metadata.checksum)?);
        Ok(())
    }

    #[test]
    fn metadata_sidecar_is_valid_json() -> Result<()> {
        let dir = tempdir()?;
        let cache = dir.path().join("props.cache");
        let meta_path = dir.path().join("props.meta.json");

        let metadata = write_prop_cache(&store(), &cache)?;
        save_metadata(&meta_path, &metadata)?;

        let parsed: CacheMetadata = serde_json::from_str(&fs::read_to_string(&meta_path)?)?;
        assert_eq!(parsed.checksum, metadata.checksum);
        Ok(())
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::StaticCopyError;
use crate::hasher::SvgHashes;

/// Manifest file name inside the output root
pub const MANIFEST_FILE: &str = "svg-hashes.json";

/// Path of the manifest for an output root
pub fn manifest_path(output_root: &Path) -> PathBuf {
    output_root.join(MANIFEST_FILE)
}

/// Write the hashes as two-space indented JSON, replacing any previous manifest
pub fn write_manifest(output_root: &Path, hashes: &SvgHashes) -> Result<PathBuf, StaticCopyError> {
    let path = manifest_path(output_root);
    let json = serde_json::to_string_pretty(hashes)?;

    fs::write(&path, json).map_err(|e| StaticCopyError::ManifestWriteFailed {
        path: path.clone(),
        source: e,
    })?;

    Ok(path)
}

/// Read a previously written manifest
pub fn read_manifest(output_root: &Path) -> Result<SvgHashes, StaticCopyError> {
    let path = manifest_path(output_root);
    let content = fs::read_to_string(&path).map_err(|e| StaticCopyError::ReadFailed {
        path: path.clone(),
        source: e,
    })?;
    Ok(serde_json::from_str(&content)?)
}

//! Short content hashes for icon SVGs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::error::StaticCopyError;

/// Number of hex characters kept from the digest
pub const HASH_LEN: usize = 8;

/// Whether a file name marks an icon SVG (case-sensitive)
#[inline]
pub fn is_icon_svg(file_name: &str) -> bool {
    file_name.contains("icon") && file_name.ends_with(".svg")
}

/// First 8 hex characters of the MD5 digest of `content`
pub fn short_hash(content: &str) -> String {
    let digest = Md5::digest(content.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_LEN);
    hex
}

/// Hash a file read as UTF-8 text.
///
/// Invalid byte sequences are replaced with U+FFFD before hashing.
pub fn hash_file(path: &Path) -> Result<String, StaticCopyError> {
    let bytes = fs::read(path).map_err(|e| StaticCopyError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(short_hash(&String::from_utf8_lossy(&bytes)))
}

/// App directory name to icon hash, serialized with sorted keys
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SvgHashes(BTreeMap<String, String>);

impl SvgHashes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hash, replacing any earlier one for the same app
    pub fn insert(&mut self, app_dir_name: impl Into<String>, hash: impl Into<String>) {
        self.0.insert(app_dir_name.into(), hash.into());
    }

    pub fn get(&self, app_dir_name: &str) -> Option<&str> {
        self.0.get(app_dir_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

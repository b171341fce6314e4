//! Sharpness result cache.
//!
//! Keyed by the SHA-256 of the photo file bytes so a renamed file still
//! hits, and a retaken photo under the same name does not.

use super::SharpnessResult;
use crate::error::Result;
use crate::scanner::ImageInfo;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const CACHE_FILE_NAME: &str = ".sharpness-cache.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheFile {
    /// Version for compatibility checks.
    version: u32,
    /// File hash -> cached verdict.
    entries: HashMap<String, CacheEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub file_name: String,
    pub file_size: u64,
    pub result: SharpnessResult,
}

impl CacheFile {
    const CURRENT_VERSION: u32 = 1;

    pub fn cache_path(folder: &Path) -> PathBuf {
        folder.join(CACHE_FILE_NAME)
    }

    /// Loads the cache for a folder, falling back to empty on any problem.
    pub fn load(folder: &Path) -> Self {
        let cache_path = Self::cache_path(folder);
        if !cache_path.exists() {
            return Self::default();
        }

        let file = match File::open(&cache_path) {
            Ok(f) => f,
            Err(_) => return Self::default(),
        };

        let reader = BufReader::new(file);
        match serde_json::from_reader::<_, CacheFile>(reader) {
            Ok(cache) if cache.version == Self::CURRENT_VERSION => cache,
            Ok(_) => {
                eprintln!("Cache version mismatch, rebuilding");
                Self::default()
            }
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self, folder: &Path) -> Result<()> {
        let file = File::create(Self::cache_path(folder))?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deletes the cache file. Returns whether one existed.
    pub fn clear(folder: &Path) -> Result<bool> {
        let cache_path = Self::cache_path(folder);
        if cache_path.exists() {
            std::fs::remove_file(cache_path)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn get(&self, hash: &str) -> Option<&SharpnessResult> {
        self.entries.get(hash).map(|e| &e.result)
    }

    pub fn insert(&mut self, hash: String, file_name: String, file_size: u64, result: SharpnessResult) {
        self.entries.insert(
            hash,
            CacheEntry {
                file_name,
                file_size,
                result,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for CacheFile {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// SHA-256 of the file contents, hex-encoded.
pub fn compute_file_hash(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hex::encode(hasher.finalize()))
}

/// Splits a photo list into cached verdicts and photos still to analyze.
///
/// Photos whose hash cannot be computed are treated as uncached.
pub fn partition_cached(
    images: &[ImageInfo],
    cache: &CacheFile,
) -> (Vec<(String, SharpnessResult)>, Vec<(ImageInfo, String)>) {
    let mut cached = Vec::new();
    let mut uncached = Vec::new();

    for img in images {
        let hash = match compute_file_hash(&img.path) {
            Ok(h) => h,
            Err(_) => {
                uncached.push((img.clone(), String::new()));
                continue;
            }
        };

        if let Some(result) = cache.get(&hash) {
            cached.push((img.file_name.clone(), result.clone()));
        } else {
            uncached.push((img.clone(), hash));
        }
    }

    (cached, uncached)
}

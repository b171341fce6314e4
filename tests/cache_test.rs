use claim_report_rust::scanner;
use claim_report_rust::sharpness::cache::{compute_file_hash, partition_cached, CacheFile};
use claim_report_rust::sharpness::SharpnessResult;
use std::fs;
use tempfile::tempdir;

fn verdict(score: u8) -> SharpnessResult {
    SharpnessResult {
        is_blurry: score < 50,
        score,
        message: "test".to_string(),
    }
}

#[test]
fn test_cache_roundtrip() {
    let dir = tempdir().unwrap();

    let mut cache = CacheFile::default();
    assert!(cache.is_empty());

    cache.insert("hash1".to_string(), "a.jpg".to_string(), 1234, verdict(90));
    cache.insert("hash2".to_string(), "b.jpg".to_string(), 5678, verdict(20));
    cache.save(dir.path()).unwrap();

    assert!(CacheFile::cache_path(dir.path()).exists());

    let loaded = CacheFile::load(dir.path());
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded.get("hash1").unwrap().score, 90);
    assert!(loaded.get("hash2").unwrap().is_blurry);
    assert!(loaded.get("hash3").is_none());
}

#[test]
fn test_cache_load_missing_is_empty() {
    let dir = tempdir().unwrap();
    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

#[test]
fn test_cache_load_corrupt_is_empty() {
    let dir = tempdir().unwrap();
    fs::write(CacheFile::cache_path(dir.path()), "{ not json").unwrap();

    let cache = CacheFile::load(dir.path());
    assert!(cache.is_empty());
}

#[test]
fn test_cache_clear() {
    let dir = tempdir().unwrap();

    assert!(!CacheFile::clear(dir.path()).unwrap());

    CacheFile::default().save(dir.path()).unwrap();
    assert!(CacheFile::clear(dir.path()).unwrap());
    assert!(!CacheFile::cache_path(dir.path()).exists());
}

#[test]
fn test_hash_tracks_content_not_name() {
    let dir = tempdir().unwrap();

    let a = dir.path().join("a.jpg");
    let b = dir.path().join("b.jpg");
    fs::write(&a, b"same bytes").unwrap();
    fs::write(&b, b"same bytes").unwrap();

    let hash_a = compute_file_hash(&a).unwrap();
    let hash_b = compute_file_hash(&b).unwrap();
    assert_eq!(hash_a, hash_b);

    fs::write(&b, b"different bytes").unwrap();
    assert_ne!(hash_a, compute_file_hash(&b).unwrap());
}

#[test]
fn test_partition_cached_splits_hits_and_misses() {
    let dir = tempdir().unwrap();

    let cached_path = dir.path().join("cached.jpg");
    let fresh_path = dir.path().join("fresh.jpg");
    fs::write(&cached_path, b"cached photo").unwrap();
    fs::write(&fresh_path, b"fresh photo").unwrap();

    let mut cache = CacheFile::default();
    let cached_hash = compute_file_hash(&cached_path).unwrap();
    cache.insert(cached_hash, "cached.jpg".to_string(), 12, verdict(80));

    let images = scanner::scan_folder(dir.path()).unwrap();
    assert_eq!(images.len(), 2);

    let (hits, misses) = partition_cached(&images, &cache);

    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].0, "cached.jpg");
    assert_eq!(hits[0].1.score, 80);

    assert_eq!(misses.len(), 1);
    assert_eq!(misses[0].0.file_name, "fresh.jpg");
    assert_eq!(misses[0].1, compute_file_hash(&fresh_path).unwrap());
}

#[test]
fn test_retaken_photo_misses_cache() {
    let dir = tempdir().unwrap();

    let path = dir.path().join("front.jpg");
    fs::write(&path, b"first shot").unwrap();

    let mut cache = CacheFile::default();
    cache.insert(
        compute_file_hash(&path).unwrap(),
        "front.jpg".to_string(),
        10,
        verdict(30),
    );

    // Same name, new content.
    fs::write(&path, b"retaken shot").unwrap();

    let images = scanner::scan_folder(dir.path()).unwrap();
    let (hits, misses) = partition_cached(&images, &cache);
    assert!(hits.is_empty());
    assert_eq!(misses.len(), 1);
}

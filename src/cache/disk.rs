//! Disk Persistence Module
//!
//! One JSON file per key under the cache directory. Every function here
//! reports errors; the store decides to swallow them.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::cache::CacheEntry;
use crate::error::PersistError;

type Result<T> = std::result::Result<T, PersistError>;

const EXTENSION: &str = "json";
const TEMP_EXTENSION: &str = "tmp";

/// File layout: the entry's fields plus the key that wrote it.
///
/// Sanitization is lossy, so the key is what tells two keys sharing a file apart.
#[derive(Serialize)]
struct RecordRef<'a> {
    key: &'a str,
    #[serde(flatten)]
    entry: &'a CacheEntry,
}

#[derive(Deserialize)]
struct Record {
    #[serde(default)]
    key: Option<String>,
    #[serde(flatten)]
    entry: CacheEntry,
}

// == Key Sanitization ==
/// Maps a cache key onto a safe file stem.
///
/// `:` and `|` become `-`; anything else outside `[A-Za-z0-9._-]` becomes `_`.
pub fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            ':' | '|' => '-',
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => c,
            _ => '_',
        })
        .collect()
}

/// Path of the file backing `key`.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    dir.join(format!("{}.{}", sanitize_key(key), EXTENSION))
}

// == Read ==
/// Reads the entry for `key`.
///
/// `Ok(None)` when no file exists or the file was written for a different key
/// that sanitizes to the same name. Files without a recorded key are trusted.
pub fn read_entry(dir: &Path, key: &str) -> Result<Option<CacheEntry>> {
    let path = entry_path(dir, key);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let record: Record = serde_json::from_str(&contents)?;
    match record.key {
        Some(owner) if owner != key => Ok(None),
        _ => Ok(Some(record.entry)),
    }
}

// == Write ==
/// Writes the entry for `key`, creating the directory if needed.
///
/// Goes through a temp file and a rename so readers never see half a file.
/// The temp file is removed again if any step fails.
pub fn write_entry(dir: &Path, key: &str, entry: &CacheEntry) -> Result<()> {
    fs::create_dir_all(dir)?;

    let path = entry_path(dir, key);
    let json = serde_json::to_vec(&RecordRef { key, entry })?;

    let temp_path = path.with_extension(TEMP_EXTENSION);
    let written = write_then_rename(&temp_path, &path, &json);
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_then_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(temp_path, path)?;
    Ok(())
}

// == Remove ==
/// Deletes the file for `key`; a missing file is not an error.
pub fn remove_entry(dir: &Path, key: &str) -> Result<()> {
    match fs::remove_file(entry_path(dir, key)) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

// == Clear ==
/// Deletes every cache file in `dir`. Returns how many were removed.
///
/// A missing directory counts as already clear.
pub fn clear_dir(dir: &Path) -> Result<usize> {
    remove_files_where(dir, |_| true)
}

// == Sweep ==
/// Deletes cache files whose modification time is older than `ttl`.
///
/// File age stands in for entry age here; the serialized timestamp is not read.
pub fn sweep_stale(dir: &Path, ttl: Duration) -> Result<usize> {
    let now = SystemTime::now();
    remove_files_where(dir, |path| {
        fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .and_then(|modified| now.duration_since(modified).ok())
            .is_some_and(|age| age > ttl)
    })
}

fn remove_files_where(dir: &Path, mut pred: impl FnMut(&Path) -> bool) -> Result<usize> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    let mut removed = 0;
    for entry in entries {
        let path = entry?.path();
        if !is_cache_file(&path) || !pred(&path) {
            continue;
        }
        match fs::remove_file(&path) {
            Ok(()) => removed += 1,
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(removed)
}

fn is_cache_file(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == EXTENSION)
}

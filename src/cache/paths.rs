// Cache path utilities.
// Maps cache keys to record files under the build root and back.

use std::path::{Path, PathBuf};

use super::key::CacheKey;

/// Directory holding durable cache records, relative to the build root.
pub const CACHE_DIR_NAME: &str = ".github-card-cache";

const RECORD_EXTENSION: &str = "json";

/// Path to the cache directory for a build root.
pub fn cache_dir(root: &Path) -> PathBuf {
    root.join(CACHE_DIR_NAME)
}

/// Path to the record file for a key.
pub fn record_path(dir: &Path, key: &CacheKey) -> PathBuf {
    dir.join(format!("{}.{}", encode_key(key.as_str()), RECORD_EXTENSION))
}

/// Recover the key from a record file path, if it is one.
pub fn key_from_path(path: &Path) -> Option<CacheKey> {
    if path.extension()? != RECORD_EXTENSION {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    decode_key(stem).map(CacheKey::from)
}

/// Percent-encode every byte outside `[A-Za-z0-9._-]`.
/// `%` is itself encoded, so distinct keys never share a filename.
pub fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'_' | b'-' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Inverse of [`encode_key`]. Returns `None` for names it could not have produced.
pub fn decode_key(name: &str) -> Option<String> {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let hex = name.get(i + 1..i + 3)?;
                if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                    return None;
                }
                out.push(u8::from_str_radix(hex, 16).ok()?);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8(out).ok()
}

//! `file://` URI helpers for the workspace root sent in `initialize`.

use serde_json::Value;
use std::path::PathBuf;

/// Decode `%XX` escapes in the path of a client-supplied URI.
///
/// Editors escape spaces, `#`, non-ASCII bytes and (VS Code) the drive colon. Malformed escapes
/// are kept verbatim; invalid UTF-8 is replaced.
pub fn percent_decode_path(path: &str) -> String {
    let mut out = Vec::with_capacity(path.len());
    let mut rest = path.as_bytes();
    while let Some((&b, tail)) = rest.split_first() {
        let escaped = tail
            .get(..2)
            .filter(|_| b == b'%')
            .filter(|hex| hex.iter().all(u8::is_ascii_hexdigit))
            .and_then(|hex| std::str::from_utf8(hex).ok())
            .and_then(|hex| u8::from_str_radix(hex, 16).ok());
        match escaped {
            Some(byte) => {
                out.push(byte);
                rest = &tail[2..];
            }
            None => {
                out.push(b);
                rest = tail;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Convert a `file://` URI from the client into a local path.
///
/// Only local URIs (empty or `localhost` authority) map to a path; other schemes and remote
/// hosts yield `None`.
pub fn file_uri_to_path(uri: &str) -> Option<PathBuf> {
    let rest = uri.strip_prefix("file://")?;
    let (authority, path) = match rest.find('/') {
        Some(slash) => rest.split_at(slash),
        None => (rest, ""),
    };
    if !(authority.is_empty() || authority.eq_ignore_ascii_case("localhost")) || path.is_empty() {
        return None;
    }

    let path = percent_decode_path(path);
    if cfg!(windows) {
        // `/c:/Users/..` -> `c:\Users\..`
        let path = match path.as_bytes() {
            [b'/', drive, b':', ..] if drive.is_ascii_alphabetic() => &path[1..],
            _ => path.as_str(),
        };
        return Some(PathBuf::from(path.replace('/', "\\")));
    }
    Some(PathBuf::from(path))
}

/// Pick the workspace root from `initialize` params.
///
/// Prefers the first workspace folder, then `rootUri`, then the deprecated `rootPath`.
pub fn workspace_root(params: &Value) -> Option<PathBuf> {
    let folder_uri = params
        .get("workspaceFolders")
        .and_then(Value::as_array)
        .and_then(|folders| folders.first())
        .and_then(|folder| folder.get("uri"))
        .and_then(Value::as_str);

    if let Some(path) = folder_uri.and_then(file_uri_to_path) {
        return Some(path);
    }
    if let Some(path) = params
        .get("rootUri")
        .and_then(Value::as_str)
        .and_then(file_uri_to_path)
    {
        return Some(path);
    }
    params
        .get("rootPath")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

//! Local filename derivation for saved responses.
//!
//! Builds a filesystem-safe name from the requested URL and the content
//! type reported by the relay: host (port folded in with `_`), last path
//! segment, a short hash of the query, a sniffed extension, and an epoch
//! timestamp to avoid collisions.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{SystemTime, UNIX_EPOCH};

use url::Url;

/// Derive a filename for the body fetched from `url`.
pub fn derive(url: &str, content_type: &str) -> String {
    let mut base = String::new();
    let mut query_hash = None;

    if let Ok(parsed) = Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            base.push_str(host);
        }
        if let Some(port) = parsed.port() {
            base.push('_');
            base.push_str(&port.to_string());
        }
        if let Some(last) = parsed
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        {
            if !base.is_empty() {
                base.push('_');
            }
            base.push_str(last);
        }
        if let Some(query) = parsed.query() {
            query_hash = Some(short_hash(query));
        }
    }
    if base.is_empty() {
        base.push_str("page");
    }
    if let Some(hash) = query_hash {
        base.push('_');
        base.push_str(&hash);
    }

    let name = format!(
        "{base}_{ts}{ext}",
        ts = timestamp(),
        ext = extension_for(content_type)
    );
    sanitize(&name)
}

fn extension_for(content_type: &str) -> &'static str {
    let ctype = content_type.to_ascii_lowercase();
    if ctype.contains("html") {
        ".html"
    } else if ctype.contains("json") {
        ".json"
    } else if ctype.contains("xml") {
        ".xml"
    } else if ctype.contains("javascript") {
        ".js"
    } else if ctype.contains("plain") || ctype.contains("text") {
        ".txt"
    } else {
        ".bin"
    }
}

fn short_hash(query: &str) -> String {
    let mut hasher = DefaultHasher::new();
    query.hash(&mut hasher);
    format!("{:08x}", hasher.finish() & 0xffff_ffff)
}

fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect()
}

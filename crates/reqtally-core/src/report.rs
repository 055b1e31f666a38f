//! Bounded text report over the counter index.
//!
//! One line per distinct client, ascending key order, dotted-decimal
//! rendering of the key. The buffer is capped: a line that would push the
//! output past `max_bytes` stops the walk, and everything after it is
//! silently dropped. The returned string's length is the number of bytes
//! actually written; callers must use that, never an allocated capacity,
//! when declaring content length.

use std::fmt::Write;
use std::net::Ipv4Addr;

/// Render `(key, count)` pairs into the bounded report body.
pub fn render_report(entries: impl Iterator<Item = (u32, u64)>, max_bytes: usize) -> String {
    let mut out = String::new();
    let mut line = String::new();
    for (key, count) in entries {
        line.clear();
        let _ = write!(line, "req from: {}, count: {}<br/>", Ipv4Addr::from(key), count);
        if out.len() + line.len() > max_bytes {
            break;
        }
        out.push_str(&line);
    }
    out
}

use std::fmt::Write;

use crate::feed::Entry;

const FRAME_WIDTH: usize = 50;

/// Human-readable listing of the whole store, framed by `=` rules.
pub fn render_dump(entries: &[Entry]) -> String {
    let rule = "=".repeat(FRAME_WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "====== The DATABASE");
    for entry in entries {
        let _ = writeln!(out, "==== Distro: {}", entry.title);
        let _ = writeln!(out, "== Link: {}", entry.link);
        let _ = writeln!(out, "== Summary: {}", entry.summary);
    }
    let _ = writeln!(out, "{}", rule);

    out
}

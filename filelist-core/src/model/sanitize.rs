//! `src/model/sanitize.rs`
//!
//! Display names shown in the table. Pure function of the raw name and two
//! flags; the catalog calls it once per kept record.

use compact_str::CompactString;

use crate::model::entry::PARENT_ALIAS;

/// Longest display name, in characters.
pub const MAX_PATH: usize = 260;

/// Display name of the parent alias.
pub const PARENT_DISPLAY: &str = "/..";

/// Sanitized display name for `raw`.
///
/// Only the final path segment is shown. Directories get a `/` prefix and
/// keep their name whole; files are split at the last dot so that
/// `strip_names` only rewrites the base name.
#[must_use]
pub fn display_name(raw: &str, is_dir: bool, strip_names: bool) -> CompactString {
    if raw == PARENT_ALIAS {
        return CompactString::const_new(PARENT_DISPLAY);
    }

    let segment = final_segment(raw);
    let (base, ext) = if is_dir {
        (segment, "")
    } else {
        split_extension(segment)
    };

    let mut out = CompactString::default();
    if is_dir {
        out.push('/');
    }

    if strip_names && !is_dir {
        push_printable(&mut out, &strip(base));
    } else {
        push_printable(&mut out, base);
    }
    push_printable(&mut out, ext);

    if out.len() > MAX_PATH {
        // all ASCII after push_printable
        out.truncate(MAX_PATH);
    }
    out
}

fn final_segment(raw: &str) -> &str {
    let trimmed = raw.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(trimmed)
}

/// `("demo", ".mvd")`. A lone trailing dot or a leading dot is not an
/// extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot + 1 < name.len() => name.split_at(dot),
        _ => (name, ""),
    }
}

/// Underscores become spaces, runs of spaces collapse, ends are trimmed.
fn strip(base: &str) -> String {
    let mut out = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c == '_' { ' ' } else { c };
        if c == ' ' && out.ends_with(' ') {
            continue;
        }
        out.push(c);
    }

    let trimmed = out.trim_matches(' ');
    if trimmed.is_empty() {
        "_".to_string()
    } else {
        trimmed.to_string()
    }
}

fn push_printable(out: &mut CompactString, s: &str) {
    out.extend(s.chars().map(|c| {
        if (' '..='~').contains(&c) {
            c
        } else {
            '_'
        }
    }));
}

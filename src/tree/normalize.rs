use std::sync::OnceLock;

use regex::Regex;
use snafu::Snafu;

/// Marker substituted for the whitespace between the two halves of a
/// rename record, so the whole record stays one slash-splittable token.
const RENAME_SEPARATOR: &str = "#@@#";
/// Marker substituted for `/` inside the rename target, so the target is
/// not broken apart when the record is split into path segments.
const SLASH_PLACEHOLDER: &str = "#&&#";

static STATUS_LINE: OnceLock<Regex> = OnceLock::new();
static RENAME_PAIR: OnceLock<Regex> = OnceLock::new();

/// A status-mode diff line: one uppercase letter, an optional similarity
/// score, then a path or an old/new path pair.
fn status_line_regex() -> &'static Regex {
    STATUS_LINE.get_or_init(|| {
        Regex::new(r"^([A-Z])[0-9]{0,3}[\t ]+(\S+(?:[\t ]+\S+)?)$")
            .expect("status line pattern is valid")
    })
}

fn rename_pair_regex() -> &'static Regex {
    RENAME_PAIR
        .get_or_init(|| Regex::new(r"^(\S+)[\t ]+(\S+)$").expect("rename pair pattern is valid"))
}

/// Converts the raw diff output into canonical per-leaf records.
///
/// Blank lines are dropped. With `status_mode` enabled each remaining line
/// runs through [`encode_status`] and [`encode_rename`], yielding one
/// contiguous token per record; without it lines pass through untouched.
pub fn canonicalize_records(input: &str, status_mode: bool) -> Result<Vec<String>, NormalizeError> {
    input
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            if status_mode {
                if line.contains(RENAME_SEPARATOR) || line.contains(SLASH_PLACEHOLDER) {
                    return ReservedMarkerSnafu { line }.fail();
                }
                Ok(encode_rename(&encode_status(line)))
            } else {
                Ok(line.to_string())
            }
        })
        .collect()
}

/// Rewrites `<Letter><digits> <path>` into `<path>[<Letter>]`.
///
/// Lines that do not have the status shape pass through unchanged; a raw
/// path list fed through this function is simply returned as-is.
fn encode_status(line: &str) -> String {
    match status_line_regex().captures(line) {
        Some(caps) => format!("{}[{}]", &caps[2], &caps[1]),
        None => line.to_string(),
    }
}

/// Joins an `old new` pair into one token, replacing the separating
/// whitespace with [`RENAME_SEPARATOR`] and any `/` inside the second
/// token with [`SLASH_PLACEHOLDER`].
fn encode_rename(line: &str) -> String {
    match rename_pair_regex().captures(line) {
        Some(caps) => format!(
            "{}{}{}",
            &caps[1],
            RENAME_SEPARATOR,
            caps[2].replace('/', SLASH_PLACEHOLDER)
        ),
        None => line.to_string(),
    }
}

/// Restores the display form of a final path segment: the rename marker
/// becomes `" -> "` and placeholder slashes become `/` again.
///
/// Exact inverse of [`encode_rename`] for records with at most one rename
/// pair. Applied only to the last segment of a path, at insertion time.
pub fn decode_rename(segment: &str) -> String {
    segment
        .replace(RENAME_SEPARATOR, " -> ")
        .replace(SLASH_PLACEHOLDER, "/")
}

#[derive(Debug, Snafu)]
pub enum NormalizeError {
    #[snafu(display("Line '{}' contains a reserved marker sequence", line))]
    ReservedMarker { line: String },
}

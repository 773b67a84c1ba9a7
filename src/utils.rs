//! Small helpers shared across modules

use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// Completion percentage of `sent` out of `total`
///
/// Returns `0.0` when `total` is zero. A backend reporting more sent than
/// total is shown as `100.0`, never more.
pub fn percent(sent: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (sent as f64 * 100.0 / total as f64).min(100.0)
}

/// Whether a file looks like CSV by declared MIME type or by extension
pub fn is_csv_file(file_name: &str, content_type: Option<&str>) -> bool {
    if content_type.is_some_and(|ct| ct.eq_ignore_ascii_case("text/csv")) {
        return true;
    }
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Final path component as a string, falling back to the whole path
pub fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[allow(clippy::expect_used)]
fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"(?s)<[^>]*>").expect("static regex must compile"))
}

/// Plain-text rendering of an HTML body, used as the text fallback
///
/// Strips tags, decodes the handful of entities an editor emits and
/// collapses whitespace. An editor's empty document (`<p><br></p>`)
/// becomes an empty string.
pub fn html_to_text(html: &str) -> String {
    let stripped = tag_regex().replace_all(html, " ");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

//! Draft title markers.

const MARKERS: &[&str] = &["wip:", "draft:", "[draft]", "(draft)"];

/// Whether `title` already starts with a draft marker (case-insensitive).
pub fn is_draft_title(title: &str) -> bool {
    let start = title.trim_start().to_lowercase();
    MARKERS.iter().any(|marker| start.starts_with(marker))
}

/// Prefix `title` with `Draft: ` unless it already carries a marker.
pub fn normalize_draft_title(title: &str) -> String {
    if is_draft_title(title) {
        title.to_string()
    } else {
        format!("Draft: {title}")
    }
}

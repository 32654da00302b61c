//! Deterministic clean-up of the text the providers return.

pub const ALT_TEXT_MAX_CHARS: usize = 125;
const ALT_TEXT_TRUNCATE_AT: usize = 122;
const ELLIPSIS: &str = "...";

/// Leading labels some captioning models echo back.
const BOILERPLATE_PREFIXES: &[&str] = &["Caption:", "Description:", "Image shows:"];

/// Short, capitalized, period-free alt text of at most 125 characters.
///
/// Empty input comes back empty.
pub fn format_alt_text(text: &str) -> String {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed).trim_end();
    let text = capitalize_first(trimmed);

    if text.chars().count() > ALT_TEXT_MAX_CHARS {
        let mut cut: String = text.chars().take(ALT_TEXT_TRUNCATE_AT).collect();
        cut.push_str(ELLIPSIS);
        cut
    } else {
        text
    }
}

/// Prefer the detailed description when it says more than the basic caption,
/// otherwise enrich the basic caption with the classification labels.
pub fn format_caption(detailed: &str, basic: &str, labels: &[String]) -> String {
    let detailed = detailed.trim();
    let basic = basic.trim();

    if !detailed.is_empty() && detailed.chars().count() > basic.chars().count() {
        let stripped = strip_boilerplate(detailed).trim();
        if !stripped.is_empty() {
            return stripped.to_string();
        }
    }

    if labels.is_empty() {
        basic.to_string()
    } else {
        format!("{basic}, The image contains: {}.", labels.join(", "))
    }
}

fn strip_boilerplate(text: &str) -> &str {
    BOILERPLATE_PREFIXES
        .iter()
        .find_map(|prefix| text.strip_prefix(prefix))
        .unwrap_or(text)
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

use once_cell::sync::Lazy;
use regex::Regex;

static JSON_FENCE: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)^\s*```(?:json|JSON)?\s*(.*?)\s*```\s*$").ok());

/// Accept filter for uploads: images and PDFs only.
pub fn accepts_media_type(media_type: &str) -> bool {
    let media_type = media_type.trim().to_ascii_lowercase();
    media_type.starts_with("image/") || media_type == "application/pdf"
}

/// Unwraps a reply that came back inside a markdown code fence.
pub fn strip_json_fence(text: &str) -> &str {
    let inner = Option::as_ref(&*JSON_FENCE)
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1));
    match inner {
        Some(inner) => inner.as_str(),
        None => text.trim(),
    }
}

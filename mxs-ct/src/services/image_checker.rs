//! Image URL validation
//!
//! Pure predicate gating song and playlist pictures: the URL must parse,
//! use an http(s) scheme, and name a file with a known image extension.
//! No network probe; the check must stay deterministic and side-effect
//! free.

/// File extensions accepted as image resources
const IMAGE_EXTENSIONS: &[&str] = &[
    "apng", "avif", "bmp", "gif", "ico", "jpeg", "jpg", "png", "svg", "webp",
];

/// Does the given URL name an image resource?
///
/// Empty or malformed input is never an image.
pub fn is_image(url: &str) -> bool {
    let parsed = match reqwest::Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    let path = parsed.path();
    let extension = match path.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() && !extension.contains('/') => extension,
        _ => return false,
    };

    let extension = extension.to_ascii_lowercase();
    IMAGE_EXTENSIONS.contains(&extension.as_str())
}

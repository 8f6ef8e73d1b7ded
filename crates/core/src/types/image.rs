//! Names of uploaded product images.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp prefix format: UTC, second precision, lexically sortable.
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Fallback used when an uploaded filename sanitizes to nothing.
const FALLBACK_NAME: &str = "upload";

/// Longest file name most filesystems accept; also the column width.
pub const MAX_STORED_LENGTH: usize = 255;

/// `<YYYYmmddHHMMSS>_`
const PREFIX_LENGTH: usize = 15;

/// Room for the widest [`StoredImageName::with_suffix`] (`-` and a `u32`).
const SUFFIX_RESERVE: usize = 11;

const MAX_SANITIZED_LENGTH: usize = MAX_STORED_LENGTH - PREFIX_LENGTH - SUFFIX_RESERVE;

/// Extensions longer than this are not worth preserving when truncating.
const MAX_KEPT_EXTENSION: usize = 16;

/// Name of an image file inside the image area.
///
/// Generated names have the shape `<YYYYmmddHHMMSS>_<original name>`, where the
/// original name is reduced to its final path component and every character
/// other than ASCII letters, digits, `.`, `-` and `_` becomes an underscore.
/// The result is a valid URL path segment as-is. Long names are truncated,
/// keeping the extension, so that even a suffixed name fits in
/// [`MAX_STORED_LENGTH`] bytes. Names sort chronologically.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use wfa_core::StoredImageName;
///
/// let at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
/// let name = StoredImageName::generate(at, "brake pad.jpg");
/// assert_eq!(name.as_str(), "20250309140507_brake_pad.jpg");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoredImageName(String);

impl StoredImageName {
    /// Build the stored name for a file uploaded at `at`.
    #[must_use]
    pub fn generate(at: DateTime<Utc>, original_filename: &str) -> Self {
        Self(format!(
            "{}_{}",
            at.format(TIMESTAMP_FORMAT),
            sanitize_filename(original_filename)
        ))
    }

    /// Variant of this name with a numeric suffix before the extension,
    /// used when the plain name is already taken.
    ///
    /// `20250309140507_pad.jpg` with `n = 2` becomes `20250309140507_pad-2.jpg`.
    #[must_use]
    pub fn with_suffix(&self, n: u32) -> Self {
        match self.0.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => Self(format!("{stem}-{n}.{ext}")),
            _ => Self(format!("{}-{n}", self.0)),
        }
    }

    /// Wrap a name previously produced by [`StoredImageName::generate`]
    /// (e.g. read back from the database).
    #[must_use]
    pub fn from_stored(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for StoredImageName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StoredImageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reduce an uploaded filename to a short, URL-safe single path component.
fn sanitize_filename(original: &str) -> String {
    let last_component = original.rsplit(['/', '\\']).next().unwrap_or_default();

    let cleaned: String = last_component
        .trim()
        .trim_start_matches('.')
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        FALLBACK_NAME.to_owned()
    } else {
        truncate_keeping_extension(&cleaned, MAX_SANITIZED_LENGTH)
    }
}

/// `name` is ASCII here, so one char is one byte.
fn truncate_keeping_extension(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_owned();
    }

    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= MAX_KEPT_EXTENSION => {
            let stem: String = stem.chars().take(max - ext.len() - 1).collect();
            format!("{stem}.{ext}")
        }
        _ => name.chars().take(max).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn test_generate_replaces_spaces() {
        let name = StoredImageName::generate(at(), "front brake pads.png");
        assert_eq!(name.as_str(), "20250102030405_front_brake_pads.png");
    }

    #[test]
    fn test_generate_replaces_url_reserved_characters() {
        assert_eq!(
            StoredImageName::generate(at(), "pad #2?.jpg").as_str(),
            "20250102030405_pad__2_.jpg"
        );
        assert_eq!(
            StoredImageName::generate(at(), "100%_ceară.png").as_str(),
            "20250102030405_100__cear_.png"
        );
    }

    #[test]
    fn test_long_names_fit_with_suffix() {
        let long = format!("{}.jpeg", "a".repeat(300));
        let name = StoredImageName::generate(at(), &long);

        assert!(name.as_str().ends_with(".jpeg"));
        assert!(name.as_str().starts_with("20250102030405_aaa"));
        assert!(name.with_suffix(u32::MAX).as_str().len() <= MAX_STORED_LENGTH);

        let no_ext = StoredImageName::generate(at(), &"b".repeat(400));
        assert!(no_ext.with_suffix(1000).as_str().len() <= MAX_STORED_LENGTH);
    }

    #[test]
    fn test_generate_strips_directories() {
        assert_eq!(
            StoredImageName::generate(at(), "../../etc/passwd").as_str(),
            "20250102030405_passwd"
        );
        assert_eq!(
            StoredImageName::generate(at(), r"C:\Users\me\wax.jpg").as_str(),
            "20250102030405_wax.jpg"
        );
    }

    #[test]
    fn test_generate_falls_back_for_empty_names() {
        assert_eq!(
            StoredImageName::generate(at(), "..").as_str(),
            "20250102030405_upload"
        );
        assert_eq!(
            StoredImageName::generate(at(), "dir/").as_str(),
            "20250102030405_upload"
        );
    }

    #[test]
    fn test_names_sort_chronologically() {
        let earlier = StoredImageName::generate(at(), "z.jpg");
        let later = StoredImageName::generate(
            Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 6).unwrap(),
            "a.jpg",
        );
        assert!(earlier.as_str() < later.as_str());
    }

    #[test]
    fn test_with_suffix() {
        let name = StoredImageName::generate(at(), "pad.jpg");
        assert_eq!(name.with_suffix(1).as_str(), "20250102030405_pad-1.jpg");

        let no_ext = StoredImageName::generate(at(), "pad");
        assert_eq!(no_ext.with_suffix(3).as_str(), "20250102030405_pad-3");
    }
}

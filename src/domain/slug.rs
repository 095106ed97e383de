//! Utilities for generating deterministic, human-friendly slugs.
//!
//! Titles are slugified with the `slug` crate, which transliterates non-ASCII
//! text (including kana and kanji) before lowercasing and hyphenating, so a
//! Japanese title still yields a usable file name. Callers provide their own
//! uniqueness predicate to avoid clobbering existing articles while keeping
//! slug generation pure.

use slug::slugify;
use thiserror::Error;

const MAX_SUFFIX_ATTEMPTS: usize = 32;

/// Errors that can occur while generating a slug.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlugError {
    #[error("slug source text is empty")]
    EmptyInput,
    #[error("failed to derive slug from `{input}`")]
    Unrepresentable { input: String },
    #[error("exhausted attempts to find a unique slug for `{base}`")]
    Exhausted { base: String },
}

/// Derive a base slug from the provided human-readable text.
pub fn derive_slug(input: &str) -> Result<String, SlugError> {
    if input.trim().is_empty() {
        return Err(SlugError::EmptyInput);
    }

    let candidate = slugify(input);

    if candidate.is_empty() {
        return Err(SlugError::Unrepresentable {
            input: input.to_string(),
        });
    }

    Ok(candidate)
}

/// Produce a slug that does not collide according to the supplied predicate.
///
/// The `is_unique` closure must return `true` when the provided slug is free
/// (for example, no article file exists under that name). The helper retries
/// by suffixing a monotonic counter (`-2`, `-3`, …).
pub fn generate_unique_slug<F>(input: &str, mut is_unique: F) -> Result<String, SlugError>
where
    F: FnMut(&str) -> bool,
{
    let base = derive_slug(input)?;

    if is_unique(&base) {
        return Ok(base);
    }

    for attempt in 2..=MAX_SUFFIX_ATTEMPTS + 1 {
        let candidate = format!("{base}-{attempt}");
        if is_unique(&candidate) {
            return Ok(candidate);
        }
    }

    Err(SlugError::Exhausted { base })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_slug_lowercases_and_hyphenates() {
        let slug = derive_slug("Firebase Auth Token Deep Dive").expect("slug");
        assert_eq!(slug, "firebase-auth-token-deep-dive");
    }

    #[test]
    fn derive_slug_drops_punctuation() {
        let slug = derive_slug("Reflections on 2025!").expect("slug");
        assert_eq!(slug, "reflections-on-2025");
    }

    #[test]
    fn derive_slug_rejects_blank_input() {
        assert_eq!(derive_slug("   "), Err(SlugError::EmptyInput));
    }

    #[test]
    fn derive_slug_transliterates_non_ascii() {
        let slug = derive_slug("Café crème").expect("slug");
        assert_eq!(slug, "cafe-creme");
    }

    #[test]
    fn generate_unique_slug_appends_counter() {
        let mut existing = vec!["pattern-library".to_string()];
        let slug = generate_unique_slug("Pattern Library", |candidate| {
            if existing.contains(&candidate.to_string()) {
                false
            } else {
                existing.push(candidate.to_string());
                true
            }
        })
        .expect("unique slug");

        assert_eq!(slug, "pattern-library-2");
        assert!(existing.contains(&slug));
    }

    #[test]
    fn generate_unique_slug_gives_up_eventually() {
        let result = generate_unique_slug("taken", |_| false);
        assert_eq!(
            result,
            Err(SlugError::Exhausted {
                base: "taken".to_string()
            })
        );
    }
}

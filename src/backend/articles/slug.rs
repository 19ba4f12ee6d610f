/**
 * Slug Generation
 *
 * `slugify(title) + "-" + <8 random lowercase alphanumerics>`. The suffix
 * keeps slugs unique for identical titles without a round-trip to storage.
 */

use rand::distributions::Alphanumeric;
use rand::Rng;
use slug::slugify;

/// Length of the random suffix
pub const SUFFIX_LEN: usize = 8;

/// Generate a fresh slug for `title`
///
/// A title with no sluggable characters yields just the suffix.
pub fn generate_slug(title: &str) -> String {
    let base = slugify(title);
    let suffix = random_suffix();
    if base.is_empty() {
        suffix
    } else {
        format!("{}-{}", base, suffix)
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

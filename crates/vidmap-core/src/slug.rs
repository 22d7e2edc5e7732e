//! URL slug derivation shared by sitemap detail URLs and search redirects.

/// Derive a slug: trim, lowercase, and replace every run of whitespace with
/// a single `-`.
///
/// ```
/// assert_eq!(vidmap_core::slugify("Hello   World"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

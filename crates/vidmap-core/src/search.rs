//! Search form redirect target.

use crate::slug::slugify;

/// Prefix of the video listing routes.
pub const VIDEO_ROUTE: &str = "/video/";

/// Path the search form navigates to for `query`.
///
/// An empty (or whitespace-only) query lands on the listing root.
pub fn redirect_path(query: &str) -> String {
    format!("{VIDEO_ROUTE}{}", slugify(query))
}

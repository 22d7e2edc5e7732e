//! vidmap Core Library
//!
//! Configuration, error handling and the video record model shared by the
//! sitemap generator and the server, plus the small pieces of site behavior
//! (slugs, search redirects, theme preference) that must agree with them.

pub mod config;
pub mod error;
pub mod search;
pub mod slug;
pub mod theme;
pub mod video;

pub use config::{Config, SiteUrl};
pub use error::{CoreError, Result};
pub use slug::slugify;
pub use theme::{MemoryStore, PreferenceStore, Theme, ThemeToggle};
pub use video::{Tags, VideoRecord};

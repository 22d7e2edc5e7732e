//! vidmap Generator Library
//!
//! Image and video sitemap generation for a video catalog.
//!
//! # Modules
//!
//! - [`sitemap`] - XML sitemap generation with image and video extensions

pub mod sitemap;

pub use sitemap::{SitemapBuilder, SitemapOutput, SitemapVariant, escape_xml};

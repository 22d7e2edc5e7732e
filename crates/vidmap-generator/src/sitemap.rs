//! Sitemap generation.
//!
//! Builds the image and video sitemaps from the video catalog. Both variants
//! go through one builder; the [`SitemapVariant`] decides the extension
//! namespace, the required fields and whether the logo entry is emitted.

use std::{fmt, io::Write};

use chrono::{DateTime, SecondsFormat, Utc};
use thiserror::Error;
use tracing::{debug, warn};
use vidmap_core::{Config, SiteUrl, VideoRecord, slugify};

/// Namespace of the core sitemap protocol.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Namespace of the image sitemap extension.
pub const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Namespace of the video sitemap extension.
pub const VIDEO_NS: &str = "http://www.google.com/schemas/sitemap-video/1.1";

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Which sitemap extension to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapVariant {
    Image,
    Video,
}

impl SitemapVariant {
    /// Both variants, in the order they are published.
    pub const ALL: [SitemapVariant; 2] = [Self::Image, Self::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    /// File name (and route) the sitemap is published under.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Image => "image-sitemap.xml",
            Self::Video => "video-sitemap.xml",
        }
    }

    fn namespace(&self) -> &'static str {
        match self {
            Self::Image => IMAGE_NS,
            Self::Video => VIDEO_NS,
        }
    }
}

/// `<changefreq>` of video entries.
pub const VIDEO_CHANGEFREQ: &str = "weekly";

/// `<priority>` of video entries.
pub const VIDEO_PRIORITY: f32 = 0.8;

/// Why a record did not make it into a sitemap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingId,
    MissingTitle,
    MissingDescription,
    MissingThumbnail,
    MissingEmbedUrl,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MissingId => "missing id",
            Self::MissingTitle => "missing title",
            Self::MissingDescription => "missing description",
            Self::MissingThumbnail => "missing thumbnail",
            Self::MissingEmbedUrl => "missing embed URL",
        })
    }
}

/// A sitemap URL entry. Text and URLs are stored XML-escaped.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    /// URL location.
    pub loc: String,

    /// Last modification timestamp.
    pub lastmod: Option<String>,

    /// Change frequency.
    pub changefreq: Option<&'static str>,

    /// Priority (0.0 to 1.0).
    pub priority: Option<f32>,

    /// Extension payload.
    pub media: Media,
}

/// Extension element attached to an entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Media {
    Image(ImageInfo),
    Video(VideoInfo),
}

/// `<image:image>` contents.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub loc: String,
    pub caption: String,
    pub title: String,
}

/// `<video:video>` contents.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub thumbnail_loc: String,
    pub title: String,
    pub description: String,
    pub content_loc: String,
    pub duration: u64,
    pub publication_date: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
}

/// A rendered sitemap and how many records it covers.
#[derive(Debug, Clone)]
pub struct SitemapOutput {
    /// The XML document.
    pub xml: String,

    /// Number of `<url>` entries, including the logo entry.
    pub entries: usize,

    /// Number of records left out.
    pub skipped: usize,
}

/// Sitemap builder.
#[derive(Debug, Clone)]
pub struct SitemapBuilder {
    site: SiteUrl,
    detail_segment: String,
    logo: String,
    now: DateTime<Utc>,
}

impl SitemapBuilder {
    /// Create a builder for `site`, stamped with the current time.
    #[must_use]
    pub fn new(site: SiteUrl) -> Self {
        Self {
            site,
            detail_segment: "video".to_string(),
            logo: "logo.png".to_string(),
            now: Utc::now(),
        }
    }

    /// Create a builder from the site configuration.
    pub fn from_config(config: &Config) -> vidmap_core::Result<Self> {
        Ok(Self::new(config.site_url()?)
            .with_detail_segment(&config.site.video_path)
            .with_logo(&config.site.logo))
    }

    /// Path segment placed between the base URL and the detail slug.
    #[must_use]
    pub fn with_detail_segment(mut self, segment: &str) -> Self {
        self.detail_segment = segment.trim_matches('/').to_string();
        self
    }

    /// Site-relative path of the logo image.
    #[must_use]
    pub fn with_logo(mut self, logo: &str) -> Self {
        self.logo = logo.to_string();
        self
    }

    /// Use `now` as the fallback for missing dates.
    #[must_use]
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Generate the sitemap of `variant` from `videos`.
    pub fn build(&self, variant: SitemapVariant, videos: &[VideoRecord]) -> SitemapOutput {
        debug!(
            variant = variant.as_str(),
            count = videos.len(),
            "generating sitemap"
        );

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(&format!(
            r#"<urlset xmlns="{SITEMAP_NS}" xmlns:{}="{}">"#,
            variant.as_str(),
            variant.namespace()
        ));
        xml.push('\n');

        let mut entries = 0;
        if variant == SitemapVariant::Image {
            xml.push_str(&self.url_to_xml(&self.logo_entry()));
            entries += 1;
        }

        let mut skipped = 0;
        for (index, video) in videos.iter().enumerate() {
            match self.entry(variant, video) {
                Ok(entry) => {
                    xml.push_str(&self.url_to_xml(&entry));
                    entries += 1;
                }
                Err(reason) => {
                    warn!(
                        variant = variant.as_str(),
                        index,
                        id = video.id().unwrap_or("<none>"),
                        %reason,
                        "skipping video record"
                    );
                    skipped += 1;
                }
            }
        }

        xml.push_str("</urlset>\n");

        debug!(
            variant = variant.as_str(),
            entries, skipped, "sitemap generated"
        );

        SitemapOutput {
            xml,
            entries,
            skipped,
        }
    }

    /// Write a sitemap to a writer, returning the number of skipped records.
    pub fn write_to<W: Write>(
        &self,
        variant: SitemapVariant,
        videos: &[VideoRecord],
        writer: &mut W,
    ) -> Result<usize> {
        let output = self.build(variant, videos);
        writer.write_all(output.xml.as_bytes())?;
        Ok(output.skipped)
    }

    /// Convert a record to an entry of `variant`.
    pub fn entry(
        &self,
        variant: SitemapVariant,
        video: &VideoRecord,
    ) -> std::result::Result<SitemapEntry, SkipReason> {
        match variant {
            SitemapVariant::Image => self.image_entry(video),
            SitemapVariant::Video => self.video_entry(video),
        }
    }

    fn logo_entry(&self) -> SitemapEntry {
        let caption = escape_xml(format!("Logo {}", self.site.hostname()).as_str());
        SitemapEntry {
            loc: escape_xml(self.site.join("/").as_str()),
            lastmod: None,
            changefreq: None,
            priority: None,
            media: Media::Image(ImageInfo {
                loc: escape_xml(self.site.join(&self.logo).as_str()),
                caption: caption.clone(),
                title: caption,
            }),
        }
    }

    fn image_entry(&self, video: &VideoRecord) -> std::result::Result<SitemapEntry, SkipReason> {
        let id = video.id().ok_or(SkipReason::MissingId)?;
        let title = video.title().ok_or(SkipReason::MissingTitle)?;
        let thumbnail = video.thumbnail().ok_or(SkipReason::MissingThumbnail)?;
        let caption = video.description().unwrap_or(title);

        Ok(SitemapEntry {
            loc: escape_xml(self.detail_url(id, title).as_str()),
            lastmod: Some(escape_xml(self.lastmod(video).as_str())),
            changefreq: None,
            priority: None,
            media: Media::Image(ImageInfo {
                loc: escape_xml(self.site.resolve(thumbnail).as_str()),
                caption: escape_xml(caption),
                title: escape_xml(title),
            }),
        })
    }

    fn video_entry(&self, video: &VideoRecord) -> std::result::Result<SitemapEntry, SkipReason> {
        let id = video.id().ok_or(SkipReason::MissingId)?;
        let title = video.title().ok_or(SkipReason::MissingTitle)?;
        let description = video
            .description()
            .ok_or(SkipReason::MissingDescription)?;
        let thumbnail = video.thumbnail().ok_or(SkipReason::MissingThumbnail)?;
        let embed_url = video.embed_url().ok_or(SkipReason::MissingEmbedUrl)?;

        let publication_date = video
            .date_published()
            .map_or_else(|| self.now_iso(), str::to_string);

        Ok(SitemapEntry {
            loc: escape_xml(self.detail_url(id, title).as_str()),
            lastmod: Some(escape_xml(self.lastmod(video).as_str())),
            changefreq: Some(VIDEO_CHANGEFREQ),
            priority: Some(VIDEO_PRIORITY),
            media: Media::Video(VideoInfo {
                thumbnail_loc: escape_xml(self.site.resolve(thumbnail).as_str()),
                title: escape_xml(title),
                description: escape_xml(description),
                content_loc: escape_xml(self.site.resolve(embed_url).as_str()),
                duration: video.duration_secs(),
                publication_date: escape_xml(publication_date.as_str()),
                tags: video.tag_items().into_iter().map(escape_xml).collect(),
                category: video.category().map(escape_xml),
            }),
        })
    }

    /// Detail page URL of a video.
    pub fn detail_url(&self, id: &str, title: &str) -> String {
        let slug = slugify(title);
        if self.detail_segment.is_empty() {
            self.site.join(&format!("{slug}-{id}/"))
        } else {
            self.site
                .join(&format!("{}/{slug}-{id}/", self.detail_segment))
        }
    }

    /// `dateModified`, then `datePublished`, then the build time.
    fn lastmod(&self, video: &VideoRecord) -> String {
        video
            .date_modified()
            .or_else(|| video.date_published())
            .map_or_else(|| self.now_iso(), str::to_string)
    }

    fn now_iso(&self) -> String {
        self.now.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// Convert an entry to XML.
    fn url_to_xml(&self, url: &SitemapEntry) -> String {
        let mut xml = String::from("  <url>\n");

        xml.push_str(&format!("    <loc>{}</loc>\n", url.loc));

        if let Some(lastmod) = &url.lastmod {
            xml.push_str(&format!("    <lastmod>{lastmod}</lastmod>\n"));
        }

        if let Some(changefreq) = url.changefreq {
            xml.push_str(&format!("    <changefreq>{changefreq}</changefreq>\n"));
        }

        if let Some(priority) = &url.priority {
            xml.push_str(&format!("    <priority>{priority:.1}</priority>\n"));
        }

        match &url.media {
            Media::Image(image) => {
                xml.push_str("    <image:image>\n");
                xml.push_str(&format!("      <image:loc>{}</image:loc>\n", image.loc));
                xml.push_str(&format!(
                    "      <image:caption>{}</image:caption>\n",
                    image.caption
                ));
                xml.push_str(&format!("      <image:title>{}</image:title>\n", image.title));
                xml.push_str("    </image:image>\n");
            }
            Media::Video(video) => {
                xml.push_str("    <video:video>\n");
                xml.push_str(&format!(
                    "      <video:thumbnail_loc>{}</video:thumbnail_loc>\n",
                    video.thumbnail_loc
                ));
                xml.push_str(&format!("      <video:title>{}</video:title>\n", video.title));
                xml.push_str(&format!(
                    "      <video:description>{}</video:description>\n",
                    video.description
                ));
                xml.push_str(&format!(
                    "      <video:content_loc>{}</video:content_loc>\n",
                    video.content_loc
                ));
                xml.push_str(&format!(
                    "      <video:duration>{}</video:duration>\n",
                    video.duration
                ));
                xml.push_str(&format!(
                    "      <video:publication_date>{}</video:publication_date>\n",
                    video.publication_date
                ));
                for tag in &video.tags {
                    xml.push_str(&format!("      <video:tag>{tag}</video:tag>\n"));
                }
                if let Some(category) = &video.category {
                    xml.push_str(&format!(
                        "      <video:category>{category}</video:category>\n"
                    ));
                }
                xml.push_str("    </video:video>\n");
            }
        }

        xml.push_str("  </url>\n");
        xml
    }
}

/// Escape the five XML-significant characters in a single pass.
///
/// C0 control characters other than tab, newline and carriage return are not
/// allowed in XML 1.0 and are dropped. `None` escapes to an empty string.
/// Applying this twice double-escapes.
pub fn escape_xml<'a>(s: impl Into<Option<&'a str>>) -> String {
    let Some(s) = s.into() else {
        return String::new();
    };

    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '\'' => escaped.push_str("&apos;"),
            '"' => escaped.push_str("&quot;"),
            '\u{0}'..='\u{8}' | '\u{b}' | '\u{c}' | '\u{e}'..='\u{1f}' => {}
            _ => escaped.push(c),
        }
    }
    escaped
}

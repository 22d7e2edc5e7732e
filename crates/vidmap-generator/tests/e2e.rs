//! End-to-end tests for sitemap generation.
//!
//! These tests build whole documents from a catalog and check them with an
//! XML parser.

use chrono::{TimeZone, Utc};
use quick_xml::{Reader, events::Event};
use vidmap_core::{SiteUrl, VideoRecord, video::parse_catalog};
use vidmap_generator::{SitemapBuilder, SitemapVariant, escape_xml};

const CATALOG: &str = r#"[
    {
        "id": "42",
        "title": "Cat Video",
        "description": "A cat",
        "thumbnail": "/thumbs/42.jpg",
        "embedUrl": "https://cdn.example.com/embed/42"
    },
    {
        "id": 43,
        "title": "Dogs & <Friends>",
        "description": "Dogs \"playing\"",
        "thumbnail": "https://img.example.com/43.jpg",
        "embedUrl": "/embed/43",
        "duration": 125.6,
        "datePublished": "2024-01-01T00:00:00Z",
        "tags": ["dogs", " play "],
        "category": "Pets"
    },
    {
        "id": "44",
        "title": "Thumbnail only",
        "thumbnail": "/thumbs/44.jpg"
    },
    {
        "title": "No id",
        "description": "skipped everywhere",
        "thumbnail": "/thumbs/x.jpg",
        "embedUrl": "/embed/x"
    }
]"#;

fn builder() -> SitemapBuilder {
    let site = SiteUrl::parse("https://example.com").expect("site url");
    SitemapBuilder::new(site).at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
}

fn catalog() -> Vec<VideoRecord> {
    parse_catalog(CATALOG).expect("catalog parses")
}

/// Parse the document and count `<url>` elements, failing on malformed XML.
fn count_urls(xml: &str) -> usize {
    let mut reader = Reader::from_str(xml);
    let mut urls = 0;
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"url" => urls += 1,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => panic!("malformed XML at {}: {e}", reader.buffer_position()),
        }
    }
    urls
}

#[test]
fn test_video_sitemap_scenario() {
    let record = parse_catalog(
        r#"[{"id": "42", "title": "Cat Video", "description": "A cat",
             "thumbnail": "/thumbs/42.jpg",
             "embedUrl": "https://cdn.example.com/embed/42"}]"#,
    )
    .expect("parse");

    let output = builder().build(SitemapVariant::Video, &record);
    let xml = &output.xml;

    // <loc> is the detail page; the absolute thumbnail lives in thumbnail_loc.
    assert!(xml.contains("<loc>https://example.com/video/cat-video-42/</loc>"));
    assert!(xml.contains(
        "<video:thumbnail_loc>https://example.com/thumbs/42.jpg</video:thumbnail_loc>"
    ));
    assert!(xml.contains(
        "<video:content_loc>https://cdn.example.com/embed/42</video:content_loc>"
    ));
    assert!(xml.contains("<video:duration>126</video:duration>"));
    assert!(xml.contains("<video:title>Cat Video</video:title>"));
    assert!(xml.contains("<changefreq>weekly</changefreq>"));
    assert!(xml.contains("<priority>0.8</priority>"));
    assert_eq!(count_urls(xml), 1);
}

#[test]
fn test_image_sitemap_counts() {
    let output = builder().build(SitemapVariant::Image, &catalog());

    // logo + three records with id, title and thumbnail
    assert_eq!(output.entries, 4);
    assert_eq!(output.skipped, 1);
    assert_eq!(count_urls(&output.xml), 4);
    assert_eq!(output.xml.matches("logo.png").count(), 1);
}

#[test]
fn test_image_sitemap_escapes_text() {
    let records = parse_catalog(
        r#"[
            {"id": "1", "title": "Tom & Jerry's <Show>",
             "description": "Cats \"chase\" mice & <more>",
             "thumbnail": "/thumbs/1.jpg"},
            {"id": "2", "title": "Q&A: \"Why?\" <live>",
             "thumbnail": "/thumbs/2.jpg"}
        ]"#,
    )
    .expect("parse");

    let output = builder().build(SitemapVariant::Image, &records);
    let xml = &output.xml;

    assert_eq!(output.skipped, 0);
    assert_eq!(count_urls(xml), 3);

    assert!(xml.contains("<image:title>Tom &amp; Jerry&apos;s &lt;Show&gt;</image:title>"));
    assert!(xml.contains(
        "<image:caption>Cats &quot;chase&quot; mice &amp; &lt;more&gt;</image:caption>"
    ));

    // caption falls back to the title and is escaped the same way
    let fallback = "Q&amp;A: &quot;Why?&quot; &lt;live&gt;";
    assert!(xml.contains(&format!("<image:title>{fallback}</image:title>")));
    assert!(xml.contains(&format!("<image:caption>{fallback}</image:caption>")));

    assert!(!xml.contains("Tom & Jerry"));
    assert!(!xml.contains("<Show>"));
    assert!(!xml.contains("<live>"));
}

#[test]
fn test_video_sitemap_counts() {
    let output = builder().build(SitemapVariant::Video, &catalog());

    assert_eq!(output.entries, 2);
    assert_eq!(output.skipped, 2);
    assert_eq!(count_urls(&output.xml), 2);
    assert!(!output.xml.contains("thumbnail-only"));
    assert!(!output.xml.contains("no-id"));
}

#[test]
fn test_video_sitemap_full_record() {
    let output = builder().build(SitemapVariant::Video, &catalog());
    let xml = &output.xml;

    assert!(xml.contains("<video:duration>126</video:duration>"));
    assert!(xml.contains("<video:title>Dogs &amp; &lt;Friends&gt;</video:title>"));
    assert!(xml.contains("<video:description>Dogs &quot;playing&quot;</video:description>"));
    assert!(xml.contains("<video:content_loc>https://example.com/embed/43</video:content_loc>"));
    assert!(xml.contains("<video:publication_date>2024-01-01T00:00:00Z</video:publication_date>"));
    assert!(xml.contains("<lastmod>2024-01-01T00:00:00Z</lastmod>"));
    assert!(xml.contains("<video:tag>dogs</video:tag>"));
    assert!(xml.contains("<video:tag>play</video:tag>"));
    assert!(xml.contains("<video:category>Pets</video:category>"));
    assert_eq!(xml.matches("<video:category>").count(), 1);
}

#[test]
fn test_all_records_skipped_still_well_formed() {
    let records = vec![VideoRecord::default(), VideoRecord::default()];

    let output = builder().build(SitemapVariant::Video, &records);

    assert_eq!(output.skipped, 2);
    assert_eq!(count_urls(&output.xml), 0);
    assert!(output.xml.contains("<urlset"));
    assert!(output.xml.trim_end().ends_with("</urlset>"));
}

#[test]
fn test_escape_round_trip() {
    let inputs = [
        "plain",
        "a < b > c",
        "Tom & Jerry",
        "it's \"quoted\"",
        "&amp; already escaped",
        "<>&'\"",
    ];

    for input in inputs {
        let escaped = escape_xml(input);
        let unescaped = quick_xml::escape::unescape(&escaped).expect("valid entities");
        assert_eq!(unescaped, input);
    }
}

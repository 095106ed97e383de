use std::sync::Arc;

use koborin::application::clock::{Clock, FixedClock};
use koborin::application::llms::LlmsService;
use koborin::application::repos::ContentRepo;
use koborin::application::selection::FeedQuery;
use koborin::application::site::SiteProfile;
use koborin::application::syndication::SyndicationService;
use koborin::domain::content::{Category, CategoryScope, Document, Language};
use koborin::infra::content::SnapshotRepo;
use time::OffsetDateTime;
use time::macros::datetime;

const NOW: OffsetDateTime = datetime!(2026-03-01 12:00 UTC);

struct Feeds {
    rss: SyndicationService,
    llms: LlmsService,
}

fn feeds(documents: Vec<Document>) -> Feeds {
    let content: Arc<dyn ContentRepo> = Arc::new(SnapshotRepo::new(documents));
    let site = Arc::new(SiteProfile::default());
    let clock: Arc<dyn Clock> = Arc::new(FixedClock(NOW));
    Feeds {
        rss: SyndicationService::new(Arc::clone(&content), Arc::clone(&site), Arc::clone(&clock)),
        llms: LlmsService::new(content, site, clock),
    }
}

fn item_titles(xml: &str) -> Vec<String> {
    xml.split("<item>")
        .skip(1)
        .filter_map(|item| {
            let start = item.find("<title>")? + "<title>".len();
            let end = item.find("</title>")?;
            Some(item[start..end].to_string())
        })
        .collect()
}

#[tokio::test]
async fn drafts_are_left_out_of_rss() {
    let feeds = feeds(vec![
        Document::new("tech/a.mdx", "A", "a").with_published_at(datetime!(2024-01-01 0:00 UTC)),
        Document::new("tech/b.mdx", "B", "b").with_draft(true),
    ]);

    let xml = feeds.rss.rss_feed(Language::En).await.expect("rss");

    assert_eq!(item_titles(&xml), ["A"]);
    assert!(xml.contains("<link>https://koborin.ai/tech/a/</link>"));
    assert!(xml.contains("<pubDate>Mon, 01 Jan 2024 00:00:00 +0000</pubDate>"));
}

#[tokio::test]
async fn languages_never_share_a_feed() {
    let feeds = feeds(vec![
        Document::new("ja/life/x.mdx", "x", "").with_published_at(datetime!(2024-06-01 0:00 UTC)),
        Document::new("life/y.mdx", "y", "").with_published_at(datetime!(2024-05-01 0:00 UTC)),
    ]);

    let ja = feeds.rss.rss_feed(Language::Ja).await.expect("ja rss");
    let en = feeds.rss.rss_feed(Language::En).await.expect("en rss");

    assert_eq!(item_titles(&ja), ["x"]);
    assert_eq!(item_titles(&en), ["y"]);
    assert!(ja.contains("<language>ja</language>"));
    assert!(ja.contains("<link>https://koborin.ai/ja/life/x/</link>"));
}

#[tokio::test]
async fn about_me_reaches_llms_but_not_rss() {
    let feeds = feeds(vec![Document::new(
        "about-me/overview.mdx",
        "Overview",
        "I write about infrastructure.\n",
    )]);

    let text = feeds
        .llms
        .feed(FeedQuery::new(Language::En, Category::AboutMe))
        .await
        .expect("llms");
    let xml = feeds.rss.rss_feed(Language::En).await.expect("rss");

    assert_eq!(
        text,
        "# koborin.ai - EN / about-me\n> Last updated: 2026-03-01\n\n## Overview\nURL: https://koborin.ai/about-me/overview/\n\nI write about infrastructure.\n"
    );
    assert!(item_titles(&xml).is_empty());
}

#[tokio::test]
async fn equal_dates_render_identically_every_time() {
    let at = datetime!(2024-02-02 0:00 UTC);
    let feeds = feeds(vec![
        Document::new("tech/one.mdx", "One", "").with_published_at(at),
        Document::new("tech/two.mdx", "Two", "").with_published_at(at),
        Document::new("life/three.mdx", "Three", "").with_published_at(at),
    ]);

    let first = feeds.rss.rss_feed(Language::En).await.expect("rss");
    let second = feeds.rss.rss_feed(Language::En).await.expect("rss");

    assert_eq!(first, second);
    assert_eq!(item_titles(&first), ["One", "Two", "Three"]);
}

#[tokio::test]
async fn full_feed_joins_every_category_in_corpus_order() {
    let feeds = feeds(vec![
        Document::new("ja/about-me/overview.mdx", "概要", "自己紹介"),
        Document::new("ja/life/walk.mdx", "散歩", "歩いた").with_draft(true),
        Document::new("ja/tech/rust.mdx", "Rust", "所有権"),
        Document::new("tech/rust.mdx", "Rust (en)", "ownership"),
    ]);

    let text = feeds
        .llms
        .feed(FeedQuery::new(Language::Ja, CategoryScope::All))
        .await
        .expect("llms");

    assert_eq!(
        text,
        "# koborin.ai - JA\n> Last updated: 2026-03-01\n\n## 概要\nURL: https://koborin.ai/ja/about-me/overview/\n\n自己紹介\n---\n\n## Rust\nURL: https://koborin.ai/ja/tech/rust/\n\n所有権"
    );
}

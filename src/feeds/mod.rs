//! Feed proxy: fetch an RSS feed from the blog and re-publish it as Atom, so
//! the browser can read it with same-origin XHR.

use chrono::DateTime;
use quick_xml::escape::escape;
use serde::Deserialize;
use std::fmt::Write;
use std::time::Duration;

use crate::config::BlogConfig;

/// Maximum length of an entry summary, in characters.
const SUMMARY_LEN: usize = 70;

#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("Feed host unreachable: {0}")]
    Unreachable(#[source] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    /// Naive ISO 8601 timestamp, e.g. "2013-04-01T10:00:00"
    pub updated: Option<String>,
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AtomFeed {
    pub url: String,
    pub title: Option<String>,
    pub entries: Vec<FeedEntry>,
}

impl AtomFeed {
    pub fn empty(url: &str) -> Self {
        Self {
            url: url.to_string(),
            title: None,
            entries: Vec::new(),
        }
    }

    /// Render as an Atom document.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
        let url = escape(self.url.as_str());
        let _ = writeln!(xml, "  <title>{}</title>", escape(self.title.as_deref().unwrap_or("")));
        let _ = writeln!(xml, "  <id>{url}</id>");
        let _ = writeln!(xml, "  <link href=\"{url}\"/>");

        if let Some(updated) = self.entries.iter().filter_map(|e| e.updated.as_deref()).max() {
            let _ = writeln!(xml, "  <updated>{}</updated>", escape(updated));
        }

        for entry in &self.entries {
            let link = escape(entry.link.as_str());
            xml.push_str("  <entry>\n");
            let _ = writeln!(xml, "    <title>{}</title>", escape(entry.title.as_str()));
            let _ = writeln!(xml, "    <link href=\"{link}\"/>");
            let _ = writeln!(xml, "    <id>{link}</id>");
            if let Some(updated) = &entry.updated {
                let _ = writeln!(xml, "    <updated>{}</updated>", escape(updated.as_str()));
            }
            let _ = writeln!(xml, "    <summary>{}</summary>", escape(entry.summary.as_str()));
            xml.push_str("  </entry>\n");
        }

        xml.push_str("</feed>\n");
        xml
    }
}

/// Fetch `url` and convert it.
///
/// A timeout, a non-200 response or an unreadable body all produce an empty
/// feed; only failing to reach the host is an error.
pub async fn fetch_atom(
    client: &reqwest::Client,
    config: &BlogConfig,
    url: &str,
) -> Result<AtomFeed, FeedError> {
    let resp = match client
        .get(url)
        .timeout(Duration::from_millis(config.timeout_ms))
        .send()
        .await
    {
        Ok(resp) => resp,
        Err(e) if e.is_timeout() => {
            tracing::warn!("Feed request to {url} timed out");
            return Ok(AtomFeed::empty(url));
        }
        Err(e) => return Err(FeedError::Unreachable(e)),
    };

    if resp.status() != reqwest::StatusCode::OK {
        tracing::warn!("Feed {url} returned {}", resp.status());
        return Ok(AtomFeed::empty(url));
    }

    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!("Failed to read feed {url}: {e}");
            return Ok(AtomFeed::empty(url));
        }
    };

    match parse_rss(url, body.trim()) {
        Ok(feed) => Ok(feed),
        Err(e) => {
            tracing::warn!("Failed to parse feed {url}: {e}");
            Ok(AtomFeed::empty(url))
        }
    }
}

// ─── RSS 2.0 ─────────────────────────────────────────────

#[derive(Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Deserialize)]
struct Channel {
    #[serde(default)]
    title: Option<String>,
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
struct Item {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "pubDate", default)]
    pub_date: Option<String>,
}

pub fn parse_rss(url: &str, xml: &str) -> Result<AtomFeed, quick_xml::DeError> {
    let rss: Rss = quick_xml::de::from_str(xml)?;

    let entries = rss
        .channel
        .items
        .into_iter()
        .map(|item| FeedEntry {
            title: item.title.unwrap_or_default(),
            link: item.link.unwrap_or_default(),
            updated: item.pub_date.as_deref().and_then(iso_timestamp),
            summary: summary(item.description.as_deref().unwrap_or("")),
        })
        .collect();

    Ok(AtomFeed {
        url: url.to_string(),
        title: rss.channel.title,
        entries,
    })
}

/// RFC 2822 date (as used by `pubDate`) to a naive UTC ISO timestamp.
fn iso_timestamp(pub_date: &str) -> Option<String> {
    DateTime::parse_from_rfc2822(pub_date.trim())
        .ok()
        .map(|d| d.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Plain-text teaser: markup dropped, whitespace collapsed, cut at a word
/// boundary.
pub fn summary(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let mut out = String::new();
    let mut truncated = false;
    let mut words = text.split_whitespace().peekable();
    while let Some(word) = words.peek() {
        let extra = if out.is_empty() { 0 } else { 1 };
        if out.chars().count() + extra + word.chars().count() > SUMMARY_LEN {
            // A single over-long word (a URL, say) is cut mid-word
            if out.is_empty() {
                out.extend(word.chars().take(SUMMARY_LEN));
            }
            truncated = true;
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        words.next();
    }

    if truncated {
        out.push_str(" …");
    }
    out
}

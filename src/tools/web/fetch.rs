//! Website fetch tool with SSRF protection
//!
//! Fetches a URL and reduces the page to plain text for the reasoning
//! collaborator. Requests to private and internal IP addresses are blocked
//! before any connection is made.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::{Error, Result};

/// Maximum characters of extracted page text handed to the model
const MAX_TEXT_CHARS: usize = 2000;

/// Block-level elements whose text makes up the readable page content
const CONTENT_SELECTOR: &str = "title, h1, h2, h3, h4, h5, h6, p, li, blockquote, pre";

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript)\b.*?</(script|style|noscript)>")
        .expect("static regex")
});

/// Website fetch tool
pub struct WebFetchTool {
    client: Client,
}

impl WebFetchTool {
    /// Create a new fetch tool with the given request timeout
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent("Mozilla/5.0 (compatible; StimmeGateway/0.1)")
            .build()
            .map_err(Error::Http)?;

        Ok(Self { client })
    }

    /// Fetch a URL and return its readable text, capped at 2000 characters.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the URL is malformed or not http/https
    /// - the hostname resolves to a blocked IP address
    /// - the HTTP request fails or returns a non-success status
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)
            .map_err(|e| Error::InputInvalid(format!("invalid URL: {e}")))?;

        let scheme = parsed.scheme();
        if scheme != "http" && scheme != "https" {
            return Err(Error::InputInvalid(format!(
                "unsupported scheme '{scheme}', only http and https are allowed"
            )));
        }

        let host = parsed
            .host_str()
            .ok_or_else(|| Error::InputInvalid("URL has no host".to_string()))?;
        let port = parsed
            .port()
            .unwrap_or(if scheme == "https" { 443 } else { 80 });
        check_ssrf(host, port)?;

        let response = self.client.get(parsed).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::InputInvalid(format!(
                "website returned HTTP {status}"
            )));
        }

        let html = response.text().await?;
        Ok(extract_page_text(&html))
    }
}

/// Reduce an HTML document to whitespace-normalized plain text.
///
/// Prefers the text of block-level content elements; falls back to the whole
/// document with script/style regions stripped when no blocks are found.
#[must_use]
pub fn extract_page_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let selector = Selector::parse(CONTENT_SELECTOR).expect("static selector");

    let mut pieces: Vec<String> = Vec::new();
    for element in document.select(&selector) {
        let text: String = element.text().collect::<Vec<_>>().join(" ");
        let text = normalize_whitespace(&text);
        if !text.is_empty() {
            pieces.push(text);
        }
    }

    let text = if pieces.is_empty() {
        // Pages without block markup: strip scripts and tags wholesale
        let stripped = SCRIPT_STYLE_RE.replace_all(html, " ");
        let fragment = Html::parse_document(&stripped);
        normalize_whitespace(&fragment.root_element().text().collect::<Vec<_>>().join(" "))
    } else {
        pieces.join(" ")
    };

    truncate_chars(&text, MAX_TEXT_CHARS)
}

/// Collapse all runs of whitespace into single spaces
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Truncate to at most `max` characters, appending an ellipsis when cut
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let truncated: String = text.chars().take(max).collect();
    format!("{truncated}...")
}

/// Resolve the host and reject blocked (private/internal) addresses
fn check_ssrf(host: &str, port: u16) -> Result<()> {
    let addrs = format!("{host}:{port}")
        .to_socket_addrs()
        .map_err(|e| Error::InputInvalid(format!("failed to resolve hostname: {e}")))?;

    for addr in addrs {
        if is_blocked_ip(addr.ip()) {
            return Err(Error::InputInvalid(format!(
                "blocked: {host} resolves to private/internal IP {}",
                addr.ip()
            )));
        }
    }

    Ok(())
}

/// Check if an IP address is private or otherwise blocked
///
/// Blocked ranges: IPv4 loopback, RFC 1918 private space, link-local and
/// the 0.0.0.0/8 current network; IPv6 loopback, unique-local (`fc00::/7`),
/// link-local (`fe80::/10`) and the unspecified address.
#[must_use]
pub fn is_blocked_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => is_blocked_ipv4(ipv4),
        IpAddr::V6(ipv6) => is_blocked_ipv6(ipv6),
    }
}

fn is_blocked_ipv4(ip: Ipv4Addr) -> bool {
    let octets = ip.octets();

    match octets[0] {
        0 | 10 | 127 => true,
        172 => (16..=31).contains(&octets[1]),
        192 => octets[1] == 168,
        169 => octets[1] == 254,
        _ => false,
    }
}

fn is_blocked_ipv6(ip: Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }

    let segments = ip.segments();

    // fc00::/7 unique local
    let first_byte = (segments[0] >> 8) as u8;
    if first_byte == 0xfc || first_byte == 0xfd {
        return true;
    }

    // fe80::/10 link-local
    segments[0] & 0xffc0 == 0xfe80
}

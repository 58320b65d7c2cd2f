//! Wikipedia lookup tool
//!
//! Resolves a query to an article via the opensearch endpoint, then pulls
//! the article summary from the REST API of the language-tagged wiki.

use serde::Deserialize;

use crate::{Error, Result};

/// Default number of summary sentences handed to the model
const DEFAULT_SENTENCES: usize = 3;

/// Wikipedia summary lookup
pub struct WikipediaTool {
    client: reqwest::Client,
    language: String,
}

/// Page summary from the Wikipedia REST API
#[derive(Debug, Deserialize)]
struct PageSummary {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    extract: String,
}

impl WikipediaTool {
    /// Create a lookup tool for the given language wiki (e.g. "de")
    #[must_use]
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            language: language.into(),
        }
    }

    /// Look up `query` and return a formatted summary.
    ///
    /// Produces user-facing German text for the three outcomes the original
    /// distinguishes: a summary, a disambiguation hint, and not-found.
    ///
    /// # Errors
    ///
    /// Returns error if the Wikipedia API cannot be reached or returns an
    /// unexpected payload.
    pub async fn lookup(&self, query: &str, sentences: Option<usize>) -> Result<String> {
        let titles = self.opensearch(query).await?;

        let Some(first) = titles.first() else {
            return Ok(format!("Kein Wikipedia-Artikel zu '{query}' gefunden."));
        };

        let summary = self.summary(first).await?;

        if summary.kind == "disambiguation" {
            let options = titles
                .iter()
                .skip(1)
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            return Ok(if options.is_empty() {
                format!("Mehrere Artikel zu '{query}' gefunden. Bitte präzisiere die Anfrage.")
            } else {
                format!("Mehrere Artikel gefunden. Bitte präzisiere: {options}")
            });
        }

        let wanted = sentences.unwrap_or(DEFAULT_SENTENCES);
        let summary_text = first_sentences(&summary.extract, wanted);

        if summary_text.is_empty() {
            return Ok(format!("Kein Wikipedia-Artikel zu '{query}' gefunden."));
        }

        Ok(format!(
            "Wikipedia-Information zu '{query}':\n\n{summary_text}"
        ))
    }

    /// Resolve a free-text query to candidate article titles
    async fn opensearch(&self, query: &str) -> Result<Vec<String>> {
        let url = format!("https://{}.wikipedia.org/w/api.php", self.language);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("action", "opensearch"),
                ("search", query),
                ("limit", "5"),
                ("format", "json"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(Error::Http)?;

        // Opensearch returns [query, [titles], [descriptions], [urls]]
        let payload: serde_json::Value = response.json().await?;
        let titles = payload
            .get(1)
            .and_then(|v| v.as_array())
            .map(|titles| {
                titles
                    .iter()
                    .filter_map(|t| t.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        Ok(titles)
    }

    /// Fetch the REST summary for an exact article title
    async fn summary(&self, title: &str) -> Result<PageSummary> {
        let url = format!(
            "https://{}.wikipedia.org/api/rest_v1/page/summary/{}",
            self.language,
            urlencoding::encode(title)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(Error::Http)?;

        Ok(response.json().await?)
    }
}

/// Take the first `count` sentences of `text` (split on sentence-ending
/// punctuation followed by whitespace).
fn first_sentences(text: &str, count: usize) -> String {
    if count == 0 {
        return String::new();
    }

    let mut found = 0;
    let bytes = text.as_bytes();
    for i in 0..bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?')
            && bytes.get(i + 1).is_none_or(|b| b.is_ascii_whitespace())
        {
            found += 1;
            if found == count {
                return text[..=i].trim().to_string();
            }
        }
    }

    text.trim().to_string()
}

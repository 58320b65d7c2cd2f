//! Tools callable by the reasoning collaborator
//!
//! Definitions are OpenAI-style function schemas; dispatch turns a tool call
//! into a result string for the model. A tool failure never fails the turn —
//! the model receives an explanatory German string instead.

pub mod calculator;
pub mod clock;
pub mod web;
pub mod wikipedia;

use serde_json::json;

pub use web::{SearchProvider, SearchResult, WebFetchTool, WebSearchTool};
pub use wikipedia::WikipediaTool;

use crate::config::{Config, SearchCredentials};
use crate::Result;

/// Default number of web search results
const DEFAULT_SEARCH_RESULTS: usize = 10;

/// The tool set exposed to the reasoning collaborator
pub struct ToolSet {
    search: Option<WebSearchTool>,
    fetch: WebFetchTool,
    wikipedia: WikipediaTool,
}

impl ToolSet {
    /// Build the tool set from gateway configuration.
    ///
    /// Web search is only offered when search credentials are configured.
    ///
    /// # Errors
    ///
    /// Returns error if the fetch HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self> {
        let search = config.search.as_ref().map(|creds| match creds {
            SearchCredentials::Brave(key) => WebSearchTool::new_brave(key.clone()),
            SearchCredentials::Serper(key) => WebSearchTool::new_serper(key.clone()),
        });

        Ok(Self {
            search,
            fetch: WebFetchTool::new(config.request_timeout)?,
            wikipedia: WikipediaTool::new(config.language.clone()),
        })
    }

    /// Function-call definitions in the OpenAI tools wire format
    #[must_use]
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        let mut tools = Vec::new();

        if self.search.is_some() {
            tools.push(json!({
                "type": "function",
                "function": {
                    "name": "web_search",
                    "description": "Search the web for current information. For local searches (restaurants, shops, etc.), include location-specific terms.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "query": {"type": "string", "description": "The search query"},
                            "max_results": {"type": "integer", "description": "Maximum number of results (default 10)"}
                        },
                        "required": ["query"]
                    }
                }
            }));
        }

        tools.push(json!({
            "type": "function",
            "function": {
                "name": "wikipedia_search",
                "description": "Search Wikipedia for factual, encyclopedic information.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "query": {"type": "string", "description": "The topic to look up"},
                        "sentences": {"type": "integer", "description": "Number of summary sentences (default 3)"}
                    },
                    "required": ["query"]
                }
            }
        }));

        tools.push(json!({
            "type": "function",
            "function": {
                "name": "fetch_website",
                "description": "Fetch and extract the text content of a web page. Use only when a specific URL is requested.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "url": {"type": "string", "description": "The URL to fetch"}
                    },
                    "required": ["url"]
                }
            }
        }));

        tools.push(json!({
            "type": "function",
            "function": {
                "name": "calculator",
                "description": "Evaluate a mathematical expression, e.g. '2 + 2', 'sqrt(16)', 'pow(2, 10)'.",
                "parameters": {
                    "type": "object",
                    "properties": {
                        "expression": {"type": "string", "description": "Expression to evaluate"}
                    },
                    "required": ["expression"]
                }
            }
        }));

        tools.push(json!({
            "type": "function",
            "function": {
                "name": "get_current_time",
                "description": "Get the current date and time.",
                "parameters": {
                    "type": "object",
                    "properties": {}
                }
            }
        }));

        tools
    }

    /// Execute a tool call and return the result text for the model.
    ///
    /// `arguments` is the raw JSON argument string from the tool call.
    pub async fn dispatch(&self, name: &str, arguments: &str) -> String {
        let args: serde_json::Value =
            serde_json::from_str(arguments).unwrap_or_else(|_| json!({}));

        tracing::info!(tool = name, "executing tool call");

        match name {
            "web_search" => self.run_web_search(&args).await,
            "wikipedia_search" => self.run_wikipedia(&args).await,
            "fetch_website" => self.run_fetch(&args).await,
            "calculator" => match args.get("expression").and_then(|v| v.as_str()) {
                Some(expression) => calculator::calculate(expression),
                None => "Es wurde kein Ausdruck angegeben.".to_string(),
            },
            "get_current_time" => clock::current_time(),
            _ => format!("Unbekanntes Tool: {name}"),
        }
    }

    async fn run_web_search(&self, args: &serde_json::Value) -> String {
        let Some(search) = &self.search else {
            return "Die Websuche ist nicht konfiguriert.".to_string();
        };
        let Some(query) = args.get("query").and_then(|v| v.as_str()) else {
            return "Es wurde keine Suchanfrage angegeben.".to_string();
        };
        let limit = args
            .get("max_results")
            .and_then(serde_json::Value::as_u64)
            .map_or(DEFAULT_SEARCH_RESULTS, |n| n as usize);

        match search.search(query, Some(limit)).await {
            Ok(results) => web::search::format_results(query, &results),
            Err(e) => {
                tracing::warn!(error = %e, "web search failed");
                format!(
                    "Die Websuche hatte ein Problem ({e}). Ich kann trotzdem versuchen, \
                     mit anderen Informationsquellen weiterzuhelfen."
                )
            }
        }
    }

    async fn run_wikipedia(&self, args: &serde_json::Value) -> String {
        let Some(query) = args.get("query").and_then(|v| v.as_str()) else {
            return "Es wurde kein Thema angegeben.".to_string();
        };
        let sentences = args
            .get("sentences")
            .and_then(serde_json::Value::as_u64)
            .map(|n| n as usize);

        match self.wikipedia.lookup(query, sentences).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "wikipedia lookup failed");
                format!("Fehler bei Wikipedia-Suche: {e}")
            }
        }
    }

    async fn run_fetch(&self, args: &serde_json::Value) -> String {
        let Some(url) = args.get("url").and_then(|v| v.as_str()) else {
            return "Es wurde keine URL angegeben.".to_string();
        };

        match self.fetch.fetch_text(url).await {
            Ok(text) => format!("Inhalt von {url}:\n\n{text}"),
            Err(e) => {
                tracing::warn!(url, error = %e, "website fetch failed");
                format!("Fehler beim Abrufen der Website: {e}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_tool_set(with_search: bool) -> ToolSet {
        ToolSet {
            search: with_search.then(|| WebSearchTool::new_brave("test-key".to_string())),
            fetch: WebFetchTool::new(Duration::from_secs(5)).unwrap(),
            wikipedia: WikipediaTool::new("de"),
        }
    }

    #[test]
    fn definitions_include_search_only_when_configured() {
        let names = |tools: &ToolSet| -> Vec<String> {
            tools
                .definitions()
                .iter()
                .filter_map(|t| t["function"]["name"].as_str().map(String::from))
                .collect()
        };

        let with = names(&test_tool_set(true));
        assert_eq!(
            with,
            vec![
                "web_search",
                "wikipedia_search",
                "fetch_website",
                "calculator",
                "get_current_time"
            ]
        );

        let without = names(&test_tool_set(false));
        assert!(!without.contains(&"web_search".to_string()));
        assert_eq!(without.len(), 4);
    }

    #[tokio::test]
    async fn dispatch_calculator() {
        let tools = test_tool_set(false);
        let result = tools
            .dispatch("calculator", r#"{"expression": "123 * 456"}"#)
            .await;
        assert_eq!(result, "Berechnung: 123 * 456 = 56088");
    }

    #[tokio::test]
    async fn dispatch_current_time() {
        let tools = test_tool_set(false);
        let result = tools.dispatch("get_current_time", "{}").await;
        assert!(result.starts_with("Aktuelle Zeit:"));
        assert!(result.ends_with("Uhr"));
    }

    #[tokio::test]
    async fn dispatch_unknown_tool() {
        let tools = test_tool_set(false);
        let result = tools.dispatch("teleport", "{}").await;
        assert_eq!(result, "Unbekanntes Tool: teleport");
    }

    #[tokio::test]
    async fn dispatch_search_without_provider() {
        let tools = test_tool_set(false);
        let result = tools
            .dispatch("web_search", r#"{"query": "pizza"}"#)
            .await;
        assert_eq!(result, "Die Websuche ist nicht konfiguriert.");
    }

    #[tokio::test]
    async fn dispatch_tolerates_malformed_arguments() {
        let tools = test_tool_set(false);
        let result = tools.dispatch("calculator", "not json at all").await;
        assert_eq!(result, "Es wurde kein Ausdruck angegeben.");
    }

    #[tokio::test]
    async fn dispatch_rejects_invalid_fetch_url() {
        let tools = test_tool_set(false);
        let result = tools
            .dispatch("fetch_website", r#"{"url": "ftp://example.com"}"#)
            .await;
        assert!(result.starts_with("Fehler beim Abrufen der Website:"));
    }
}

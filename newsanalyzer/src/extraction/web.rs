use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::io::Cursor;
use std::time::Duration;
use tracing::{info, warn};

use common::ExtractionConfig;

use super::{nlp, ArticleExtractor, RawArticle};

const DEFAULT_TIMEOUT_SECS: u64 = 20;
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; NewsAnalyzer/0.1)";
const DEFAULT_SUMMARY_SENTENCES: usize = 5;
const DEFAULT_MAX_KEYWORDS: usize = 10;
/// Used when the page declares no language
const FALLBACK_LANGUAGE: &str = "en";

/// Fetches article pages over HTTP and extracts them with readability.
pub struct WebExtractor {
    client: Client,
    summary_sentences: usize,
    max_keywords: usize,
}

impl WebExtractor {
    pub fn new(config: &ExtractionConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)))
            .user_agent(config.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            client,
            summary_sentences: config.summary_sentences.unwrap_or(DEFAULT_SUMMARY_SENTENCES),
            max_keywords: config.max_keywords.unwrap_or(DEFAULT_MAX_KEYWORDS),
        })
    }
}

#[async_trait::async_trait]
impl ArticleExtractor for WebExtractor {
    async fn extract(&self, url: &str) -> Result<RawArticle> {
        let parsed_url = url::Url::parse(url).context("failed to parse article URL")?;

        let response = self
            .client
            .get(parsed_url.clone())
            .send()
            .await
            .context("failed to fetch article page")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("article fetch failed with status: {}", status);
        }

        let html = response.text().await.context("failed to read response body")?;
        let article = parse_article(&html, &parsed_url, self.summary_sentences, self.max_keywords)?;
        info!(
            url,
            language = %article.language,
            chars = article.text.len(),
            authors = article.authors.len(),
            "extraction: article parsed"
        );
        Ok(article)
    }
}

/// Extract an article from an HTML document.
pub fn parse_article(
    html: &str,
    url: &url::Url,
    summary_sentences: usize,
    max_keywords: usize,
) -> Result<RawArticle> {
    // Readability requires a Reader
    let mut reader = Cursor::new(html.as_bytes());
    let product = readability::extractor::extract(&mut reader, url)
        .map_err(|e| anyhow::anyhow!("readability failed for {}: {}", url, e))?;

    let mut text = product.text.trim().to_string();
    if text.is_empty() {
        // readability sometimes keeps markup but no text node; render it instead
        match html2text::from_read(product.content.as_bytes(), 80) {
            Ok(rendered) => text = rendered.trim().to_string(),
            Err(e) => warn!("extraction: failed to render extracted HTML as text: {}", e),
        }
    }
    if text.is_empty() {
        anyhow::bail!("no article text found at {}", url);
    }

    let document = Html::parse_document(html);
    let title = if product.title.trim().is_empty() {
        meta_content(&document, "meta[property='og:title']")
            .or_else(|| first_text(&document, "title"))
            .unwrap_or_default()
    } else {
        product.title.trim().to_string()
    };

    let language = detect_language(&document).unwrap_or_else(|| FALLBACK_LANGUAGE.to_string());
    let authors = extract_authors(&document);
    let keywords = nlp::keywords(&text, &language, max_keywords);
    let summary = nlp::summarize(&title, &text, &language, summary_sentences);

    Ok(RawArticle {
        title,
        text,
        language,
        authors,
        keywords,
        summary,
    })
}

fn meta_content(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn first_text(document: &Html, selector: &str) -> Option<String> {
    let selector = Selector::parse(selector).ok()?;
    document
        .select(&selector)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .find(|s| !s.is_empty())
}

/// Language from `<html lang>`, then `content-language`, then `og:locale`.
fn detect_language(document: &Html) -> Option<String> {
    let html_lang = Selector::parse("html[lang]").ok().and_then(|selector| {
        document
            .select(&selector)
            .filter_map(|el| el.value().attr("lang"))
            .find_map(nlp::normalize_language)
    });

    html_lang
        .or_else(|| {
            meta_content(document, "meta[http-equiv='content-language']")
                .and_then(|v| nlp::normalize_language(&v))
        })
        .or_else(|| {
            meta_content(document, "meta[property='og:locale']").and_then(|v| nlp::normalize_language(&v))
        })
}

/// Authors from JSON-LD metadata, then from author meta tags.
fn extract_authors(document: &Html) -> Vec<String> {
    let mut authors: Vec<String> = Vec::new();
    let mut push = |name: &str| {
        let name = name.trim();
        if !name.is_empty() && !name.starts_with("http") && !authors.iter().any(|a| a == name) {
            authors.push(name.to_string());
        }
    };

    if let Ok(script_selector) = Selector::parse("script[type='application/ld+json']") {
        for script in document.select(&script_selector) {
            let raw = script.text().collect::<String>();
            let Ok(json) = serde_json::from_str::<serde_json::Value>(raw.trim()) else {
                continue;
            };
            // JSON-LD may be a single object, a list, or an @graph
            let nodes: Vec<&serde_json::Value> = match &json {
                serde_json::Value::Array(items) => items.iter().collect(),
                other => match other.get("@graph").and_then(|g| g.as_array()) {
                    Some(graph) => graph.iter().collect(),
                    None => vec![other],
                },
            };
            for node in nodes {
                match node.get("author") {
                    Some(serde_json::Value::Array(arr)) => {
                        for author in arr {
                            if let Some(name) = author.get("name").and_then(|n| n.as_str()) {
                                push(name);
                            } else if let Some(name) = author.as_str() {
                                push(name);
                            }
                        }
                    }
                    Some(serde_json::Value::Object(obj)) => {
                        if let Some(name) = obj.get("name").and_then(|n| n.as_str()) {
                            push(name);
                        }
                    }
                    Some(serde_json::Value::String(s)) => push(s.as_str()),
                    _ => {}
                }
            }
        }
    }

    for selector in ["meta[name='author']", "meta[property='article:author']"] {
        if let Ok(selector) = Selector::parse(selector) {
            for el in document.select(&selector) {
                if let Some(content) = el.value().attr("content") {
                    push(content);
                }
            }
        }
    }

    authors
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html lang="fr-FR">
<head>
  <title>Le conseil adopte le budget | Journal</title>
  <meta name="author" content="Marie Curie">
  <script type="application/ld+json">
    {"@type": "NewsArticle", "author": [{"@type": "Person", "name": "Jean Dupont"}, {"name": "Marie Curie"}]}
  </script>
</head>
<body>
  <article>
    <h1>Le conseil adopte le budget</h1>
    <p>Le conseil municipal a adopté mardi le nouveau budget des transports, après un long débat entre les élus de la majorité et ceux de l'opposition.</p>
    <p>Le budget prévoit douze nouvelles lignes de bus dans toute la ville, ainsi que la rénovation de plusieurs stations de tramway vieillissantes.</p>
    <p>Les critiques estiment que le plan des transports ignore les habitants des quartiers périphériques, qui attendent depuis des années.</p>
  </article>
</body>
</html>"#;

    fn url() -> url::Url {
        url::Url::parse("https://example.com/politique/budget").unwrap()
    }

    #[test]
    fn test_detect_language_and_authors() {
        let document = Html::parse_document(PAGE);
        assert_eq!(detect_language(&document).as_deref(), Some("fr"));
        assert_eq!(extract_authors(&document), vec!["Jean Dupont", "Marie Curie"]);
    }

    #[test]
    fn test_language_from_og_locale() {
        let document = Html::parse_document(
            r#"<html><head><meta property="og:locale" content="de_DE"></head><body></body></html>"#,
        );
        assert_eq!(detect_language(&document).as_deref(), Some("de"));
        let bare = Html::parse_document("<html><body></body></html>");
        assert_eq!(detect_language(&bare), None);
    }

    #[test]
    fn test_parse_article() {
        let article = parse_article(PAGE, &url(), 5, 5).expect("parse article");
        assert!(!article.title.is_empty());
        assert_eq!(article.language, "fr");
        assert!(article.text.contains("budget des transports"));
        assert!(!article.summary.is_empty());
        assert!(article.keywords.len() <= 5);
        assert!(article.keywords.contains(&"budget".to_string()));
        assert!(!article.keywords.iter().any(|k| ["les", "des", "pour", "dans"].contains(&k.as_str())));
        assert_eq!(article.authors.len(), 2);
    }

    #[test]
    fn test_parse_article_without_text_fails() {
        assert!(parse_article("<html><body></body></html>", &url(), 5, 5).is_err());
    }
}

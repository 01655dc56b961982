// src/job_source.rs
//! Target job description for a tweak: pasted text, or a posting URL to scrape
use anyhow::{Context, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;

use crate::app_log;
use crate::utils::is_http_url;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
}

impl JobPosting {
    /// Text handed to the model as the target job.
    pub fn to_prompt_text(&self) -> String {
        let mut parts = Vec::new();
        if !self.title.is_empty() {
            parts.push(format!("Job Title: {}", self.title));
        }
        if !self.company.is_empty() {
            parts.push(format!("Company: {}", self.company));
        }
        if !self.location.is_empty() {
            parts.push(format!("Location: {}", self.location));
        }
        parts.push(self.description.clone());
        parts.join("\n")
    }
}

pub struct JobSource {
    client: Client,
}

impl JobSource {
    pub fn new(timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    /// Pasted text is used as is; an `http(s)` URL is fetched and scraped.
    pub async fn resolve(&self, input: &str) -> Result<String> {
        let input = input.trim();
        if input.is_empty() {
            anyhow::bail!("Please paste a job description or URL");
        }
        if !is_http_url(input) {
            return Ok(input.to_string());
        }
        Ok(self.fetch_posting(input).await?.to_prompt_text())
    }

    pub async fn fetch_posting(&self, url: &str) -> Result<JobPosting> {
        app_log!(info, "Fetching job post: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch job post")?;

        if !response.status().is_success() {
            anyhow::bail!("HTTP error: {}", response.status());
        }

        let html = response
            .text()
            .await
            .context("Failed to read response body")?;

        let posting = parse_posting(&html).context("Failed to extract job content from page")?;
        app_log!(
            info,
            "Extracted job: {} at {}",
            posting.title,
            if posting.company.is_empty() { "unknown company" } else { &posting.company }
        );
        Ok(posting)
    }
}

/// LinkedIn markup first, then generic selectors.
pub fn parse_posting(html: &str) -> Option<JobPosting> {
    let document = Html::parse_document(html);
    parse_linkedin(&document).or_else(|| parse_generic(&document))
}

fn parse_linkedin(document: &Html) -> Option<JobPosting> {
    let title = find_text(
        document,
        &[
            "h1.top-card-layout__title",
            ".job-details-jobs-unified-top-card__job-title",
            "h1[data-test-id='job-title']",
            ".jobs-unified-top-card__job-title",
        ],
    )?;
    let company = find_text(
        document,
        &[
            ".job-details-jobs-unified-top-card__company-name",
            ".top-card-layout__card .top-card-layout__second-subline",
            "a[data-test-id='job-poster-name']",
            ".jobs-unified-top-card__company-name",
        ],
    )?;
    let description = find_text(
        document,
        &[
            ".jobs-box__html-content",
            ".jobs-description__container",
            ".jobs-description-content__text",
            ".show-more-less-html__markup",
            "[data-test-id='job-description']",
        ],
    )?;
    let location = find_text(
        document,
        &[
            ".job-details-jobs-unified-top-card__bullet",
            ".top-card-layout__card .top-card-layout__first-subline",
            "[data-test-id='job-location']",
            ".jobs-unified-top-card__bullet",
        ],
    )
    .unwrap_or_default();

    Some(JobPosting {
        title,
        company,
        location,
        description,
    })
}

fn parse_generic(document: &Html) -> Option<JobPosting> {
    app_log!(warn, "Falling back to generic job parsing");

    let title = find_text(
        document,
        &["h1", "[class*='job-title']", "[class*='title']", "[class*='position']"],
    )?;
    let company = find_text(
        document,
        &["[class*='company']", "[class*='employer']", "[class*='organization']"],
    )
    .unwrap_or_default();
    let description = find_text(
        document,
        &[
            "[class*='description']",
            "[class*='content']",
            "[class*='details']",
            "main",
            "article",
            "body",
        ],
    )?;

    Some(JobPosting {
        title,
        company,
        location: String::new(),
        description,
    })
}

fn find_text(document: &Html, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|s| Selector::parse(s).ok())
        .find_map(|selector| {
            document
                .select(&selector)
                .map(|element| clean_text(&element.text().collect::<Vec<_>>().join(" ")))
                .find(|text| text.chars().count() > 5)
        })
}

fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linkedin_markup() {
        let html = r#"<html><body>
            <h1 class="top-card-layout__title">Senior Rust Engineer</h1>
            <div class="top-card-layout__card">
              <span class="top-card-layout__second-subline">Ferris Labs</span>
              <span class="top-card-layout__first-subline">Remote, EU</span>
            </div>
            <div class="show-more-less-html__markup">
              Build   async services.
              <ul><li>Tokio</li><li>SQLite</li></ul>
            </div>
        </body></html>"#;

        let posting = parse_posting(html).unwrap();
        assert_eq!(posting.title, "Senior Rust Engineer");
        assert_eq!(posting.company, "Ferris Labs");
        assert_eq!(posting.location, "Remote, EU");
        assert_eq!(posting.description, "Build async services. Tokio SQLite");
    }

    #[test]
    fn test_generic_fallback() {
        let html = r#"<html><body>
            <h1>Backend Developer</h1>
            <div class="company-name">Acme Corp</div>
            <main>We are looking for a backend developer.</main>
        </body></html>"#;

        let posting = parse_posting(html).unwrap();
        assert_eq!(posting.title, "Backend Developer");
        assert_eq!(posting.company, "Acme Corp");
        assert_eq!(posting.description, "We are looking for a backend developer.");
        assert!(posting.to_prompt_text().starts_with("Job Title: Backend Developer\nCompany: Acme Corp\n"));
    }

    #[test]
    fn test_page_without_title_is_rejected() {
        assert!(parse_posting("<html><body><p>nothing</p></body></html>").is_none());
    }

    #[tokio::test]
    async fn test_pasted_text_passes_through() {
        let source = JobSource::new(5).unwrap();
        let text = source.resolve("  We need a Rust dev  ").await.unwrap();
        assert_eq!(text, "We need a Rust dev");
        assert!(source.resolve("   ").await.is_err());
    }
}

//! Defines the generator that turns the expense list into a natural-language
//! spending summary via an external text-generation service.

use std::env;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;

use crate::{Error, expense::Expense};

/// The base URL of the Google Gemini REST API.
const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// The model used to generate spending summaries.
const GEMINI_MODEL: &str = "gemini-2.5-flash";

/// The environment variable holding the external service credential.
pub const API_KEY_ENV_VAR: &str = "GEMINI_API_KEY";

/// The fixed summary returned when there are no expenses to analyze.
///
/// Returned without contacting the external service.
pub const EMPTY_SUMMARY_MESSAGE: &str = "No expenses to analyze.";

/// Generates natural-language spending summaries from the expense list.
///
/// Constructed once at startup and injected into the API layer. When the
/// external service credential is missing at startup the generator is
/// permanently unavailable and every call to [SummaryGenerator::summarize]
/// fails with [Error::SummaryUnavailable].
#[derive(Debug, Clone)]
pub struct SummaryGenerator {
    client: Option<GeminiClient>,
}

impl SummaryGenerator {
    /// Create a generator from the `GEMINI_API_KEY` environment variable.
    ///
    /// A missing or empty variable yields an unavailable generator rather
    /// than an error so that the rest of the API can keep serving requests.
    pub fn from_env() -> Self {
        match env::var(API_KEY_ENV_VAR) {
            Ok(api_key) if !api_key.is_empty() => Self::new(GEMINI_API_URL, &api_key),
            _ => {
                tracing::warn!(
                    "{API_KEY_ENV_VAR} is not set, the AI summary endpoint will be unavailable"
                );
                Self::disabled()
            }
        }
    }

    /// Create a generator that talks to the service at `base_url`.
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            client: Some(GeminiClient {
                http: reqwest::Client::new(),
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            }),
        }
    }

    /// Create a generator with no client, for when no credential is configured.
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Produce a natural-language summary of `expenses`.
    ///
    /// An empty expense list yields [EMPTY_SUMMARY_MESSAGE] without
    /// contacting the external service. Otherwise the full expense list is
    /// embedded in a prompt and sent to the service, and its text response
    /// is returned verbatim. Failures are never retried.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::SummaryUnavailable] if the generator was constructed
    ///   without a credential,
    /// - or [Error::SummaryFailed] if the external service could not be
    ///   reached, responded with a non-success status, or returned a
    ///   response with no text.
    pub async fn summarize(&self, expenses: &[Expense]) -> Result<String, Error> {
        let client = self.client.as_ref().ok_or(Error::SummaryUnavailable)?;

        if expenses.is_empty() {
            return Ok(EMPTY_SUMMARY_MESSAGE.to_string());
        }

        client.generate_content(&build_prompt(expenses)).await
    }
}

/// Build the prompt sent to the text-generation service.
///
/// The prompt is deterministic for a given expense list.
fn build_prompt(expenses: &[Expense]) -> String {
    let mut prompt = String::from(
        "You are a friendly and professional finance assistant.\n\
         Below is the user's recent expense history, most recent first:\n",
    );

    for expense in expenses {
        let timestamp = expense
            .timestamp
            .format(&Rfc3339)
            .unwrap_or_else(|_| expense.timestamp.to_string());
        let description = expense.description.as_deref().unwrap_or("no description");

        prompt.push_str(&format!(
            "- {timestamp}: {:.2} on {} ({description})\n",
            expense.amount, expense.category
        ));
    }

    prompt.push_str(
        "\nBased on these expenses, report the following and nothing else:\n\
         1. Total spend over roughly the last week.\n\
         2. The top 3 categories by total spend, with the total for each.\n\
         3. A short observation about the spending pattern and one suggestion \
         (2-3 sentences).\n",
    );

    prompt
}

/// A thin client for the Gemini `generateContent` REST endpoint.
#[derive(Debug, Clone)]
struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

impl GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<String, Error> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, GEMINI_MODEL
        );
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .map_err(|error| Error::SummaryFailed(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::SummaryFailed(format!(
                "the generation service returned {status}: {body}"
            )));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|error| Error::SummaryFailed(error.to_string()))?;

        response
            .candidates
            .into_iter()
            .next()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .into_iter()
                    .map(|part| part.text)
                    .collect::<String>()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                Error::SummaryFailed("the generation service returned no text".to_string())
            })
    }
}

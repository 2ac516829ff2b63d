//! Language-model collaborators: question answering, summarization and
//! sentiment, all served by OpenAI chat completions
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.3.0
//!
//! ## Changelog
//! - 1.1.0: Sentiment classification with a JSON reply contract
//! - 1.0.0: Extractive answers over encyclopedia context, summaries

use async_trait::async_trait;
use log::debug;
use openai::chat::{ChatCompletion, ChatCompletionMessage, ChatCompletionMessageRole};
use serde::Deserialize;

use crate::core::ServiceError;

const SERVICE: &str = "models";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Negative,
    /// Only produced when classification is unavailable
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentiment {
    pub label: SentimentLabel,
    pub confidence: f32,
}

impl Sentiment {
    pub fn neutral() -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.5,
        }
    }
}

#[async_trait]
pub trait QuestionAnswering: Send + Sync {
    /// Answer `question` from `context` alone
    async fn answer(&self, question: &str, context: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError>;
}

#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment, ServiceError>;
}

const QA_SYSTEM_PROMPT: &str = "You answer questions using only the supplied context. \
Reply with the shortest span of the context that answers the question. \
If the context does not contain the answer, reply with an empty message.";

const SENTIMENT_SYSTEM_PROMPT: &str = "Classify the sentiment of the user's message. \
Reply with JSON only, in the form {\"label\": \"POSITIVE\" or \"NEGATIVE\", \"score\": number between 0 and 1}.";

fn message(role: ChatCompletionMessageRole, content: String) -> ChatCompletionMessage {
    ChatCompletionMessage {
        role,
        content: Some(content),
        name: None,
        function_call: None,
        tool_call_id: None,
        tool_calls: None,
    }
}

pub fn qa_prompt(question: &str, context: &str) -> String {
    format!("Context:\n{context}\n\nQuestion: {question}")
}

pub fn summary_prompt(max_words: usize) -> String {
    format!(
        "Summarize the user's text in at most {max_words} words. \
         Keep it suitable for reading aloud."
    )
}

#[derive(Deserialize)]
struct SentimentReply {
    label: String,
    score: f32,
}

/// Parse the classifier's JSON reply, tolerating surrounding prose or code fences
pub fn parse_sentiment(reply: &str) -> Result<Sentiment, ServiceError> {
    let start = reply.find('{');
    let end = reply.rfind('}');
    let json = match (start, end) {
        (Some(s), Some(e)) if s < e => &reply[s..=e],
        _ => return Err(ServiceError::malformed(SERVICE, "no JSON object in reply")),
    };

    let parsed: SentimentReply =
        serde_json::from_str(json).map_err(|e| ServiceError::malformed(SERVICE, e))?;

    let label = match parsed.label.to_uppercase().as_str() {
        "POSITIVE" => SentimentLabel::Positive,
        "NEGATIVE" => SentimentLabel::Negative,
        other => {
            return Err(ServiceError::malformed(
                SERVICE,
                format!("unknown label {other}"),
            ))
        }
    };

    Ok(Sentiment {
        label,
        confidence: parsed.score.clamp(0.0, 1.0),
    })
}

/// Chat-completion backed models.
///
/// The API key is read by the `openai` crate from the environment; the
/// binary exports it at startup. `configured` records whether a key was present.
pub struct OpenAiModels {
    model: String,
    configured: bool,
    summary_max_words: usize,
}

impl OpenAiModels {
    pub fn new(model: String, configured: bool, summary_max_words: usize) -> Self {
        Self {
            model,
            configured,
            summary_max_words,
        }
    }

    async fn complete(&self, system: String, user: String) -> Result<String, ServiceError> {
        if !self.configured {
            return Err(ServiceError::NotConfigured(SERVICE));
        }

        let completion = ChatCompletion::builder(
            &self.model,
            vec![
                message(ChatCompletionMessageRole::System, system),
                message(ChatCompletionMessageRole::User, user),
            ],
        )
        .create()
        .await
        .map_err(|e| ServiceError::unavailable(SERVICE, e))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "{} used {} prompt / {} completion tokens",
                self.model, usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| ServiceError::malformed(SERVICE, "no choices returned"))
    }
}

#[async_trait]
impl QuestionAnswering for OpenAiModels {
    async fn answer(&self, question: &str, context: &str) -> Result<String, ServiceError> {
        self.complete(QA_SYSTEM_PROMPT.to_string(), qa_prompt(question, context))
            .await
    }
}

#[async_trait]
impl Summarizer for OpenAiModels {
    async fn summarize(&self, text: &str) -> Result<String, ServiceError> {
        let summary = self
            .complete(summary_prompt(self.summary_max_words), text.to_string())
            .await?;
        Ok(crate::core::truncate_words(&summary, self.summary_max_words))
    }
}

#[async_trait]
impl SentimentClassifier for OpenAiModels {
    async fn classify(&self, text: &str) -> Result<Sentiment, ServiceError> {
        let reply = self
            .complete(SENTIMENT_SYSTEM_PROMPT.to_string(), text.to_string())
            .await?;
        parse_sentiment(&reply)
    }
}

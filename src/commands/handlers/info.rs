//! Information intent handlers
//!
//! Handles: news, search
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: Summarize descriptions and snippets before reading them out
//! - 1.0.0: Top headlines and web search

use anyhow::Result;
use async_trait::async_trait;
use log::{error, warn};
use std::sync::Arc;

use crate::commands::context::AssistantContext;
use crate::commands::handler::{Flow, IntentHandler};
use crate::commands::intent::Intent;
use crate::core::truncate_words;

/// Handler for information intents: news, search
pub struct InfoHandler;

#[async_trait]
impl IntentHandler for InfoHandler {
    fn intents(&self) -> &'static [Intent] {
        &[Intent::News, Intent::Search]
    }

    async fn handle(
        &self,
        ctx: Arc<AssistantContext>,
        intent: Intent,
        _utterance: &str,
    ) -> Result<Flow> {
        match intent {
            Intent::News => self.handle_news(&ctx).await,
            Intent::Search => self.handle_search(&ctx).await,
            _ => {}
        }
        Ok(Flow::Continue)
    }
}

impl InfoHandler {
    async fn handle_news(&self, ctx: &AssistantContext) {
        ctx.say("Fetching the latest news headlines.").await;

        let articles = match ctx.call("news", ctx.services.news.top_headlines()).await {
            Ok(articles) => articles,
            Err(e) => {
                error!("News error: {e}");
                let reply = if e.is_retryable() {
                    "Sorry, I couldn't fetch the news right now."
                } else {
                    "Something went wrong while fetching the news."
                };
                ctx.say(reply).await;
                return;
            }
        };

        if articles.is_empty() {
            ctx.say("No news found at the moment. Please try again later.").await;
            return;
        }

        let mut items = Vec::with_capacity(articles.len());
        for article in &articles {
            let item = match &article.description {
                Some(description) => {
                    format!("{}\n{}", article.title, summarize(ctx, description).await)
                }
                None => article.title.clone(),
            };
            items.push(item);
        }
        ctx.say(&format!(
            "Here are the top news headlines:\n{}",
            items.join("\n\n")
        ))
        .await;
    }

    async fn handle_search(&self, ctx: &AssistantContext) {
        let query = ctx.ask("What would you like to search for?").await;
        if query.is_empty() {
            ctx.say("Please specify a search query.").await;
            return;
        }

        let results = match ctx.call("search", ctx.services.search.search(&query)).await {
            Ok(results) => results,
            Err(e) => {
                error!("Web search error for {query:?}: {e}");
                ctx.say("Something went wrong while performing the search.").await;
                return;
            }
        };

        if results.is_empty() {
            ctx.say("No results found for that query.").await;
            return;
        }

        let mut items = Vec::with_capacity(results.len());
        for result in &results {
            items.push(format!("{}\n{}", result.title, summarize(ctx, &result.snippet).await));
        }
        ctx.say(&format!(
            "Here are the top search results:\n{}",
            items.join("\n\n")
        ))
        .await;
    }
}

/// Summarize for speech, falling back to a word-truncated original
async fn summarize(ctx: &AssistantContext, text: &str) -> String {
    match ctx.call("models", ctx.services.summarizer.summarize(text)).await {
        Ok(summary) if !summary.trim().is_empty() => summary,
        Ok(_) => truncate_words(text, ctx.settings.answers.summary_max_words),
        Err(e) => {
            warn!("Summarization unavailable, reading original text: {e}");
            truncate_words(text, ctx.settings.answers.summary_max_words)
        }
    }
}

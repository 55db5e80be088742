// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Expense categorization and saving tips from a hosted language model.
//!
//! Both calls are single-shot: any failure comes back as an [`AiError`] with
//! no partial result, and retrying is left to the user.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::AiConfig;
use crate::currency::Currency;
use crate::ledger::{Ledger, Totals};
use crate::models::Category;
use crate::utils::http_client;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("no API key configured (set CLARITY_AI_API_KEY or GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("response blocked: {0}")]
    Blocked(String),
    #[error("service returned no content")]
    Empty,
    #[error("malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("response violates schema: {0}")]
    Schema(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizeRequest {
    pub description: String,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorizeResponse {
    /// Expected to be one of the requested category names.
    pub category: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsRequest {
    pub spending_habits: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TipsResponse {
    pub saving_tips: String,
}

/// The external text-generation service.
pub trait Assistant {
    fn categorize(&self, req: &CategorizeRequest) -> Result<CategorizeResponse, AiError>;
    fn saving_tips(&self, req: &TipsRequest) -> Result<TipsResponse, AiError>;
}

pub fn categorize_prompt(req: &CategorizeRequest) -> String {
    format!(
        "You are a personal finance expert.  Given the description of an expense, \
         you will determine the most appropriate category for it.\n\n\
         Choose exactly one of these categories: {}\n\n\
         Description: {}\n\n\
         Respond with the category and a confidence level (0-1).",
        req.categories.join(", "),
        req.description
    )
}

pub fn tips_prompt(req: &TipsRequest) -> String {
    format!(
        "You are a personal finance advisor. Based on the user's spending habits, \
         provide personalized saving tips.\n\n\
         Spending Habits: {}\n\n\
         Saving Tips:",
        req.spending_habits
    )
}

fn categorize_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "category": {
                "type": "STRING",
                "description": "The predicted category of the expense."
            },
            "confidence": {
                "type": "NUMBER",
                "description": "The confidence level of the categorization (0-1)."
            }
        },
        "required": ["category", "confidence"]
    })
}

fn tips_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "savingTips": {
                "type": "STRING",
                "description": "A list of personalized saving tips based on the user's spending habits."
            }
        },
        "required": ["savingTips"]
    })
}

fn tips_safety_settings() -> Value {
    json!([
        { "category": "HARM_CATEGORY_HATE_SPEECH", "threshold": "BLOCK_ONLY_HIGH" },
        { "category": "HARM_CATEGORY_DANGEROUS_CONTENT", "threshold": "BLOCK_NONE" },
        { "category": "HARM_CATEGORY_HARASSMENT", "threshold": "BLOCK_MEDIUM_AND_ABOVE" },
        { "category": "HARM_CATEGORY_SEXUALLY_EXPLICIT", "threshold": "BLOCK_LOW_AND_ABOVE" }
    ])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Pulls the generated JSON text out of a `generateContent` response body.
pub fn extract_text(body: &str) -> Result<String, AiError> {
    let resp: GenerateContentResponse = serde_json::from_str(body)?;
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(AiError::Blocked(reason));
    }
    let cand = resp.candidates.into_iter().next().ok_or(AiError::Empty)?;
    let text: String = cand
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        let reason = cand.finish_reason.unwrap_or_default();
        let blocked = matches!(
            reason.as_str(),
            "SAFETY" | "BLOCKLIST" | "PROHIBITED_CONTENT"
        );
        return Err(if blocked {
            AiError::Blocked(reason)
        } else {
            AiError::Empty
        });
    }
    Ok(text)
}

pub fn parse_categorize_output(text: &str) -> Result<CategorizeResponse, AiError> {
    let out: CategorizeResponse = serde_json::from_str(text.trim())?;
    if out.category.trim().is_empty() {
        return Err(AiError::Schema("category is empty".into()));
    }
    if !(0.0..=1.0).contains(&out.confidence) {
        return Err(AiError::Schema(format!(
            "confidence {} outside 0-1",
            out.confidence
        )));
    }
    Ok(out)
}

pub fn parse_tips_output(text: &str) -> Result<TipsResponse, AiError> {
    let out: TipsResponse = serde_json::from_str(text.trim())?;
    if out.saving_tips.trim().is_empty() {
        return Err(AiError::Schema("savingTips is empty".into()));
    }
    Ok(out)
}

/// Google Generative Language API client.
pub struct GeminiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn from_config(cfg: &AiConfig) -> Result<Self, AiError> {
        let api_key = cfg.api_key.clone().ok_or(AiError::MissingApiKey)?;
        Ok(GeminiClient {
            http: http_client()?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key,
        })
    }

    fn generate_json(
        &self,
        prompt: &str,
        schema: Value,
        safety: Option<Value>,
    ) -> Result<String, AiError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let mut body = json!({
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": schema
            }
        });
        if let Some(s) = safety {
            body["safetySettings"] = s;
        }
        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()?;
        let status = resp.status();
        let text = resp.text()?;
        if !status.is_success() {
            return Err(AiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        extract_text(&text)
    }
}

impl Assistant for GeminiClient {
    fn categorize(&self, req: &CategorizeRequest) -> Result<CategorizeResponse, AiError> {
        let text = self.generate_json(&categorize_prompt(req), categorize_schema(), None)?;
        parse_categorize_output(&text)
    }

    fn saving_tips(&self, req: &TipsRequest) -> Result<TipsResponse, AiError> {
        let text = self.generate_json(
            &tips_prompt(req),
            tips_schema(),
            Some(tips_safety_settings()),
        )?;
        parse_tips_output(&text)
    }
}

/// What came back from categorization, matched against the user's categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum CategorySuggestion {
    Matched { category: Category, confidence: f64 },
    /// The model named a category the user does not have.
    Unresolved { suggested: String, confidence: f64 },
}

pub fn suggest_category(
    assistant: &dyn Assistant,
    description: &str,
    categories: &[Category],
) -> Result<CategorySuggestion, AiError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AiError::InvalidInput(
            "Please enter a description first.".into(),
        ));
    }
    let req = CategorizeRequest {
        description: description.to_string(),
        categories: categories.iter().map(|c| c.name.clone()).collect(),
    };
    let resp = assistant.categorize(&req).map_err(|e| {
        warn!(error = %e, "auto-categorize failed");
        e
    })?;
    let wanted = resp.category.trim().to_lowercase();
    let suggestion = match categories.iter().find(|c| c.name.to_lowercase() == wanted) {
        Some(c) => CategorySuggestion::Matched {
            category: c.clone(),
            confidence: resp.confidence,
        },
        None => {
            warn!(suggested = %resp.category, "suggested category is not in the list");
            CategorySuggestion::Unresolved {
                suggested: resp.category,
                confidence: resp.confidence,
            }
        }
    };
    Ok(suggestion)
}

/// Free-text summary handed to the tips prompt.
pub fn spending_habits_summary(
    totals: &Totals,
    spending: &BTreeMap<String, Decimal>,
    ccy: &Currency,
) -> String {
    let breakdown: Vec<String> = spending
        .iter()
        .map(|(cat, amt)| format!("{}: {}", cat, ccy.format(*amt)))
        .collect();
    format!(
        "Currency: {} ({})\nTotal Income: {}\nTotal Spending: {}\n\nSpending Breakdown:\n{}",
        ccy.name,
        ccy.code,
        ccy.format(totals.total_income),
        ccy.format(totals.total_spent),
        breakdown.join("\n")
    )
}

pub fn generate_saving_tips(
    assistant: &dyn Assistant,
    ledger: &Ledger,
    ccy: &Currency,
) -> Result<String, AiError> {
    let req = TipsRequest {
        spending_habits: spending_habits_summary(
            &ledger.totals(),
            &ledger.spending_by_category(),
            ccy,
        ),
    };
    match assistant.saving_tips(&req) {
        Ok(resp) => {
            info!(chars = resp.saving_tips.len(), "saving tips generated");
            Ok(resp.saving_tips)
        }
        Err(e) => {
            warn!(error = %e, "saving tips failed");
            Err(e)
        }
    }
}

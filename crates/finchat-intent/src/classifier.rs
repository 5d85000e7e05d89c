//! LLM-first intent classification with a deterministic fallback

use std::sync::Arc;

use finchat_llm::{CompletionRequest, GroqProvider, LlmProvider};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::fallback::classify_fallback;
use crate::json_extract::extract_first_json_object;
use crate::prompt::classification_prompt;
use crate::record::{AssetType, Intent, IntentRecord, TimePeriod, Timeframe};

const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
const CLASSIFY_MAX_TOKENS: usize = 300;
const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// Classifies user utterances into [`IntentRecord`]s
///
/// Tries the configured LLM first; any failure along that path (transport,
/// malformed output, unknown tag) degrades to the pattern-based fallback, so
/// classification always produces a record.
pub struct IntentClassifier {
    llm: Option<Arc<dyn LlmProvider>>,
    model: String,
}

impl IntentClassifier {
    /// Build a classifier around an explicit provider
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            llm: Some(llm),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build from the environment; without `GROQ_API_KEY` the classifier is
    /// fallback-only
    pub fn from_env() -> Self {
        let llm = match GroqProvider::from_env() {
            Ok(provider) => Some(Arc::new(provider) as Arc<dyn LlmProvider>),
            Err(err) => {
                warn!(error = %err, "no LLM credential, using pattern fallback only");
                None
            }
        };
        Self {
            llm,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Build a classifier that only uses the pattern fallback
    pub fn fallback_only() -> Self {
        Self {
            llm: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Classify an utterance into a fully-populated record
    pub async fn classify(&self, utterance: &str) -> IntentRecord {
        let Some(llm) = &self.llm else {
            return classify_fallback(utterance);
        };

        let request = CompletionRequest::builder(&self.model)
            .prompt(classification_prompt(utterance))
            .max_tokens(CLASSIFY_MAX_TOKENS)
            .temperature(CLASSIFY_TEMPERATURE)
            .build();

        // Single attempt, no retry: the fallback path is cheaper than a
        // second round trip.
        let text = match llm.complete(request).await {
            Ok(response) => response.text,
            Err(err) => {
                warn!(error = %err, "LLM classification failed, using pattern fallback");
                return classify_fallback(utterance);
            }
        };

        match parse_llm_record(&text) {
            Some(record) => {
                debug!(intent = %record.intent.as_tag(), "LLM classification");
                record
            }
            None => {
                warn!("unparseable LLM classification output, using pattern fallback");
                classify_fallback(utterance)
            }
        }
    }
}

/// The JSON shape the model is asked to return
#[derive(Debug, Deserialize)]
struct RawIntent {
    intent: String,
    #[serde(default)]
    asset_name: Option<String>,
    #[serde(default)]
    asset_symbol: Option<String>,
    #[serde(default)]
    asset_type: Option<String>,
    #[serde(default)]
    base_currency: Option<String>,
    #[serde(default)]
    quote_currency: Option<String>,
    #[serde(default)]
    time_period: Option<String>,
    #[serde(default)]
    timeframe: Option<String>,
    #[serde(default)]
    limit: Option<u32>,
}

/// Drop placeholder values the model sometimes echoes back
fn cleaned(field: Option<String>) -> Option<String> {
    field
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null") && !s.eq_ignore_ascii_case("none"))
}

fn parse_llm_record(text: &str) -> Option<IntentRecord> {
    let json = extract_first_json_object(text)?;
    let raw: RawIntent = serde_json::from_str(&json).ok()?;
    let intent = Intent::from_tag(&raw.intent)?;

    let mut record = IntentRecord::new(intent);
    record.asset_name = cleaned(raw.asset_name);
    record.asset_symbol = cleaned(raw.asset_symbol).map(|s| s.to_ascii_uppercase());
    record.asset_type = cleaned(raw.asset_type).and_then(|s| AssetType::from_tag(&s));
    record.base_currency = cleaned(raw.base_currency).map(|s| s.to_ascii_uppercase());
    record.quote_currency = cleaned(raw.quote_currency).map(|s| s.to_ascii_uppercase());
    record.time_period = cleaned(raw.time_period).and_then(|s| TimePeriod::from_tag(&s));
    record.timeframe = cleaned(raw.timeframe).and_then(|s| Timeframe::from_tag(&s));
    record.limit = raw.limit;
    Some(record)
}

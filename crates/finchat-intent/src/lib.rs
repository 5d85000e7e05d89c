//! Intent classification for finchat
//!
//! Turns a free-text financial question into a typed [`IntentRecord`]: which
//! of the supported intents the user is asking for, plus any extracted
//! entities (asset symbol, currency pair, time period, result limit).
//!
//! Classification is LLM-first: the utterance is sent to an LLM together with
//! the intent taxonomy and a closed JSON schema to fill in. On any failure
//! (no credential configured, network error, malformed reply) a deterministic
//! keyword/regex fallback produces the same record shape, so
//! [`IntentClassifier::classify`] never fails outward.

pub mod classifier;
pub mod entities;
pub mod fallback;
pub mod json_extract;
pub mod period;
pub mod prompt;
pub mod record;

pub use classifier::IntentClassifier;
pub use record::{AssetType, Intent, IntentRecord, TimePeriod, Timeframe};

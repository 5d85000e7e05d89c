//! Intent dispatch and reply rendering
//!
//! Consumes [`finchat_intent`]'s records and [`finchat_markets`]'s resolvers:
//! classify an utterance, fetch the matching data, and hand back a [`Reply`]
//! for the presentation layer.

pub mod dispatcher;
pub mod render;

pub use dispatcher::{Dispatcher, MarketData, Reply};
pub use render::render;

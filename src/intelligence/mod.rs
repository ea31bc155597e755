//! Cross-result aggregation: summary, recommendations, risk level and
//! early-warning signals.

pub mod engine;
pub mod messages;
pub mod recommendations;
pub mod risk;
pub mod summary;
pub mod warnings;

pub use engine::aggregate;
pub use messages::{interpretation, MessageTemplates};

//! Marketplace client, wire envelopes, and the question sub-format

pub mod client;
pub mod question;
pub mod wire;

pub use client::MarketplaceClient;
pub use question::{HtmlQuestion, QuestionForm};

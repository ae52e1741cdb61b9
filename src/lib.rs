//! Turkpost - human-task dispatch and completion polling
//!
//! Dispatches units of outsourced human work ("tasks") to a remote
//! marketplace, polls on a fixed interval for a worker's answer, and hands
//! the extracted answer to a downstream consumer.
//!
//! # Overview
//!
//! This crate provides:
//! - Request signing for the marketplace and its queue sub-service
//! - A marketplace client (create task, poll for results, bulk search)
//! - The question sub-format the task body is rendered into
//! - A per-task completion poller racing a tick interval against a deadline
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use turkpost::config::{AppConfig, Credentials};
//! use turkpost::dispatch::TaskDispatcher;
//! use turkpost::marketplace::{MarketplaceClient, QuestionForm};
//! use turkpost::poller::CompletionPoller;
//! use turkpost::task::WorkItem;
//!
//! # async fn example() -> Result<(), turkpost::error::MarketError> {
//! let config = AppConfig::load_from_file("turkpost.toml".as_ref())?;
//! let client = Arc::new(MarketplaceClient::new(
//!     &config.marketplace,
//!     config.credentials()?,
//! )?);
//!
//! let body = QuestionForm::free_text("q1", "Translate", "Translate this tweet into emoji")
//!     .to_xml()?;
//! let item = WorkItem::from_defaults("tweet-42", "Translate tweet", "Pick emoji", body, &config.task);
//!
//! let handle = TaskDispatcher::new(client.clone()).dispatch(&item).await?;
//! let poller = CompletionPoller::new(client, config.poll.tick());
//! let outcome = poller.run(&handle, Duration::from_secs(item.lifetime_secs.into())).await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod marketplace;
pub mod observability;
pub mod poller;
pub mod signing;
pub mod task;

pub use config::{AppConfig, Credentials};
pub use dispatch::TaskDispatcher;
pub use error::{MarketError, MarketResult};
pub use marketplace::{HtmlQuestion, MarketplaceClient, QuestionForm};
pub use poller::{CompletionPoller, PollOutcome, ResultSource};
pub use task::{PollResult, SearchFilter, TaskHandle, TaskSummary, WorkItem};

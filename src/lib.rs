//! Incremental semantic layout: text embeddings are projected onto a 2-D
//! canvas, fitted to the view, and spread apart so labels stay readable as
//! items are added one at a time.

pub mod config;
pub mod error;
pub mod layout;
pub mod logging;
pub mod provider;
pub mod util;
pub mod worker;

pub use config::{AppConfig, LayoutConfig, WindowConfig};
pub use error::{InsertError, LayoutError, ProviderError};
pub use logging::init_logging;
pub use worker::{InsertOutcome, InsertQueue, Ticket};

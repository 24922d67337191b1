//! dsquest-ledger — The Great Ledger game UI.
//!
//! A typed client for the game backend (`/api/map`, `/api/node`,
//! `/api/submit`) and plain-text renderers for the world map and node card.

pub mod client;
pub mod error;
pub mod model;
pub mod render;

pub use client::LedgerClient;
pub use error::LedgerError;
pub use model::{MapNode, Node, NodeKind, NodeStatus, Submission, SubmitResponse, WorldMap};

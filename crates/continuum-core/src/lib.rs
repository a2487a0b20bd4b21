//! Continuum Core Library
//!
//! Board model, local cache codec and the board store that keeps the
//! in-memory board in sync with the remote API.

pub mod board;
pub mod codec;
pub mod config;
pub mod error;
pub mod store;

pub use board::model::{
    BoardState, Card, CardUpdate, Category, CategoryId, ColumnId, ColumnView, NewCard, Priority,
};
pub use config::ClientConfig;
pub use error::{CoreError, CoreResult};
pub use store::{BoardStore, StoreOptions};

/// Chain Mock Server Library
///
/// This crate provides both a standalone binary and library components for
/// mocking a node gateway: wallet account authorization, value transfers, and
/// the append-only memo contract.
pub mod handlers;
pub mod server;
pub mod state;
pub mod types;

pub use server::{create_router, run_server};
pub use state::{ChainState, SharedState};
pub use types::*;

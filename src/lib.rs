pub mod api;
pub mod config;
pub mod error;
pub mod ledger;
pub mod provider;
pub mod session;
pub mod storage;
pub mod util;

pub use config::Config;
pub use error::{SessionError, ValidationError};
pub use ledger::records::TransactionRecord;
pub use session::{FormDraft, SubmitReceipt, WalletSession};

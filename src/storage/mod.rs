pub mod file_system;
pub mod models;

pub use file_system::PrefsStore;
pub use models::{Preferences, Theme};

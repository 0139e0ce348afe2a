pub mod store;
pub mod types;

pub use store::SettingsStore;
pub use types::{Theme, UserSettings};

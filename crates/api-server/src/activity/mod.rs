pub mod store;
pub mod types;

pub use store::ActivityLog;
pub use types::{actions, ActivityEvent, ActivityListQuery, ActivityListResponse};

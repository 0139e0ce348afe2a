//! User module
//!
//! Users sign in to the dashboard and carry the Role that gates what they see.

mod model;
mod password;
mod store;

pub use model::*;
pub use store::UserStore;

//! Project module
//!
//! A Project is led by a manager and staffed by team members.
//! Tasks belong to Projects.

mod model;
mod store;

pub use model::*;
pub use store::*;

//! Core library for Taskdash
//!
//! This crate contains the domain logic behind the dashboard:
//! - User, project and task models
//! - In-memory entity stores
//! - Role-based visibility and permissions
//! - Search, filters and dashboard statistics

pub mod access;
pub mod board;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod priority;
pub mod project;
pub mod seed;
pub mod task;
pub mod user;

pub use access::Viewer;
pub use board::Board;
pub use error::Error;
pub use priority::Priority;
pub type Result<T> = std::result::Result<T, Error>;

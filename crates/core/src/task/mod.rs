//! Task module
//!
//! This module contains task-related types and logic.

mod memory_store;
mod model;
mod repository;

pub use memory_store::MemoryTaskStore;
pub use model::*;
pub use repository::TaskRepository;

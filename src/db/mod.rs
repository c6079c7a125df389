// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Re-export database components

pub mod list_repository;
pub mod review_repository;
pub mod user_repository;

pub use list_repository::*;
pub use review_repository::*;
pub use user_repository::*;

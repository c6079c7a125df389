// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod destination;
pub mod list;
pub mod review;
pub mod user;

pub use destination::*;
pub use list::*;
pub use review::*;
pub use user::*;

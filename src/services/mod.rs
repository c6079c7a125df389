// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod auth_service;
pub mod dataset;
pub mod destination_service;
pub mod email_service;
pub mod list_service;
pub mod password;
pub mod rate_limit;
pub mod review_service;
pub mod sanitize;
pub mod token;

pub use auth_service::AuthService;
pub use dataset::{start_refresh_task, DatasetCache};
pub use destination_service::DestinationService;
pub use email_service::EmailService;
pub use list_service::{ListService, Pagination};
pub use rate_limit::{start_rate_limit_cleanup, AuthRateLimiter};
pub use review_service::ReviewService;
pub use token::TokenService;

pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use models::{AcceptanceWindow, Amount, MatchResult, SubsetMatch, ToleranceMode};
pub use service::{find_closest_subset, Session, Strategy, SubsetMatcher};

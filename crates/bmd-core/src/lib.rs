pub mod config;
pub mod logging;

pub mod auth;
pub mod control;
pub mod discover;
pub mod error;
pub mod executor;
pub mod job;
pub mod prepare;
pub mod probe;
pub mod retry;
pub mod scheduler;
pub mod transport;
pub mod url_model;

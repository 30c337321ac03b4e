pub mod authentication;
pub mod author_refresh;
pub mod comment_thread;
pub mod configuration;
pub mod domain;
pub mod notifier;
pub mod repository;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod tombstone_sweeper_worker;
pub mod utils;

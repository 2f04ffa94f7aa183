pub mod auth;
pub mod config;
pub mod harness;
pub mod models;
pub mod seed;

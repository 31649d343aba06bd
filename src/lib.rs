pub mod armor;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod remote;
pub mod session;

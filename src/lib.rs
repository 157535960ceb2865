pub mod app;
pub mod config;
pub mod error;
pub mod handler;
pub mod ivr;
pub mod plivo;

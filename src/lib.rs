pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod invoice_gen;
pub mod models;
pub mod telemetry;
pub mod ui;

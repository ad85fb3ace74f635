pub mod authoring;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod models;
pub mod notify;
pub mod output;
pub mod store;

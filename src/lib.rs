pub mod catalog;
pub mod config;
pub mod error;
pub mod join;
pub mod output;
pub mod render;
pub mod reshape;
pub mod stats;
pub mod table;

pub mod aggregate;
pub mod config;
pub mod export;
pub mod lastfm;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod telegram;

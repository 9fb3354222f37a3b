pub mod api;
pub mod config;
pub mod extract;
pub mod formats;
pub mod humanize;
pub mod observability;
pub mod streams;
pub mod transcode;
pub mod video_id;

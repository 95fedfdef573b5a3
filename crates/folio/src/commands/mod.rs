pub mod completion;
pub mod config;
pub mod download;
pub mod list;
pub mod resolve;

pub mod config;
pub mod export;
pub mod freight;
pub mod idle;
pub mod init;
pub mod report;
pub mod summary;

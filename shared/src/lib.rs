pub mod config;
pub mod error;
pub mod http;
pub mod key;
pub mod policy;
pub mod presign;
pub mod upload;

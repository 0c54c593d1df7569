pub mod clearnode;
pub mod config;
pub mod observe;
pub mod time;

pub use {clearnode::Clearnode, config::Config};

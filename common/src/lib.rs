pub mod messages;
pub mod config;
pub mod log_buffer;
pub mod models;
pub mod utils;

pub use self::messages::*;
pub use self::config::*;
pub use self::log_buffer::*;
pub use self::utils::*;

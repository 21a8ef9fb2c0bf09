// common/src/models/mod.rs
pub mod client;
pub mod profile;

pub mod avatars;
pub mod config;
pub mod lifecycle;
pub mod photos;
pub mod projection;
pub mod store;
pub mod terminal;

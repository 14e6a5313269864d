pub mod board;
pub mod photos;
pub mod staff;
pub mod tasks;

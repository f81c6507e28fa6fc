pub mod item;
pub mod outfit;
pub mod user;

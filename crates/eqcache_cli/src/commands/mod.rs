pub mod cache;
pub mod render;

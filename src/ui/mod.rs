pub mod panels;
pub mod render;

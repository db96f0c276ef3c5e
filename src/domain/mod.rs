pub mod entity;
pub mod grid;

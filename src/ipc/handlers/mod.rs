pub mod core;
pub mod course;

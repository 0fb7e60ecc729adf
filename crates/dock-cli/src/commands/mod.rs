pub mod analyze;
pub mod benchmark;
pub mod screen;

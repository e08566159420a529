pub mod data;
pub mod flatten;

pub mod scoring;
pub mod mapping;
pub mod program;
pub mod intake;

pub mod cli;
pub mod repositories;

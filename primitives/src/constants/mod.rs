pub mod cli;
pub mod errors;
pub mod tx;

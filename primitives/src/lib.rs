pub mod cli;
pub mod constants;
pub mod contracts;
pub mod macros;
pub mod utils;

pub use constants::errors::*;
pub use utils::sub_display_format;

mod coin;
mod status;

pub use coin::*;
pub use status::*;

pub static CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

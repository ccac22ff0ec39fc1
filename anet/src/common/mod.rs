pub mod constants;
pub mod interface;
pub mod util;

//! Configuration validation, run once per mapper configuration before any record.

mod cycles;
mod validator;

pub use cycles::find_cycles;
pub use validator::validate;

mod account_number;
mod account_type;
mod components;

pub use account_number::*;
pub use account_type::*;
pub use components::*;

mod abstract_info;
mod to_json;
mod tokens;

pub use abstract_info::*;
pub use to_json::*;
pub use tokens::*;

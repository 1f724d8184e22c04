//! JSON dump of generic AST nodes, for debugging and golden files.

use crate::ast::Any;
use crate::error::Result;
use crate::utils::ToJson;

pub fn to_json(any: &Any) -> Result<String> {
    let value = any.to_json()?;
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn from_json(json: &str) -> Result<Any> {
    Ok(serde_json::from_str(json)?)
}

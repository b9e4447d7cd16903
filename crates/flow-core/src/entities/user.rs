use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An employee from the directory. Source of denormalized display names.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

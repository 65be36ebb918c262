//! Static model catalog
//!
//! The catalog is built once at startup and shared read-only between requests.

use serde::{Deserialize, Serialize};

/// One selectable model in the listing response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub owned_by: String,
}

impl ModelDescriptor {
    pub fn new(id: impl Into<String>, created: i64, owned_by: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            object: "model".to_string(),
            created,
            owned_by: owned_by.into(),
        }
    }
}

/// Models list response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    pub object: String,
    pub data: Vec<ModelDescriptor>,
}

impl ModelCatalog {
    /// Wrap an ordered list of descriptors
    pub fn new(data: Vec<ModelDescriptor>) -> Self {
        Self {
            object: "list".to_string(),
            data,
        }
    }

    /// Models served by the default upstream
    pub fn deepinfra() -> Self {
        Self::new(vec![
            ModelDescriptor::new("deepseek-ai/DeepSeek-R1-0528-Turbo", 1624980000, "deepseek-ai"),
            ModelDescriptor::new("deepseek-ai/DeepSeek-V3-0324-Turbo", 1632000000, "deepseek-ai"),
            ModelDescriptor::new(
                "deepseek-ai/DeepSeek-R1-Distill-Llama-70B",
                1640000000,
                "deepseek-ai",
            ),
        ])
    }

    /// Look up a model by id
    pub fn get(&self, id: &str) -> Option<&ModelDescriptor> {
        self.data.iter().find(|m| m.id == id)
    }
}

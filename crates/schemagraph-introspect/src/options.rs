use serde::{Deserialize, Serialize};

use schemagraph_core::{DEFAULT_DISCRETE_THRESHOLD, DEFAULT_STRENGTH_THRESHOLD};

/// Options that control one inference pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferOptions {
    /// Database schema whose tables are analysed.
    pub schema: String,
    /// Distinct count at or below which a column is a discrete dimension.
    pub discrete_threshold: u64,
    /// Minimum grouped maximum on both sides before key strength is decided.
    pub strength_threshold: u64,
    /// Emit column membership, data type, distinct count and key column facts.
    pub include_catalog_facts: bool,
}

impl Default for InferOptions {
    fn default() -> Self {
        Self {
            schema: "public".to_string(),
            discrete_threshold: DEFAULT_DISCRETE_THRESHOLD,
            strength_threshold: DEFAULT_STRENGTH_THRESHOLD,
            include_catalog_facts: true,
        }
    }
}

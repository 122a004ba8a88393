use serde::{Deserialize, Serialize};

/// A node in the enterprise hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enterprise {
    #[serde(rename = "href")]
    pub uri: String,
    pub name: String,
    #[serde(rename = "resourceId")]
    pub resource_id: String,
    #[serde(rename = "hasSubEnterprises", default)]
    pub has_sub_enterprises: bool,
}

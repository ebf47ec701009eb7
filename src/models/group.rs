use serde::{Deserialize, Serialize};

/// A server-defined category a share can be routed into.
///
/// An `id` of `None` marks a group the user proposes to create by name;
/// groups returned by the server always carry an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: Option<String>,
    pub name: String,
    pub icon: Option<String>,
    pub description: Option<String>,
}

impl Group {
    /// A to-be-created group, identified only by name.
    pub fn proposed(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            icon: None,
            description: None,
        }
    }
}

use crate::models::Group;

/// Result of a successful configuration fetch. All fields are defaulted
/// client-side when the server omits them; `config_url` is the exact URL
/// that answered, scheme included, so a bare host typed by the user is
/// persisted fully qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFetch {
    pub name: String,
    pub icon: String,
    pub endpoint: String,
    pub delivery_key: String,
    pub config_url: String,
}

/// Outcome of a content submission that the server accepted.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// 200: the share is delivered, nothing further to do.
    Delivered,
    /// 202: the server wants the share routed into a group before it
    /// records it.
    GroupChoiceNeeded(PendingSelection),
}

/// A share the server has parked while it waits for a group decision.
/// Lives for one UI interaction; never persisted.
#[derive(Debug, Clone)]
pub struct PendingSelection {
    pub share_id: String,
    pub groups: Vec<Group>,
}

use crate::client::ShareClient;
use crate::config::ShareConfig;
use crate::error::{ShareError, ShareResult};
use crate::models::{Group, PendingSelection, ShareContent, SubmitOutcome};
use async_trait::async_trait;
use tracing::debug;

/// Collaborator that resolves a pending group choice: a bottom sheet on
/// mobile, a prompt in a terminal. Returning `None` abandons the attempt
/// and no selection is submitted. The driver calls `choose` at most once
/// per attempt.
#[async_trait]
pub trait GroupChooser {
    async fn choose(&self, groups: &[Group]) -> Option<Group>;
}

/// States of a single share attempt, from content in hand to a terminal
/// outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Idle,
    Submitting,
    AwaitingChoice,
    SubmittingSelection,
    Succeeded,
    Failed,
}

fn transition(from: AttemptState, to: AttemptState) -> AttemptState {
    debug!("Share attempt: {:?} -> {:?}", from, to);
    to
}

impl PendingSelection {
    /// Route this parked share into the chosen group. Consumes the
    /// pending selection: a parked share is resumed exactly once.
    pub async fn submit(
        self,
        client: &ShareClient,
        endpoint: &str,
        group: &Group,
        delivery_key: Option<&str>,
    ) -> ShareResult<()> {
        client
            .submit_group_selection(endpoint, &self.share_id, group, delivery_key)
            .await
    }
}

/// Drive one share attempt end to end: submit the content, and when the
/// server asks for a group, suspend on the chooser and submit its pick.
/// Callers run at most one attempt per user action; debouncing a
/// double-triggered action is the caller's concern.
pub async fn run_share(
    client: &ShareClient,
    config: &ShareConfig,
    content: &ShareContent,
    chooser: &dyn GroupChooser,
) -> ShareResult<()> {
    let endpoint = config
        .post_endpoint
        .as_deref()
        .filter(|e| !e.is_empty())
        .ok_or(ShareError::NotConfigured)?;
    let delivery_key = config.delivery_key.as_deref();

    let state = transition(AttemptState::Idle, AttemptState::Submitting);

    let outcome = match client.submit_content(endpoint, content, delivery_key).await {
        Ok(outcome) => outcome,
        Err(e) => {
            transition(state, AttemptState::Failed);
            return Err(e);
        }
    };

    let pending = match outcome {
        SubmitOutcome::Delivered => {
            transition(state, AttemptState::Succeeded);
            return Ok(());
        }
        SubmitOutcome::GroupChoiceNeeded(pending) => pending,
    };

    let state = transition(state, AttemptState::AwaitingChoice);

    let group = match chooser.choose(&pending.groups).await {
        Some(group) => group,
        None => {
            // Dismissed without a pick: the attempt is discarded, the
            // parked share is never resumed.
            transition(state, AttemptState::Failed);
            return Err(ShareError::Abandoned);
        }
    };

    let state = transition(state, AttemptState::SubmittingSelection);

    match pending.submit(client, endpoint, &group, delivery_key).await {
        Ok(()) => {
            transition(state, AttemptState::Succeeded);
            Ok(())
        }
        Err(e) => {
            transition(state, AttemptState::Failed);
            Err(e)
        }
    }
}

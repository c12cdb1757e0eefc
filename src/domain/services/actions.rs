#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;

use super::ChatClient;
use crate::domain::models::Action;

pub struct ActionsService {}

impl ActionsService {
    /// Applies UI actions to the client one at a time, so a response can
    /// never land on a conversation that is no longer active. Returns once
    /// every sender has been dropped.
    pub async fn start(
        mut client: ChatClient,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        while let Some(action) = rx.recv().await {
            client.handle(action).await?;
        }

        tracing::debug!("Action channel closed");
        return Ok(());
    }
}

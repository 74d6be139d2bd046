use tokio::time;
use tracing::{error, info};

use crate::config::SubmitConfig;
use crate::core::provider::DNSProvider;
use crate::core::record::{ChangeStatus, RecordChange};
use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Done { change_id: String },
    /// Submission failed and `propagate_submission_errors` is off.
    Failed { reason: String },
}

pub struct ChangeSubmitter<'a> {
    provider: &'a dyn DNSProvider,
    config: SubmitConfig,
}

impl<'a> ChangeSubmitter<'a> {
    pub fn new(provider: &'a dyn DNSProvider, config: SubmitConfig) -> Self {
        Self { provider, config }
    }

    pub async fn submit(&self, change: &RecordChange) -> Result<SubmitOutcome, Error> {
        match self.create_and_wait(change).await {
            Ok(change_id) => {
                info!("DNS record updated successfully.");
                Ok(SubmitOutcome::Done { change_id })
            }
            Err(e) if self.config.propagate_submission_errors => Err(e),
            Err(e) => {
                error!("Error while updating the DNS record: {}", e);
                Ok(SubmitOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    async fn create_and_wait(&self, change: &RecordChange) -> Result<String, Error> {
        let mut state = self.provider.create_change(change).await?;
        let mut attempts = 0;

        while state.status != ChangeStatus::Done {
            if self.config.max_poll_attempts.is_some_and(|max| attempts >= max) {
                return Err(Error::Timeout {
                    change_id: state.id,
                    attempts,
                });
            }
            info!(
                "Waiting {:?} for change {} to complete (status {})",
                self.config.poll_interval, state.id, state.status
            );
            time::sleep(self.config.poll_interval).await;
            state = self.provider.get_change(&change.zone.name, &state.id).await?;
            attempts += 1;
        }

        Ok(state.id)
    }
}

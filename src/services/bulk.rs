//! Sequential batch runner for bulk status changes.

use serde::Serialize;
use std::future::Future;
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BulkFailure {
    pub id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BulkOutcome {
    pub succeeded: usize,
    pub failed: Vec<BulkFailure>,
}

impl BulkOutcome {
    pub fn summary(&self) -> String {
        format!("{} succeeded, {} failed", self.succeeded, self.failed.len())
    }
}

/// Runs `op` for each id in order. A failing item is recorded and the batch
/// carries on.
pub async fn run_sequential<F, Fut, T>(ids: &[Uuid], mut op: F) -> BulkOutcome
where
    F: FnMut(Uuid) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut outcome = BulkOutcome::default();
    for &id in ids {
        match op(id).await {
            Ok(_) => outcome.succeeded += 1,
            Err(e) => {
                warn!(%id, error = %e, "Bulk item failed");
                outcome.failed.push(BulkFailure {
                    id,
                    error: e.to_string(),
                });
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[tokio::test]
    async fn continues_past_failures_and_counts_both() {
        let ids: Vec<Uuid> = (0..4).map(|_| Uuid::new_v4()).collect();
        let bad = ids[1];
        let mut seen = Vec::new();

        let outcome = run_sequential(&ids, |id| {
            seen.push(id);
            async move {
                if id == bad {
                    Err(Error::Conflict("already approved".into()))
                } else {
                    Ok(())
                }
            }
        })
        .await;

        assert_eq!(seen, ids);
        assert_eq!(outcome.succeeded, 3);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].id, bad);
        assert!(outcome.failed[0].error.contains("already approved"));
        assert_eq!(outcome.summary(), "3 succeeded, 1 failed");
    }

    #[tokio::test]
    async fn empty_batches_do_nothing() {
        let outcome = run_sequential(&[], |_| async { Ok::<_, Error>(()) }).await;
        assert_eq!(outcome, BulkOutcome::default());
    }
}

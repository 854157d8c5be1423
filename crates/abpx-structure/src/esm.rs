//! ESM Atlas folding client.

use std::time::Duration;

use abpx_common::{AbpxError, FoldingConfig, SandboxClient};
use abpx_peptide::sequence::validate;
use futures_util::stream::{self, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, info, warn};

use crate::error::StructureError;
use crate::outcome::{StructureOutcome, StructurePayload};

/// Client for predicting peptide structures with the folding service.
#[derive(Debug, Clone)]
pub struct FoldingClient {
    client: SandboxClient,
    endpoint: String,
    timeout_secs: u64,
    max_concurrency: usize,
}

impl FoldingClient {
    pub fn new(config: &FoldingConfig) -> Result<Self, AbpxError> {
        let client = SandboxClient::new(
            config.allowed_hosts.as_slice(),
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            timeout_secs: config.timeout_secs,
            max_concurrency: config.max_concurrency.max(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fold one sequence. The service receives it uppercased.
    pub async fn fold(&self, sequence: &str) -> Result<StructurePayload, StructureError> {
        validate(sequence).map_err(|e| StructureError::InvalidSequence(e.to_string()))?;
        let body = sequence.to_ascii_uppercase();

        let request = self
            .client
            .post(&self.endpoint)
            .map_err(|e| StructureError::Blocked(e.to_string()))?
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(body);

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(StructureError::Status(status.as_u16()));
        }

        let pdb = response.text().await.map_err(|e| self.transport_error(e))?;
        debug!("Folded {} residues into {} bytes of PDB", sequence.len(), pdb.len());
        Ok(StructurePayload(pdb))
    }

    /// Fold every sequence, at most `max_concurrency` calls in flight.
    ///
    /// Returns one outcome per input, in input order.
    pub async fn fold_all<S: AsRef<str>>(&self, sequences: &[S]) -> Vec<StructureOutcome> {
        info!(
            "Folding {} sequences via {} ({} concurrent)",
            sequences.len(),
            self.endpoint,
            self.max_concurrency
        );

        // Stream owned strings: borrowed items make the batch future non-Send
        let owned: Vec<String> = sequences.iter().map(|s| s.as_ref().to_string()).collect();

        let outcomes: Vec<StructureOutcome> = stream::iter(owned.into_iter().enumerate())
            .map(|(i, sequence)| async move {
                let result = self.fold(&sequence).await;
                if let Err(e) = &result {
                    warn!("Structure {} ({}) failed: {}", i + 1, sequence, e);
                }
                StructureOutcome {
                    index: i + 1,
                    sequence,
                    result,
                }
            })
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let folded = outcomes.iter().filter(|o| o.result.is_ok()).count();
        info!("Folding finished: {}/{} succeeded", folded, outcomes.len());
        outcomes
    }

    fn transport_error(&self, e: reqwest::Error) -> StructureError {
        if e.is_timeout() {
            StructureError::Timeout(self.timeout_secs)
        } else {
            StructureError::Transport(e.to_string())
        }
    }
}

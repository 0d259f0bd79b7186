//! Upload event orchestrator
//!
//! One call per upload event: decode the provider hash, look up its
//! reputation, and either route the file immediately or submit it for
//! analysis and poll until a terminal verdict or the attempt budget runs
//! out. Every outcome is reported as a [`Resolution`]; only submission
//! failures surface as errors, since a file the service never received
//! must be retried by the caller.

use std::sync::Arc;

use filegate_core::{
    ContentHash, FileMoveOperation, GateConfig, RoutingDecision, UploadEvent, Verdict,
};
use filegate_reputation::{ReputationError, ReputationService};
use filegate_storage::Storage;

use crate::poll::PollPolicy;
use crate::router::{FileRouter, MoveError};

/// Destination buckets keyed by routing decision.
#[derive(Debug, Clone)]
pub struct RouteTable {
    pub clean_bucket: String,
    pub quarantine_bucket: String,
}

impl RouteTable {
    pub fn new(clean_bucket: impl Into<String>, quarantine_bucket: impl Into<String>) -> Self {
        RouteTable {
            clean_bucket: clean_bucket.into(),
            quarantine_bucket: quarantine_bucket.into(),
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        RouteTable::new(&config.clean_bucket, &config.quarantine_bucket)
    }

    /// Destination bucket for a decision, `None` while analysis is pending.
    pub fn destination(&self, decision: RoutingDecision) -> Option<&str> {
        match decision {
            RoutingDecision::MoveToClean => Some(&self.clean_bucket),
            RoutingDecision::MoveToQuarantine => Some(&self.quarantine_bucket),
            RoutingDecision::AwaitAnalysis => None,
        }
    }
}

/// Terminal outcome of handling one upload event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A terminal verdict arrived and the file was moved.
    Routed {
        verdict: Verdict,
        decision: RoutingDecision,
    },
    /// The source object was already gone; a previous delivery routed it.
    AlreadyRouted,
    /// The poll budget ran out without a terminal verdict. The file stays
    /// in the upload bucket for a later sweep.
    AnalysisTimedOut,
    /// The event could not be resolved; details are in the logs.
    Failed(FailureReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    /// The provider hash could not be decoded.
    HashDecode,
    /// The reputation service was unreachable on the initial lookup.
    ReputationUnavailable,
    /// The file content could not be read for submission.
    Storage,
    /// The move to the destination bucket failed.
    Move,
}

pub struct Orchestrator {
    reputation: Arc<dyn ReputationService>,
    storage: Arc<dyn Storage>,
    router: FileRouter,
    routes: RouteTable,
    policy: PollPolicy,
}

impl Orchestrator {
    pub fn new(
        reputation: Arc<dyn ReputationService>,
        storage: Arc<dyn Storage>,
        routes: RouteTable,
        policy: PollPolicy,
    ) -> Self {
        let router = FileRouter::new(storage.clone());
        Orchestrator {
            reputation,
            storage,
            router,
            routes,
            policy,
        }
    }

    /// Resolve one upload event end to end.
    ///
    /// Errors are returned only when submission for analysis fails; in
    /// that case the service never saw the file and the event must be
    /// redelivered. Everything else resolves to a [`Resolution`].
    pub async fn handle(&self, event: &UploadEvent) -> Result<Resolution, ReputationError> {
        let source = event.source_location();
        tracing::info!(object = %source, "processing upload event");

        let hash = match ContentHash::from_provider_encoding(&event.md5_hash) {
            Ok(hash) => hash,
            Err(e) => {
                tracing::error!(object = %source, error = %e, "undecodable content hash");
                return Ok(Resolution::Failed(FailureReason::HashDecode));
            }
        };

        let verdict = match self.reputation.verdict_by_hash(&hash).await {
            Ok(verdict) => verdict,
            Err(e) => {
                tracing::error!(object = %source, error = %e, "initial verdict lookup failed");
                return Ok(Resolution::Failed(FailureReason::ReputationUnavailable));
            }
        };
        tracing::info!(object = %source, %verdict, "initial verdict");

        let decision = RoutingDecision::from_verdict(verdict);
        if self.routes.destination(decision).is_some() {
            return Ok(self.route(event, verdict, decision).await);
        }

        // No terminal verdict yet: the service has never analyzed this
        // file (or analysis is in flight). Hand it the content and poll.
        let content = match self.storage.read(&source).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!(object = %source, error = %e, "reading upload for submission failed");
                return Ok(Resolution::Failed(FailureReason::Storage));
            }
        };
        self.reputation.submit(&event.name, content).await?;
        tracing::info!(object = %source, "submitted for analysis");

        for attempt in 1..=self.policy.max_attempts {
            tokio::time::sleep(self.policy.delay_for(attempt)).await;

            match self.reputation.verdict_by_hash(&hash).await {
                Ok(verdict) if verdict.is_terminal() => {
                    tracing::info!(object = %source, %verdict, attempt, "verdict after analysis");
                    let decision = RoutingDecision::from_verdict(verdict);
                    return Ok(self.route(event, verdict, decision).await);
                }
                Ok(verdict) => {
                    tracing::debug!(object = %source, %verdict, attempt, "analysis not finished");
                }
                Err(e) => {
                    tracing::warn!(object = %source, error = %e, attempt, "verdict poll failed");
                }
            }
        }

        tracing::warn!(
            object = %source,
            attempts = self.policy.max_attempts,
            "no terminal verdict within the poll budget"
        );
        Ok(Resolution::AnalysisTimedOut)
    }

    async fn route(
        &self,
        event: &UploadEvent,
        verdict: Verdict,
        decision: RoutingDecision,
    ) -> Resolution {
        let destination = match self.routes.destination(decision) {
            Some(bucket) => bucket,
            None => return Resolution::Failed(FailureReason::Move),
        };
        let op = FileMoveOperation::to_bucket(event.source_location(), destination);

        match self.router.execute(&op).await {
            Ok(()) => Resolution::Routed { verdict, decision },
            Err(MoveError::SourceMissing(location)) => {
                tracing::info!(%location, "source already gone, treating as routed");
                Resolution::AlreadyRouted
            }
            Err(e) => {
                tracing::error!(from = %op.source, to = %op.destination, error = %e, "move failed");
                Resolution::Failed(FailureReason::Move)
            }
        }
    }
}

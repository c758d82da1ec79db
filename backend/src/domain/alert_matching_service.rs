//! Search-alert fan-out for newly created products.
//!
//! For every user near the product owner, the saved alert (if any) is
//! evaluated against the product. Matches are recorded and pushed to the
//! user's devices. Candidates are independent: each one runs in a bounded
//! concurrent group and its failures are collected into the report instead
//! of aborting the others.

use std::fmt;
use std::sync::Arc;

use futures_util::{StreamExt, stream};
use mockable::Clock;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::ports::{AlertPushPayload, MarketplacePorts, PushMessage};
use super::{ALERT_RADIUS_METRES, Product, SearchAlertNotification, UserId};

/// Stage of candidate processing that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOutStage {
    LoadAlert,
    RecordNotification,
    LoadPushTarget,
    ResolveImages,
    Dispatch,
}

impl fmt::Display for FanOutStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::LoadAlert => "load_alert",
            Self::RecordNotification => "record_notification",
            Self::LoadPushTarget => "load_push_target",
            Self::ResolveImages => "resolve_images",
            Self::Dispatch => "dispatch",
        };
        f.write_str(label)
    }
}

/// A failure isolated to one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateFailure {
    pub user_id: UserId,
    pub stage: FanOutStage,
    pub message: String,
}

/// Why a fan-out stopped before scanning candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FanOutSkip {
    OwnerLocationMissing,
    OwnerLookupFailed,
    CandidateLookupFailed,
}

impl FanOutSkip {
    /// Stable label used in logs and metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OwnerLocationMissing => "owner_location_missing",
            Self::OwnerLookupFailed => "owner_lookup_failed",
            Self::CandidateLookupFailed => "candidate_lookup_failed",
        }
    }
}

/// Summary of one fan-out run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertFanOutReport {
    pub candidates_scanned: usize,
    pub alerts_evaluated: usize,
    pub matches: usize,
    pub notifications_recorded: usize,
    pub pushes_dispatched: usize,
    pub failures: Vec<CandidateFailure>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<FanOutSkip>,
}

impl AlertFanOutReport {
    fn skipped(reason: FanOutSkip) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    fn absorb(mut self, outcome: CandidateOutcome) -> Self {
        self.candidates_scanned += 1;
        self.alerts_evaluated += usize::from(outcome.evaluated);
        self.matches += usize::from(outcome.matched);
        self.notifications_recorded += usize::from(outcome.recorded);
        self.pushes_dispatched += usize::from(outcome.dispatched);
        self.failures.extend(outcome.failure);
        self
    }
}

#[derive(Debug, Default)]
struct CandidateOutcome {
    evaluated: bool,
    matched: bool,
    recorded: bool,
    dispatched: bool,
    failure: Option<CandidateFailure>,
}

impl CandidateOutcome {
    fn failed(mut self, user_id: &UserId, stage: FanOutStage, error: impl fmt::Display) -> Self {
        let message = error.to_string();
        warn!(
            user_id = %user_id,
            stage = %stage,
            error = %message,
            "search alert candidate failed"
        );
        self.failure = Some(CandidateFailure {
            user_id: user_id.clone(),
            stage,
            message,
        });
        self
    }
}

/// Alert matching engine.
///
/// Never returns an error: every failure ends up in the
/// [`AlertFanOutReport`] and the logs.
#[derive(Clone)]
pub struct AlertMatchingService {
    ports: MarketplacePorts,
    clock: Arc<dyn Clock>,
    concurrency: usize,
}

impl AlertMatchingService {
    /// Create an engine evaluating at most `concurrency` candidates at once.
    pub fn new(ports: MarketplacePorts, clock: Arc<dyn Clock>, concurrency: usize) -> Self {
        Self {
            ports,
            clock,
            concurrency: concurrency.max(1),
        }
    }

    /// Evaluate nearby alerts against `product` and notify matching users.
    pub async fn match_and_notify(&self, product: &Product) -> AlertFanOutReport {
        let owner = &product.owner_id;
        let location = match self.ports.profiles.find_location(owner).await {
            Ok(Some(location)) => location,
            Ok(None) => {
                info!(
                    product_id = %product.id,
                    owner_id = %owner,
                    "owner has no location; skipping search alert fan-out"
                );
                return AlertFanOutReport::skipped(FanOutSkip::OwnerLocationMissing);
            }
            Err(error) => {
                warn!(
                    product_id = %product.id,
                    owner_id = %owner,
                    error = %error,
                    "owner location lookup failed; skipping search alert fan-out"
                );
                return AlertFanOutReport::skipped(FanOutSkip::OwnerLookupFailed);
            }
        };

        let candidates = match self
            .ports
            .nearby_users
            .find_within(location, ALERT_RADIUS_METRES, owner)
            .await
        {
            Ok(candidates) => candidates,
            Err(error) => {
                warn!(
                    product_id = %product.id,
                    error = %error,
                    "alert candidate lookup failed; skipping search alert fan-out"
                );
                return AlertFanOutReport::skipped(FanOutSkip::CandidateLookupFailed);
            }
        };

        let report = stream::iter(candidates)
            .map(|candidate| self.evaluate(candidate, product))
            .buffer_unordered(self.concurrency)
            .fold(AlertFanOutReport::default(), |report, outcome| async move {
                report.absorb(outcome)
            })
            .await;

        info!(
            product_id = %product.id,
            candidates = report.candidates_scanned,
            evaluated = report.alerts_evaluated,
            matches = report.matches,
            recorded = report.notifications_recorded,
            dispatched = report.pushes_dispatched,
            failures = report.failures.len(),
            "search alert fan-out finished"
        );
        report
    }

    async fn evaluate(&self, candidate: UserId, product: &Product) -> CandidateOutcome {
        let mut outcome = CandidateOutcome::default();
        let alert = match self.ports.search_alerts.find_by_user(&candidate).await {
            Ok(Some(alert)) => alert,
            Ok(None) => return outcome,
            Err(error) => return outcome.failed(&candidate, FanOutStage::LoadAlert, error),
        };

        outcome.evaluated = true;
        if !alert.matches(product) {
            return outcome;
        }
        outcome.matched = true;

        let notification =
            SearchAlertNotification::new(candidate.clone(), product.id, self.clock.utc());
        match self.ports.alert_notifications.record(&notification).await {
            Ok(true) => outcome.recorded = true,
            Ok(false) => {
                debug!(
                    user_id = %candidate,
                    product_id = %product.id,
                    "alert notification already recorded"
                );
                return outcome;
            }
            Err(error) => {
                return outcome.failed(&candidate, FanOutStage::RecordNotification, error);
            }
        }

        match self.push(&candidate, product).await {
            Ok(dispatched) => outcome.dispatched = dispatched,
            Err((stage, message)) => return outcome.failed(&candidate, stage, message),
        }
        outcome
    }

    /// Push the match to the candidate's devices. `Ok(false)` means delivery
    /// was skipped by the user's settings.
    async fn push(
        &self,
        candidate: &UserId,
        product: &Product,
    ) -> Result<bool, (FanOutStage, String)> {
        let target = self
            .ports
            .profiles
            .find_push_target(candidate)
            .await
            .map_err(|error| (FanOutStage::LoadPushTarget, error.to_string()))?;
        let Some(tokens) = target.and_then(|target| target.deliverable_tokens()) else {
            debug!(user_id = %candidate, "push delivery skipped by user settings");
            return Ok(false);
        };

        let product_images = self
            .ports
            .images
            .resolve(&product.image_keys)
            .await
            .map_err(|error| (FanOutStage::ResolveImages, error.to_string()))?;
        let message = PushMessage::search_alert(AlertPushPayload {
            receiver_id: candidate.clone(),
            product_id: product.id,
            product_images,
            product_name: product.name.clone(),
            product_description: product.description.clone(),
        });

        self.ports
            .push
            .send(&tokens, &message)
            .await
            .map_err(|error| (FanOutStage::Dispatch, error.to_string()))?;
        Ok(true)
    }
}

//! Forward service: one attempt per save trigger
//!
//! Entry point is [`ForwardService::on_content_saved`], invoked by the
//! content-storage collaborator after every save. The service filters
//! out saves that must not forward, builds the snapshot once, publishes
//! to each selected portal in order (primary strategy, then the
//! flattened-tags fallback once on failure), and records the outcome.
//!
//! Nothing is ever raised back to the trigger: failures are absorbed,
//! logged, and visible only through the returned [`ForwardReport`].

use std::sync::Arc;

use crosspost_domain::{
    CrosspostError, ForwardOutcome, ForwardReport, Portal, PostSnapshot, PostStatus, SaveContext,
    SkipReason,
};
use tracing::{debug, info, warn};

use super::guard::{AttemptGuard, GuardTtls, LockState};
use super::payload;
use super::ports::{ContentRepository, FlagStore, OptionsProvider, PublishReceipt, RemotePublisher};
use super::snapshot::SnapshotBuilder;

/// Orchestrates forward attempts.
pub struct ForwardService {
    guard: AttemptGuard,
    snapshots: SnapshotBuilder,
    content: Arc<dyn ContentRepository>,
    publisher: Arc<dyn RemotePublisher>,
    options: Arc<dyn OptionsProvider>,
}

impl ForwardService {
    pub fn new(
        content: Arc<dyn ContentRepository>,
        publisher: Arc<dyn RemotePublisher>,
        flags: Arc<dyn FlagStore>,
        options: Arc<dyn OptionsProvider>,
    ) -> Self {
        Self::with_guard_ttls(content, publisher, flags, options, GuardTtls::default())
    }

    /// Custom guard lifetimes, used by tests that exercise expiry.
    pub fn with_guard_ttls(
        content: Arc<dyn ContentRepository>,
        publisher: Arc<dyn RemotePublisher>,
        flags: Arc<dyn FlagStore>,
        options: Arc<dyn OptionsProvider>,
        ttls: GuardTtls,
    ) -> Self {
        Self {
            guard: AttemptGuard::with_ttls(flags, ttls),
            snapshots: SnapshotBuilder::new(Arc::clone(&content)),
            content,
            publisher,
            options,
        }
    }

    /// Handle one save trigger.
    ///
    /// Acquires the re-entrancy guard before any other work and releases
    /// it on every exit path. Never returns an error.
    pub async fn on_content_saved(&self, item_id: u64, ctx: SaveContext) -> ForwardReport {
        if self.guard.try_enter(item_id) == LockState::Rejected {
            return ForwardReport::Skipped(SkipReason::AlreadyHandled);
        }

        let report = self.run_attempt(item_id, ctx).await;
        self.guard.release(item_id);
        report
    }

    async fn run_attempt(&self, item_id: u64, ctx: SaveContext) -> ForwardReport {
        if !ctx.is_forwardable() {
            debug!(item_id, "save is a revision, autosave, or import; not forwarding");
            return ForwardReport::Skipped(SkipReason::TriggerNotApplicable);
        }

        let options = match self.options.forwarding_options() {
            Ok(options) => options,
            Err(err) => {
                warn!(item_id, error = %err, "failed to load forwarding options");
                return ForwardReport::Skipped(SkipReason::ForwardingDisabled);
            }
        };
        if !options.enabled {
            debug!(item_id, "forwarding disabled");
            return ForwardReport::Skipped(SkipReason::ForwardingDisabled);
        }

        let selected = match self.content.selected_portals(item_id).await {
            Ok(selected) => selected,
            Err(err) => {
                warn!(item_id, error = %err, "failed to read portal selection");
                return ForwardReport::Skipped(SkipReason::NoPortalsSelected);
            }
        };
        if selected.is_empty() {
            debug!(item_id, "no portals selected");
            return ForwardReport::Skipped(SkipReason::NoPortalsSelected);
        }

        let snapshot = match self.snapshots.build(item_id).await {
            Ok(snapshot) => snapshot,
            Err(CrosspostError::NotFound(what)) => {
                debug!(item_id, what = %what, "content item vanished before forwarding");
                return ForwardReport::Skipped(SkipReason::ContentNotFound);
            }
            Err(err) => {
                warn!(item_id, error = %err, "failed to build content snapshot");
                return ForwardReport::Skipped(SkipReason::ContentNotFound);
            }
        };

        let mut outcome = ForwardOutcome::default();
        for key in &selected {
            let Some(portal) = options.portal(key) else {
                // Stale selection pointing at a portal that is no longer
                // configured.
                debug!(item_id, portal = %key, "selected portal not in registry; skipping");
                continue;
            };

            if self.forward_to_portal(&snapshot, key, portal, options.post_status).await {
                outcome.record_success(key);
            } else {
                outcome.record_failure(key);
            }
        }

        if outcome.any_success() {
            self.guard.mark_recently_forwarded(item_id);
        }

        info!(
            item_id,
            succeeded = outcome.succeeded.len(),
            failed = outcome.failed.len(),
            "forward attempt completed"
        );
        ForwardReport::Completed(outcome)
    }

    /// Publish to one portal: primary strategy first, the flattened-tags
    /// fallback exactly once on failure. Only the first 2xx counts.
    async fn forward_to_portal(
        &self,
        snapshot: &PostSnapshot,
        key: &str,
        portal: &Portal,
        status: PostStatus,
    ) -> bool {
        let body = payload::primary_body(snapshot, status);
        match self.publisher.create_content(portal, &snapshot.post_type, &body).await {
            Ok(receipt) => {
                info!(item_id = snapshot.id, portal = %key, "forwarded with structured taxonomy mapping");
                self.maybe_attach_media(snapshot, portal, &receipt).await;
                return true;
            }
            Err(err) => {
                warn!(
                    item_id = snapshot.id,
                    portal = %key,
                    error = %err,
                    "structured payload rejected; retrying with flattened tags"
                );
            }
        }

        let body = payload::fallback_body(snapshot, status);
        match self.publisher.create_content(portal, &snapshot.post_type, &body).await {
            Ok(receipt) => {
                info!(item_id = snapshot.id, portal = %key, "forwarded with flattened tags");
                self.maybe_attach_media(snapshot, portal, &receipt).await;
                true
            }
            Err(err) => {
                warn!(item_id = snapshot.id, portal = %key, error = %err, "forwarding failed");
                false
            }
        }
    }

    async fn maybe_attach_media(
        &self,
        snapshot: &PostSnapshot,
        portal: &Portal,
        receipt: &PublishReceipt,
    ) {
        let Some(media_url) = &snapshot.featured_image_url else { return };
        let Some(remote_id) = receipt.remote_id else {
            // A 2xx create without an id is tolerated; only the featured
            // image attachment is skipped.
            debug!(item_id = snapshot.id, "create response had no id; skipping featured image");
            return;
        };

        self.publisher
            .attach_featured_media(portal, &snapshot.post_type, remote_id, media_url)
            .await;
    }
}

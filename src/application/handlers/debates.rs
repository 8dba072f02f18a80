//! Debate lifecycle handlers: list-debates, create-debate, close-debate.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::application::commands::{CreateDebate, Reply};
use crate::application::router::{bounded, EventRouter, ModeratorContext, Step};
use crate::domain::debate::DebateSummary;
use crate::domain::foundation::{DebateId, Timestamp};

/// Live tracked debates merged with this moderator's persisted discussions.
///
/// The live set is taken when the command arrives; storage is read after.
/// When both sides know a debate, the live entry wins.
pub(crate) fn list_debates(router: &EventRouter, ctx: &ModeratorContext) -> Step {
    let live: Vec<DebateSummary> = router.store.with(|r| {
        r.tracked_debates(ctx.username())
            .into_iter()
            .map(|d| d.summary())
            .collect()
    });

    let discussions = router.discussions.clone();
    let timeout = router.limits.persistence_timeout();
    let username = ctx.username().clone();

    Step::Pending(Box::pin(async move {
        let persisted = match bounded(
            timeout,
            "list discussions",
            discussions.list_for_moderator(&username),
        )
        .await
        {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(moderator = %username, error = %e, "Listing persisted discussions failed, returning live debates only");
                Vec::new()
            }
        };

        let mut merged: BTreeMap<DebateId, DebateSummary> = persisted
            .into_iter()
            .map(|s| (s.debate_id, s))
            .collect();
        for summary in live {
            merged.insert(summary.debate_id, summary);
        }

        Reply::Debates(merged.into_values().collect())
    }))
}

/// Open a debate owned by the caller and persist its record.
///
/// The reply is the new id whether or not the save succeeds. A close that
/// lands while the save is in flight finds no row to mark, so the close is
/// written here once the row exists.
pub(crate) fn create_debate(router: &EventRouter, ctx: &ModeratorContext, cmd: CreateDebate) -> Step {
    let record = router.store.with(|r| {
        r.open_debate(
            &ctx.moderator,
            cmd.title,
            cmd.description,
            router.audience.clone(),
        )
    });

    info!(moderator = %ctx.username(), debate_id = %record.id, "Debate created");

    let store = router.store.clone();
    let discussions = router.discussions.clone();
    let timeout = router.limits.persistence_timeout();

    Step::Pending(Box::pin(async move {
        let id = record.id;
        if let Err(e) = bounded(timeout, "save discussion", discussions.save_discussion(&record)).await {
            warn!(debate_id = %id, error = %e, "Persisting new debate failed; debate stays live");
        }

        if !store.with(|r| r.debates.contains(id)) {
            match bounded(
                timeout,
                "mark discussion closed",
                discussions.mark_closed(id, Timestamp::now()),
            )
            .await
            {
                Ok(true) => info!(debate_id = %id, "Recorded close that arrived during the initial save"),
                Ok(false) => warn!(debate_id = %id, "Debate closed during save but no row to mark"),
                Err(e) => warn!(debate_id = %id, error = %e, "Persisting early close failed"),
            }
        }

        Reply::Id(id.value())
    }))
}

/// Close a live debate. The reply is the outcome of persisting the close.
pub(crate) fn close_debate(router: &EventRouter, ctx: &ModeratorContext, id: DebateId) -> Step {
    let closed_at = Timestamp::now();
    let Some(debate) = router.store.with(|r| r.close_debate(id, closed_at)) else {
        debug!(moderator = %ctx.username(), debate_id = %id, "close-debate on unknown debate");
        return Step::Done(Reply::Flag(false));
    };

    info!(
        moderator = %ctx.username(),
        debate_id = %id,
        questions = debate.question_count(),
        "Debate closed"
    );

    let discussions = router.discussions.clone();
    let timeout = router.limits.persistence_timeout();

    Step::Pending(Box::pin(async move {
        match bounded(timeout, "mark discussion closed", discussions.mark_closed(id, closed_at)).await {
            Ok(updated) => {
                if !updated {
                    warn!(debate_id = %id, "No persisted discussion to mark closed");
                }
                Reply::Flag(updated)
            }
            Err(e) => {
                warn!(debate_id = %id, error = %e, "Persisting debate close failed");
                Reply::Flag(false)
            }
        }
    }))
}

//! EventRouter - the moderator command surface.
//!
//! The router owns the moderation store and the collaborator ports. Each
//! connection gets a [`ModeratorContext`] once the gate lets it through;
//! every inbound frame is then decoded and handed to one stateless handler
//! function together with that context.
//!
//! # Reply discipline
//!
//! - A frame without an `ack` is dropped before decoding; nothing runs.
//! - A frame that fails decoding gets its command's failure sentinel.
//! - Otherwise the handler's reply is returned exactly once.
//!
//! # Ordering
//!
//! [`EventRouter::begin`] runs a command's registry work synchronously and
//! hands back whatever is left to await (persistence) as a [`Dispatch`].
//! Calling `begin` for each frame in arrival order applies registry effects
//! in arrival order, while pending persistence never blocks later frames.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;

use tracing::{debug, info};

use crate::config::ModerationConfig;
use crate::domain::foundation::{
    AuthenticatedModerator, ConnectionId, DomainError, ErrorCode, Username,
};
use crate::ports::{AudienceBroadcaster, DiscussionRepository};

use super::commands::{Acknowledgement, Command, CommandEnvelope, CommandKind, Reply};
use super::handlers;
use super::registry::ModerationStore;

/// Who is calling, bound to one authenticated connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeratorContext {
    pub moderator: AuthenticatedModerator,
    pub connection_id: ConnectionId,
}

impl ModeratorContext {
    pub fn username(&self) -> &Username {
        &self.moderator.username
    }
}

/// A handler's outcome once its registry work is done.
pub(crate) enum Step {
    Done(Reply),
    /// Registry effects applied; the reply waits on persistence.
    Pending(BoxFuture<'static, Reply>),
}

impl Step {
    pub(crate) async fn finish(self) -> Reply {
        match self {
            Step::Done(reply) => reply,
            Step::Pending(pending) => pending.await,
        }
    }
}

/// A command whose registry effects have been applied.
pub enum Dispatch {
    /// The reply is already known.
    Ready(Acknowledgement),
    /// The reply waits on persistence; await it off the read loop.
    Pending(BoxFuture<'static, Acknowledgement>),
}

impl Dispatch {
    pub async fn resolve(self) -> Acknowledgement {
        match self {
            Dispatch::Ready(ack) => ack,
            Dispatch::Pending(pending) => pending.await,
        }
    }
}

/// Routes decoded commands to their handlers.
pub struct EventRouter {
    pub(crate) store: Arc<ModerationStore>,
    pub(crate) discussions: Arc<dyn DiscussionRepository>,
    pub(crate) audience: Arc<dyn AudienceBroadcaster>,
    pub(crate) limits: ModerationConfig,
}

impl EventRouter {
    pub fn new(
        store: Arc<ModerationStore>,
        discussions: Arc<dyn DiscussionRepository>,
        audience: Arc<dyn AudienceBroadcaster>,
        limits: ModerationConfig,
    ) -> Self {
        Self {
            store,
            discussions,
            audience,
            limits,
        }
    }

    pub fn store(&self) -> &Arc<ModerationStore> {
        &self.store
    }

    /// Bind a freshly authenticated connection to its moderator session.
    pub fn attach(&self, moderator: AuthenticatedModerator) -> ModeratorContext {
        let connection_id = ConnectionId::new();
        let reconnect = self
            .store
            .with(|r| r.sessions.initialize(&moderator, connection_id));

        info!(
            moderator = %moderator.username,
            connection_id = %connection_id,
            reconnect,
            "Moderator connected"
        );
        ModeratorContext {
            moderator,
            connection_id,
        }
    }

    /// Release the connection handle; the session and its tracked set stay.
    pub fn detach(&self, ctx: &ModeratorContext) {
        let cleared = self
            .store
            .with(|r| r.sessions.detach(ctx.username(), ctx.connection_id));

        info!(
            moderator = %ctx.username(),
            connection_id = %ctx.connection_id,
            superseded = !cleared,
            "Moderator disconnected"
        );
    }

    /// Apply one inbound frame's registry effects now.
    ///
    /// Returns `None` when the frame carries no `ack`, i.e. there is nobody
    /// to reply to. Must be called in arrival order for a connection.
    pub fn begin(&self, ctx: &ModeratorContext, envelope: CommandEnvelope) -> Option<Dispatch> {
        let Some(ack) = envelope.ack else {
            debug!(
                moderator = %ctx.username(),
                event = %envelope.event,
                "Dropping command without ack"
            );
            return None;
        };

        let step = match envelope.event.parse::<CommandKind>() {
            Ok(kind) => match Command::decode(kind, envelope.data, &self.limits) {
                Ok(command) => self.step(ctx, command),
                Err(e) => {
                    debug!(moderator = %ctx.username(), event = %kind, "Rejected payload: {}", e);
                    Step::Done(kind.failure_reply())
                }
            },
            Err(e) => {
                debug!(moderator = %ctx.username(), "{}", e);
                Step::Done(Reply::Flag(false))
            }
        };

        Some(match step {
            Step::Done(reply) => Dispatch::Ready(Acknowledgement { ack, reply }),
            pending => Dispatch::Pending(Box::pin(async move {
                Acknowledgement {
                    ack,
                    reply: pending.finish().await,
                }
            })),
        })
    }

    /// Handle one inbound frame through to its reply.
    pub async fn dispatch(
        &self,
        ctx: &ModeratorContext,
        envelope: CommandEnvelope,
    ) -> Option<Acknowledgement> {
        Some(self.begin(ctx, envelope)?.resolve().await)
    }

    fn step(&self, ctx: &ModeratorContext, command: Command) -> Step {
        match command {
            Command::ListDebates => handlers::list_debates(self, ctx),
            Command::ListQuestions(id) => Step::Done(handlers::list_questions(self, id)),
            Command::ListSuggestions(id) => Step::Done(handlers::list_suggestions(self, id)),
            Command::CreateDebate(cmd) => handlers::create_debate(self, ctx, cmd),
            Command::CloseDebate(id) => handlers::close_debate(self, ctx, id),
            Command::NewQuestion(cmd) => Step::Done(handlers::new_question(self, ctx, cmd)),
            Command::ApproveSuggestion(cmd) => {
                Step::Done(handlers::approve_suggestion(self, ctx, cmd))
            }
            Command::RejectSuggestion(cmd) => {
                Step::Done(handlers::reject_suggestion(self, ctx, cmd))
            }
            Command::BanUser(cmd) => Step::Done(handlers::ban_user(self, ctx, cmd)),
        }
    }
}

/// Await a persistence call, giving up after `timeout`.
pub(crate) async fn bounded<T>(
    timeout: Duration,
    operation: &'static str,
    call: impl Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(DomainError::new(
            ErrorCode::Timeout,
            format!("{} timed out after {:?}", operation, timeout),
        )
        .with_detail("operation", operation)),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{connect, router};
    use super::*;
    use serde_json::json;

    fn envelope(event: &str, ack: Option<u64>, data: serde_json::Value) -> CommandEnvelope {
        CommandEnvelope {
            event: event.to_string(),
            ack,
            data,
        }
    }

    #[tokio::test]
    async fn frame_without_ack_is_dropped_without_side_effects() {
        let router = router();
        let ctx = connect(&router, "alice");

        let result = router
            .dispatch(
                &ctx,
                envelope("create-debate", None, json!({"title": "T", "description": "D"})),
            )
            .await;

        assert!(result.is_none());
        assert!(router.store().with(|r| r.debates.is_empty()));
    }

    #[tokio::test]
    async fn unknown_event_gets_false() {
        let router = router();
        let ctx = connect(&router, "alice");

        let ack = router
            .dispatch(&ctx, envelope("shutdown", Some(1), json!(null)))
            .await
            .unwrap();

        assert_eq!(ack, Acknowledgement { ack: 1, reply: Reply::Flag(false) });
    }

    #[tokio::test]
    async fn malformed_payload_gets_command_sentinel() {
        let router = router();
        let ctx = connect(&router, "alice");

        let ack = router
            .dispatch(&ctx, envelope("list-questions", Some(2), json!("one")))
            .await
            .unwrap();
        assert_eq!(ack.reply, Reply::Id(-1));

        let ack = router
            .dispatch(&ctx, envelope("approve-suggestion", Some(3), json!({})))
            .await
            .unwrap();
        assert_eq!(ack.reply, Reply::Flag(false));
    }

    #[tokio::test]
    async fn reattach_keeps_tracked_debates() {
        let router = router();
        let first = connect(&router, "alice");
        let ack = router
            .dispatch(
                &first,
                envelope("create-debate", Some(1), json!({"title": "T", "description": "D"})),
            )
            .await
            .unwrap();
        let Reply::Id(id) = ack.reply else {
            panic!("expected id reply");
        };

        router.detach(&first);
        let second = connect(&router, "alice");

        let tracked = router.store().with(|r| r.sessions.tracked(second.username()));
        assert_eq!(tracked.iter().map(|d| d.value()).collect::<Vec<_>>(), vec![id]);
    }

    #[tokio::test]
    async fn registry_effects_apply_before_persistence_settles() {
        let router = router();
        let ctx = connect(&router, "alice");
        let created = router
            .dispatch(
                &ctx,
                envelope("create-debate", Some(1), json!({"title": "T", "description": "D"})),
            )
            .await
            .unwrap();
        assert_eq!(created.reply, Reply::Id(1));

        let close = router
            .begin(&ctx, envelope("close-debate", Some(2), json!(1)))
            .unwrap();
        assert!(matches!(close, Dispatch::Pending(_)));

        // The close has not been persisted yet, but the debate is already gone.
        let listed = router
            .begin(&ctx, envelope("list-questions", Some(3), json!(1)))
            .unwrap();
        let Dispatch::Ready(listed) = listed else {
            panic!("list-questions never waits on storage");
        };
        assert_eq!(listed.reply, Reply::Id(-1));

        assert_eq!(close.resolve().await.reply, Reply::Flag(true));
    }

    #[tokio::test]
    async fn bounded_call_times_out() {
        tokio::time::pause();
        let result: Result<(), DomainError> = bounded(Duration::from_secs(1), "slow call", async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            Ok(())
        })
        .await;

        let err = result.unwrap_err();
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.details.get("operation").map(String::as_str), Some("slow call"));
    }
}

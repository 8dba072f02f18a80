//! Suggestion handlers: list-suggestions, approve-suggestion, reject-suggestion.

use tracing::{debug, info};

use crate::application::commands::{Reply, SuggestionDecision, ID_SENTINEL};
use crate::application::router::{EventRouter, ModeratorContext};
use crate::domain::debate::{Debate, DebateError};
use crate::domain::foundation::{DebateId, SuggestionId};

pub(crate) fn list_suggestions(router: &EventRouter, id: DebateId) -> Reply {
    router.store.with(|r| match r.debates.lookup(id) {
        Some(debate) => Reply::Suggestions(debate.approved_suggestions()),
        None => {
            debug!(debate_id = %id, "list-suggestions on unknown debate");
            Reply::Id(ID_SENTINEL)
        }
    })
}

pub(crate) fn approve_suggestion(
    router: &EventRouter,
    ctx: &ModeratorContext,
    cmd: SuggestionDecision,
) -> Reply {
    decide(router, ctx, cmd, "approved", Debate::approve_suggestion)
}

pub(crate) fn reject_suggestion(
    router: &EventRouter,
    ctx: &ModeratorContext,
    cmd: SuggestionDecision,
) -> Reply {
    decide(router, ctx, cmd, "rejected", Debate::reject_suggestion)
}

fn decide(
    router: &EventRouter,
    ctx: &ModeratorContext,
    cmd: SuggestionDecision,
    outcome: &'static str,
    apply: fn(&mut Debate, SuggestionId) -> Result<(), DebateError>,
) -> Reply {
    let result = router.store.with(|r| {
        let debate = r
            .debates
            .lookup_mut(cmd.debate_id)
            .ok_or(DebateError::NotFound(cmd.debate_id))?;
        apply(debate, cmd.suggestion_id)
    });

    match result {
        Ok(()) => {
            info!(
                moderator = %ctx.username(),
                debate_id = %cmd.debate_id,
                suggestion_id = %cmd.suggestion_id,
                "Suggestion {}", outcome
            );
            Reply::Flag(true)
        }
        Err(e) => {
            debug!(
                moderator = %ctx.username(),
                debate_id = %cmd.debate_id,
                code = %e.code(),
                "Suggestion decision refused: {}", e
            );
            Reply::Flag(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::router::test_support::{connect, router};
    use uuid::Uuid;

    /// Register a debate directly and submit `count` suggestions to it.
    fn debate_with_suggestions(router: &EventRouter, ctx: &ModeratorContext, count: usize) -> DebateId {
        router.store.with(|r| {
            let record = r.open_debate(&ctx.moderator, "T".into(), "D".into(), router.audience.clone());
            let debate = r.debates.lookup_mut(record.id).unwrap();
            for n in 0..count {
                debate.submit_suggestion(format!("suggestion {}", n), Uuid::new_v4());
            }
            record.id
        })
    }

    fn decision(debate_id: DebateId, suggestion_id: i64) -> SuggestionDecision {
        SuggestionDecision {
            debate_id,
            suggestion_id: SuggestionId::new(suggestion_id),
        }
    }

    #[test]
    fn approved_suggestion_is_listed() {
        let router = router();
        let ctx = connect(&router, "alice");
        let id = debate_with_suggestions(&router, &ctx, 2);

        assert_eq!(approve_suggestion(&router, &ctx, decision(id, 2)), Reply::Flag(true));

        let Reply::Suggestions(approved) = list_suggestions(&router, id) else {
            panic!("expected suggestions");
        };
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].suggestion_id, SuggestionId::new(2));
    }

    #[test]
    fn rejected_suggestion_is_not_listed() {
        let router = router();
        let ctx = connect(&router, "alice");
        let id = debate_with_suggestions(&router, &ctx, 1);

        assert_eq!(reject_suggestion(&router, &ctx, decision(id, 1)), Reply::Flag(true));
        assert_eq!(list_suggestions(&router, id), Reply::Suggestions(vec![]));
    }

    #[test]
    fn second_decision_fails() {
        let router = router();
        let ctx = connect(&router, "alice");
        let id = debate_with_suggestions(&router, &ctx, 1);

        approve_suggestion(&router, &ctx, decision(id, 1));
        assert_eq!(reject_suggestion(&router, &ctx, decision(id, 1)), Reply::Flag(false));
        assert_eq!(approve_suggestion(&router, &ctx, decision(id, 1)), Reply::Flag(false));
    }

    #[test]
    fn unknown_suggestion_or_debate_is_false() {
        let router = router();
        let ctx = connect(&router, "alice");
        let id = debate_with_suggestions(&router, &ctx, 0);

        assert_eq!(approve_suggestion(&router, &ctx, decision(id, 999)), Reply::Flag(false));
        assert_eq!(
            approve_suggestion(&router, &ctx, decision(DebateId::new(77), 1)),
            Reply::Flag(false)
        );
        assert_eq!(list_suggestions(&router, DebateId::new(77)), Reply::Id(-1));
    }
}

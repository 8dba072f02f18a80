//! Question handlers: list-questions, new-question.

use tracing::{debug, info};

use crate::application::commands::{NewQuestion, Reply, ID_SENTINEL};
use crate::application::router::{EventRouter, ModeratorContext};
use crate::domain::foundation::DebateId;

pub(crate) fn list_questions(router: &EventRouter, id: DebateId) -> Reply {
    router.store.with(|r| match r.debates.lookup(id) {
        Some(debate) => Reply::Questions(debate.formatted_questions()),
        None => {
            debug!(debate_id = %id, "list-questions on unknown debate");
            Reply::Id(ID_SENTINEL)
        }
    })
}

/// Add a question to a live debate; the debate broadcasts it to its audience.
pub(crate) fn new_question(router: &EventRouter, ctx: &ModeratorContext, cmd: NewQuestion) -> Reply {
    let debate_id = cmd.debate_id;
    let created = router.store.with(|r| {
        r.debates
            .lookup_mut(debate_id)
            .map(|debate| debate.new_question(cmd.title, cmd.answers, cmd.is_open))
    });

    match created {
        Some(question_id) => {
            info!(
                moderator = %ctx.username(),
                debate_id = %debate_id,
                question_id = %question_id,
                open = cmd.is_open,
                "Question added"
            );
            Reply::Id(question_id.value())
        }
        None => {
            debug!(moderator = %ctx.username(), debate_id = %debate_id, "new-question on unknown debate");
            Reply::Id(ID_SENTINEL)
        }
    }
}

//! Audience moderation: ban-user.

use tracing::{debug, info};

use crate::application::commands::{BanUser, Reply};
use crate::application::router::{EventRouter, ModeratorContext};

/// Acknowledge a ban request against a live debate.
///
/// Only the debate's existence is checked. No ban is recorded and the user
/// is not disconnected from the audience.
pub(crate) fn ban_user(router: &EventRouter, ctx: &ModeratorContext, cmd: BanUser) -> Reply {
    if !router.store.with(|r| r.debates.contains(cmd.debate_id)) {
        debug!(moderator = %ctx.username(), debate_id = %cmd.debate_id, "ban-user on unknown debate");
        return Reply::Flag(false);
    }

    info!(
        moderator = %ctx.username(),
        debate_id = %cmd.debate_id,
        user = %cmd.user,
        "Ban requested"
    );
    Reply::Flag(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::router::test_support::{connect, router};
    use crate::domain::foundation::DebateId;
    use uuid::Uuid;

    #[test]
    fn ban_on_live_debate_is_acknowledged() {
        let router = router();
        let ctx = connect(&router, "alice");
        let id = router.store.with(|r| {
            r.open_debate(&ctx.moderator, "T".into(), "D".into(), router.audience.clone())
                .id
        });

        let reply = ban_user(&router, &ctx, BanUser { debate_id: id, user: Uuid::new_v4() });
        assert_eq!(reply, Reply::Flag(true));
    }

    #[test]
    fn ban_on_unknown_debate_is_false() {
        let router = router();
        let ctx = connect(&router, "alice");

        let reply = ban_user(
            &router,
            &ctx,
            BanUser {
                debate_id: DebateId::new(3),
                user: Uuid::new_v4(),
            },
        );
        assert_eq!(reply, Reply::Flag(false));
    }
}

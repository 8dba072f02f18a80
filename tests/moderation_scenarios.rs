//! Integration tests for the moderator command surface.
//!
//! These tests drive the `EventRouter` the way the WebSocket transport does,
//! with JSON envelopes and in-memory adapters:
//! 1. Debate lifecycle (create, list, close)
//! 2. Questions and suggestions on live and closed debates
//! 3. Reconnect behavior and registry consistency under concurrency
//! 4. Arrival order of registry effects and closes racing an initial save

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;
use serde_json::{json, Value};
use uuid::Uuid;

use debate_moderation::adapters::memory::InMemoryDiscussionRepository;
use debate_moderation::adapters::websocket::RoomManager;
use debate_moderation::application::{
    Command, CommandEnvelope, CommandKind, Dispatch, EventRouter, ModerationStore,
    ModeratorContext, Reply,
};
use debate_moderation::config::ModerationConfig;
use debate_moderation::domain::debate::DebateSummary;
use debate_moderation::domain::foundation::{
    AuthenticatedModerator, DebateId, ModeratorId, Timestamp, Username,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    router: Arc<EventRouter>,
    discussions: Arc<InMemoryDiscussionRepository>,
    next_ack: std::sync::atomic::AtomicU64,
}

impl Harness {
    fn new() -> Self {
        Self::with_repository(InMemoryDiscussionRepository::new())
    }

    fn with_repository(repository: InMemoryDiscussionRepository) -> Self {
        let discussions = Arc::new(repository);
        let router = EventRouter::new(
            Arc::new(ModerationStore::default()),
            discussions.clone(),
            Arc::new(RoomManager::default()),
            ModerationConfig::default(),
        );
        Self {
            router: Arc::new(router),
            discussions,
            next_ack: std::sync::atomic::AtomicU64::new(1),
        }
    }

    fn connect(&self, name: &str) -> ModeratorContext {
        self.router.attach(AuthenticatedModerator::new(
            Username::new(name).unwrap(),
            ModeratorId::new(1),
        ))
    }

    fn envelope(&self, event: &str, data: Value) -> CommandEnvelope {
        let ack = self
            .next_ack
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        CommandEnvelope {
            event: event.to_string(),
            ack: Some(ack),
            data,
        }
    }

    fn begin(&self, ctx: &ModeratorContext, event: &str, data: Value) -> Dispatch {
        self.router.begin(ctx, self.envelope(event, data)).unwrap()
    }

    async fn send(&self, ctx: &ModeratorContext, event: &str, data: Value) -> Reply {
        let envelope = self.envelope(event, data);
        let ack = envelope.ack.unwrap();
        let reply = self.router.dispatch(ctx, envelope).await.unwrap();
        assert_eq!(reply.ack, ack);
        reply.reply
    }

    async fn create_debate(&self, ctx: &ModeratorContext, title: &str) -> i64 {
        match self
            .send(ctx, "create-debate", json!({"title": title, "description": "D"}))
            .await
        {
            Reply::Id(id) if id > 0 => id,
            other => panic!("create-debate failed: {:?}", other),
        }
    }

    fn submit_suggestion(&self, debate_id: i64, content: &str) -> i64 {
        self.router.store().with(|r| {
            r.debates
                .lookup_mut(DebateId::new(debate_id))
                .unwrap()
                .submit_suggestion(content.to_string(), Uuid::new_v4())
                .value()
        })
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn created_debate_appears_in_list() {
    let h = Harness::new();
    let alice = h.connect("alice");

    let id = h.create_debate(&alice, "T").await;

    let reply = h.send(&alice, "list-debates", Value::Null).await;
    assert_eq!(
        reply,
        Reply::Debates(vec![DebateSummary {
            debate_id: DebateId::new(id),
            title: "T".to_string(),
            description: "D".to_string(),
            closed: false,
        }])
    );
    assert!(h.discussions.get(DebateId::new(id)).is_some());
}

#[tokio::test]
async fn new_debate_resolves_with_empty_collections() {
    let h = Harness::new();
    let alice = h.connect("alice");
    let id = h.create_debate(&alice, "T").await;

    assert_eq!(
        h.send(&alice, "list-questions", json!(id)).await,
        Reply::Questions(vec![])
    );
    assert_eq!(
        h.send(&alice, "list-suggestions", json!({"debateId": id})).await,
        Reply::Suggestions(vec![])
    );
}

#[tokio::test]
async fn question_with_two_answers_is_listed() {
    let h = Harness::new();
    let alice = h.connect("alice");
    let id = h.create_debate(&alice, "T").await;

    let reply = h
        .send(
            &alice,
            "new-question",
            json!({"debateId": id, "title": "Q", "answers": ["a", "b"], "isOpenQuestion": false}),
        )
        .await;
    assert!(matches!(reply, Reply::Id(q) if q > 0));

    let Reply::Questions(questions) = h.send(&alice, "list-questions", json!(id)).await else {
        panic!("expected questions");
    };
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].answers.len(), 2);
}

#[tokio::test]
async fn closed_debate_no_longer_resolves() {
    let h = Harness::new();
    let alice = h.connect("alice");
    let id = h.create_debate(&alice, "T").await;

    assert_eq!(h.send(&alice, "close-debate", json!(id)).await, Reply::Flag(true));
    assert_eq!(h.send(&alice, "list-questions", json!(id)).await, Reply::Id(-1));

    let Reply::Debates(debates) = h.send(&alice, "list-debates", Value::Null).await else {
        panic!("expected debates");
    };
    assert_eq!(debates.len(), 1);
    assert!(debates[0].closed);
}

#[tokio::test]
async fn approving_unknown_suggestion_is_false() {
    let h = Harness::new();
    let alice = h.connect("alice");
    let id = h.create_debate(&alice, "T").await;

    let reply = h
        .send(
            &alice,
            "approve-suggestion",
            json!({"suggestionId": 999, "debateId": id}),
        )
        .await;
    assert_eq!(reply, Reply::Flag(false));
}

#[tokio::test]
async fn second_approval_is_false() {
    let h = Harness::new();
    let alice = h.connect("alice");
    let id = h.create_debate(&alice, "T").await;
    let suggestion = h.submit_suggestion(id, "Ask about parking");

    let decision = json!({"suggestionId": suggestion, "debateId": id});
    assert_eq!(
        h.send(&alice, "approve-suggestion", decision.clone()).await,
        Reply::Flag(true)
    );
    assert_eq!(
        h.send(&alice, "approve-suggestion", decision).await,
        Reply::Flag(false)
    );

    let Reply::Suggestions(approved) = h.send(&alice, "list-suggestions", json!(id)).await else {
        panic!("expected suggestions");
    };
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].content, "Ask about parking");
}

#[tokio::test]
async fn unknown_debate_ids_get_sentinels() {
    let h = Harness::new();
    let alice = h.connect("alice");
    let missing = 4242;

    let cases = [
        ("list-questions", json!(missing), Reply::Id(-1)),
        ("list-suggestions", json!(missing), Reply::Id(-1)),
        ("close-debate", json!(missing), Reply::Flag(false)),
        (
            "new-question",
            json!({"debateId": missing, "title": "Q", "answers": [], "isOpenQuestion": false}),
            Reply::Id(-1),
        ),
        (
            "approve-suggestion",
            json!({"suggestionId": 1, "debateId": missing}),
            Reply::Flag(false),
        ),
        (
            "reject-suggestion",
            json!({"suggestionId": 1, "debateId": missing}),
            Reply::Flag(false),
        ),
        (
            "ban-user",
            json!({"uuid": Uuid::new_v4().to_string(), "debateId": missing}),
            Reply::Flag(false),
        ),
    ];

    for (event, data, expected) in cases {
        assert_eq!(h.send(&alice, event, data).await, expected, "event {}", event);
    }
}

#[tokio::test]
async fn invalid_payloads_touch_nothing() {
    let h = Harness::new();
    let alice = h.connect("alice");

    let too_long = "x".repeat(ModerationConfig::default().max_title_length + 1);
    assert_eq!(
        h.send(&alice, "create-debate", json!({"title": too_long, "description": "D"}))
            .await,
        Reply::Id(-1)
    );
    assert_eq!(
        h.send(&alice, "create-debate", json!({"title": 5, "description": "D"}))
            .await,
        Reply::Id(-1)
    );

    assert!(h.router.store().with(|r| r.debates.is_empty()));
    assert!(h.discussions.is_empty());
}

#[tokio::test]
async fn reconnect_keeps_tracked_debates() {
    let h = Harness::new();
    let first = h.connect("alice");
    let id = h.create_debate(&first, "T").await;
    h.router.detach(&first);

    let second = h.connect("alice");
    assert_ne!(first.connection_id, second.connection_id);

    let Reply::Debates(debates) = h.send(&second, "list-debates", Value::Null).await else {
        panic!("expected debates");
    };
    assert_eq!(debates.len(), 1);
    assert_eq!(debates[0].debate_id, DebateId::new(id));
    assert!(!debates[0].closed);
}

#[tokio::test]
async fn late_disconnect_does_not_clear_new_connection() {
    let h = Harness::new();
    let first = h.connect("alice");
    let second = h.connect("alice");

    h.router.detach(&first);

    let current = h
        .router
        .store()
        .with(|r| r.sessions.get(second.username()).and_then(|s| s.connection()));
    assert_eq!(current, Some(second.connection_id));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_create_and_close_keep_registries_in_lockstep() {
    let h = Arc::new(Harness::new());
    let alice = Arc::new(h.connect("alice"));

    let mut tasks = Vec::new();
    for n in 0..32 {
        let h = h.clone();
        let alice = alice.clone();
        tasks.push(tokio::spawn(async move {
            let id = h.create_debate(&alice, &format!("debate {}", n)).await;
            if n % 2 == 0 {
                assert_eq!(h.send(&alice, "close-debate", json!(id)).await, Reply::Flag(true));
            }
            id
        }));
    }

    let mut ids = Vec::new();
    for task in tasks {
        ids.push(task.await.unwrap());
    }

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 32, "debate ids must be unique");

    h.router.store().with(|r| {
        let tracked = r.sessions.tracked(alice.username());
        assert_eq!(tracked.len(), 16);
        assert_eq!(r.debates.len(), 16);
        for id in tracked {
            assert!(r.debates.contains(id));
        }
    });
}

// =============================================================================
// Ordering
// =============================================================================

#[tokio::test]
async fn registry_effects_follow_arrival_order() {
    let h = Harness::new();
    let alice = h.connect("alice");
    let id = h.create_debate(&alice, "T").await;

    // Close arrives first; its persistence has not been awaited yet.
    let close = h.begin(&alice, "close-debate", json!(id));
    let listed = h.begin(&alice, "list-questions", json!(id)).resolve().await;

    assert_eq!(listed.reply, Reply::Id(-1));
    assert_eq!(close.resolve().await.reply, Reply::Flag(true));
}

#[tokio::test]
async fn later_reads_do_not_wait_on_pending_persistence() {
    let h = Harness::with_repository(
        InMemoryDiscussionRepository::new().with_save_delay(Duration::from_secs(3)),
    );
    let alice = h.connect("alice");

    let create = h.begin(&alice, "create-debate", json!({"title": "T", "description": "D"}));
    assert!(matches!(create, Dispatch::Pending(_)));

    let Dispatch::Ready(listed) = h.begin(&alice, "list-questions", json!(1)) else {
        panic!("list-questions never waits on storage");
    };
    assert_eq!(listed.reply, Reply::Questions(vec![]));
}

#[tokio::test(start_paused = true)]
async fn close_racing_the_initial_save_still_reaches_storage() {
    let h = Arc::new(Harness::with_repository(
        InMemoryDiscussionRepository::new().with_save_delay(Duration::from_millis(200)),
    ));
    let alice = Arc::new(h.connect("alice"));

    let creating = {
        let h = h.clone();
        let alice = alice.clone();
        tokio::spawn(async move { h.create_debate(&alice, "T").await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    h.send(&alice, "close-debate", json!(1)).await;
    assert_eq!(creating.await.unwrap(), 1);

    let record = h.discussions.get(DebateId::new(1)).unwrap();
    assert!(record.closed_at.is_some());

    let Reply::Debates(debates) = h.send(&alice, "list-debates", Value::Null).await else {
        panic!("expected debates");
    };
    assert_eq!(debates.len(), 1);
    assert!(debates[0].closed);
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn open_questions_never_keep_answers(
        answers in proptest::collection::vec(".{0,8}", 0..20),
    ) {
        let command = Command::decode(
            CommandKind::NewQuestion,
            json!({"debateId": 1, "title": "Q", "answers": answers, "isOpenQuestion": true}),
            &ModerationConfig::default(),
        )
        .unwrap();

        let store = ModerationStore::default();
        let moderator = AuthenticatedModerator::new(Username::new("alice").unwrap(), ModeratorId::new(1));
        let Command::NewQuestion(question) = command else {
            panic!("expected new-question");
        };

        let formatted = store.with(|r| {
            let record = r.open_debate(&moderator, "T".into(), "D".into(), Arc::new(RoomManager::default()));
            let debate = r.debates.lookup_mut(record.id).unwrap();
            debate.new_question(question.title, question.answers, question.is_open);
            debate.formatted_questions()
        });

        prop_assert_eq!(formatted.len(), 1);
        prop_assert!(formatted[0].answers.is_empty());
        prop_assert!(formatted[0].is_open_question);
    }

    #[test]
    fn debate_ids_are_never_reused(ops in proptest::collection::vec(any::<bool>(), 1..60)) {
        let store = ModerationStore::default();
        let moderator = AuthenticatedModerator::new(Username::new("alice").unwrap(), ModeratorId::new(1));
        let mut seen = std::collections::HashSet::new();
        let mut open: Vec<DebateId> = Vec::new();

        for create in ops {
            if create || open.is_empty() {
                let record = store.with(|r| {
                    r.open_debate(&moderator, "T".into(), "D".into(), Arc::new(RoomManager::default()))
                });
                prop_assert!(seen.insert(record.id));
                open.push(record.id);
            } else if let Some(id) = open.pop() {
                prop_assert!(store.with(|r| r.close_debate(id, Timestamp::now())).is_some());
            }
        }
    }
}

//! Debate registry - the live, open debates of this process.
//!
//! Lookup misses are ordinary: the debate was closed or never existed.

use std::collections::HashMap;

use crate::domain::debate::Debate;
use crate::domain::foundation::DebateId;

/// Debate id → live debate, plus the id sequence.
#[derive(Debug)]
pub struct DebateRegistry {
    debates: HashMap<DebateId, Debate>,
    next_id: i64,
}

impl DebateRegistry {
    /// Create an empty registry whose first allocated id is `first_id`.
    pub fn new(first_id: DebateId) -> Self {
        Self {
            debates: HashMap::new(),
            next_id: first_id.value().max(1),
        }
    }

    /// Reserve the next id. Ids are never handed out twice.
    pub fn allocate_id(&mut self) -> DebateId {
        let id = DebateId::new(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn lookup(&self, id: DebateId) -> Option<&Debate> {
        self.debates.get(&id)
    }

    pub fn lookup_mut(&mut self, id: DebateId) -> Option<&mut Debate> {
        self.debates.get_mut(&id)
    }

    /// Insert a debate under its own id.
    pub fn register(&mut self, debate: Debate) -> &Debate {
        let id = debate.id();
        self.debates.entry(id).or_insert(debate)
    }

    pub fn unregister(&mut self, id: DebateId) -> Option<Debate> {
        self.debates.remove(&id)
    }

    pub fn contains(&self, id: DebateId) -> bool {
        self.debates.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.debates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debates.is_empty()
    }
}

impl Default for DebateRegistry {
    fn default() -> Self {
        Self::new(DebateId::new(1))
    }
}

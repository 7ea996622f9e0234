use crate::archetype::ArchetypeId;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_REGISTRY_TAG: AtomicU32 = AtomicU32::new(0);

/// Handle to a row of component data owned by a [`Registry`](crate::registry::Registry).
///
/// Ids are never reused within a registry, and the registry tag keeps
/// handles from one registry from resolving in another.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Entity {
    id: u64,
    registry: u32,
}

impl Entity {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn registry(&self) -> u32 {
        self.registry
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.id, self.registry)
    }
}

pub(crate) struct EntityAllocator {
    registry: u32,
    next_id: u64,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self {
            registry: NEXT_REGISTRY_TAG.fetch_add(1, Ordering::Relaxed),
            next_id: 0,
        }
    }

    pub fn allocate(&mut self) -> Entity {
        let entity = Entity {
            id: self.next_id,
            registry: self.registry,
        };
        self.next_id += 1;
        entity
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EntityLocation {
    pub archetype_id: ArchetypeId,
    pub row: usize,
}

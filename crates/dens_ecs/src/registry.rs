use crate::archetype::ArchetypeId;
use crate::archetypes::{ArchetypeMap, DEFAULT_INITIAL_CAPACITY};
use crate::bundle::Bundle;
use crate::commands::CommandBuffer;
use crate::component::{Component, ComponentId, Signature};
use crate::entity::{Entity, EntityAllocator, EntityLocation};
use crate::error::{EcsError, Result};
use crate::query::{Query, QueryData};
use log::{trace, warn};
use std::any::type_name;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryConfig {
    /// Rows pre-allocated in every newly created archetype.
    pub initial_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
        }
    }
}

/// Owns all entities and their components, and performs every structural
/// change (spawn, attach, detach, destroy).
pub struct Registry {
    entities: EntityAllocator,
    archetypes: ArchetypeMap,
    locations: HashMap<Entity, EntityLocation>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            entities: EntityAllocator::new(),
            archetypes: ArchetypeMap::with_capacity(config.initial_capacity),
            locations: HashMap::new(),
        }
    }

    pub fn register_component_type<T: Component>(&mut self) -> ComponentId {
        self.archetypes.register::<T>()
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.archetypes.factory().is_registered::<T>()
    }

    pub fn archetypes(&self) -> &ArchetypeMap {
        &self.archetypes
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn is_alive(&self, entity: Entity) -> bool {
        self.locations.contains_key(&entity)
    }

    pub fn location(&self, entity: Entity) -> Option<EntityLocation> {
        self.locations.get(&entity).copied()
    }

    fn locate(&self, entity: Entity) -> Result<EntityLocation> {
        self.location(entity).ok_or(EcsError::UnknownEntity(entity))
    }

    /// Spawns an entity without components.
    pub fn spawn(&mut self) -> Entity {
        let entity = self.entities.allocate();
        let archetype = self.archetypes.archetype_mut(ArchetypeId::EMPTY);
        archetype.push_entity(entity);
        let row = archetype.size() - 1;

        trace!("Spawned {entity} in {:?} row {row}", ArchetypeId::EMPTY);
        self.locations.insert(
            entity,
            EntityLocation {
                archetype_id: ArchetypeId::EMPTY,
                row,
            },
        );
        entity
    }

    /// Spawns an entity directly into the archetype of `bundle`.
    pub fn spawn_with<B: Bundle>(&mut self, bundle: B) -> Result<Entity> {
        let signatures = B::signatures();
        let signature_set = self.archetypes.factory().combine(&signatures)?;
        assert_eq!(
            signature_set.len(),
            signatures.len(),
            "bundle {} contains duplicate component types",
            type_name::<B>()
        );
        let archetype_id = self.archetypes.get_or_make(&signature_set)?;

        let entity = self.entities.allocate();
        let archetype = self.archetypes.archetype_mut(archetype_id);
        archetype.push_entity(entity);
        bundle.push_into(archetype);
        archetype.debug_assert_index_locked();
        let row = archetype.size() - 1;

        trace!("Spawned {entity} in {archetype_id:?} row {row}");
        self.locations
            .insert(entity, EntityLocation { archetype_id, row });
        Ok(entity)
    }

    /// Adds `value` to `entity`, overwriting it in place if `T` is already attached.
    pub fn attach<T: Component>(&mut self, entity: Entity, value: T) -> Result<()> {
        let location = self.locate(entity)?;
        let component = self
            .archetypes
            .factory()
            .require_id(Signature::of::<T>())?;

        let source = self.archetypes.archetype_mut(location.archetype_id);
        if let Some(slot) = source.get_mut::<T>(location.row) {
            *slot = value;
            return Ok(());
        }

        let target = self
            .archetypes
            .add_destination(location.archetype_id, component)?;
        self.migrate(location, target);

        let archetype = self.archetypes.archetype_mut(target);
        archetype.push_component(value);
        archetype.debug_assert_index_locked();
        Ok(())
    }

    /// Removes `T` from `entity`. Does nothing if the entity lacks `T`.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Result<()> {
        let location = self.locate(entity)?;
        let component = self
            .archetypes
            .factory()
            .require_id(Signature::of::<T>())?;

        if !self
            .archetypes
            .archetype(location.archetype_id)
            .signature_set()
            .contains(component)
        {
            return Ok(());
        }

        let target = self
            .archetypes
            .remove_destination(location.archetype_id, component)?;
        self.migrate(location, target);
        Ok(())
    }

    /// Moves the row at `location` into `target_id` and fixes up the
    /// locations of both the migrated entity and the one swapped into its
    /// old row.
    fn migrate(&mut self, location: EntityLocation, target_id: ArchetypeId) {
        let (source, target) = self
            .archetypes
            .get_pair_mut(location.archetype_id, target_id);
        let entity = source.migrate_row_to(target, location.row);
        let row = target.size() - 1;
        let moved = source.entity_at(location.row);

        trace!(
            "Migrated {entity} from {:?} row {} to {target_id:?} row {row}",
            location.archetype_id,
            location.row
        );
        self.locations.insert(
            entity,
            EntityLocation {
                archetype_id: target_id,
                row,
            },
        );
        if let Some(moved) = moved {
            self.locations.insert(moved, location);
        }
    }

    pub fn destroy(&mut self, entity: Entity) -> Result<()> {
        let location = self
            .locations
            .remove(&entity)
            .ok_or(EcsError::UnknownEntity(entity))?;

        let archetype = self.archetypes.archetype_mut(location.archetype_id);
        let removed = archetype.swap_remove_row(location.row);
        assert_eq!(
            removed, entity,
            "location index of {entity} pointed at {removed} in {:?}",
            location.archetype_id
        );
        if let Some(moved) = archetype.entity_at(location.row) {
            self.locations.insert(moved, location);
        }

        trace!("Destroyed {entity}");
        Ok(())
    }

    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let location = self.locations.get(&entity)?;
        self.archetypes
            .get(location.archetype_id)?
            .get::<T>(location.row)
    }

    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let location = self.locations.get(&entity)?;
        self.archetypes
            .get_mut(location.archetype_id)?
            .get_mut::<T>(location.row)
    }

    /// Whether `entity` is alive and has `T` attached.
    pub fn contains<T: Component>(&self, entity: Entity) -> bool {
        self.locations.get(&entity).is_some_and(|location| {
            self.archetypes.archetype(location.archetype_id).has::<T>()
        })
    }

    /// Iterates every entity holding the components of `Q`.
    ///
    /// The query borrows the registry, so structural changes must wait until
    /// it is dropped. Record them in a [`CommandBuffer`] and [`apply`](Self::apply) it.
    pub fn query<Q: QueryData>(&self) -> Query<'_, Q> {
        Query::new(&self.archetypes)
    }

    pub fn query_mut<T: Component>(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.archetypes
            .iter_mut()
            .filter_map(|archetype| archetype.iter_mut::<T>())
            .flatten()
    }

    /// Applies and drains `commands` in order. Failing commands are skipped
    /// and their errors returned.
    pub fn apply(&mut self, commands: &mut CommandBuffer) -> Vec<EcsError> {
        let mut errors = Vec::new();
        for command in commands.drain() {
            if let Err(err) = command.apply(self) {
                warn!("Deferred command failed: {err}");
                errors.push(err);
            }
        }
        errors
    }
}

use crate::column::{Column, TypedColumn};
use crate::component::{ColumnFactory, Component, ComponentId, Signature};
use crate::entity::Entity;
use crate::error::{EcsError, Result};
use crate::signature::SignatureSet;
use std::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchetypeId(pub(crate) usize);

impl ArchetypeId {
    /// The archetype of entities without components.
    pub const EMPTY: ArchetypeId = ArchetypeId(0);

    pub fn index(&self) -> usize {
        self.0
    }
}

/// Storage bucket for every entity sharing one exact set of component types.
///
/// Row `k` of every column and `entities[k]` describe the same entity. All
/// mutating operations keep the columns and the entity list the same length,
/// except for the two-step protocols documented on [`Archetype::push_entity`]
/// and [`Archetype::migrate_row_to`].
pub struct Archetype {
    id: ArchetypeId,
    signature_set: SignatureSet,
    component_ids: Vec<ComponentId>,
    signatures: Vec<Signature>,
    columns: Vec<Box<dyn Column>>,
    entities: Vec<Entity>,
}

impl Archetype {
    /// Allocates one empty column per member of `signature_set`.
    pub fn make(
        id: ArchetypeId,
        factory: &ColumnFactory,
        signature_set: SignatureSet,
        capacity: usize,
    ) -> Result<Self> {
        let component_ids: Vec<ComponentId> = signature_set.ids().collect();
        let mut signatures = Vec::with_capacity(component_ids.len());
        let mut columns = Vec::with_capacity(component_ids.len());
        for &component_id in &component_ids {
            let signature = factory
                .signature_of(component_id)
                .ok_or(EcsError::UnregisteredType("<unregistered component id>"))?;
            columns.push(factory.make_column(signature, capacity)?);
            signatures.push(signature);
        }

        Ok(Self {
            id,
            signature_set,
            component_ids,
            signatures,
            columns,
            entities: Vec::with_capacity(capacity),
        })
    }

    pub(crate) fn empty(id: ArchetypeId, capacity: usize) -> Self {
        Self {
            id,
            signature_set: SignatureSet::empty(),
            component_ids: Vec::new(),
            signatures: Vec::new(),
            columns: Vec::new(),
            entities: Vec::with_capacity(capacity),
        }
    }

    pub fn id(&self) -> ArchetypeId {
        self.id
    }

    pub fn signature_set(&self) -> &SignatureSet {
        &self.signature_set
    }

    pub fn component_ids(&self) -> &[ComponentId] {
        &self.component_ids
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn size(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity_at(&self, row: usize) -> Option<Entity> {
        self.entities.get(row).copied()
    }

    fn column_index(&self, signature: Signature) -> Option<usize> {
        self.signatures.iter().position(|s| *s == signature)
    }

    pub fn find_column(&self, signature: Signature) -> Option<&dyn Column> {
        let index = self.column_index(signature)?;
        Some(self.columns[index].as_ref())
    }

    pub fn find<T: Component>(&self) -> Option<&TypedColumn<T>> {
        self.find_column(Signature::of::<T>())?.downcast_ref()
    }

    pub fn find_mut<T: Component>(&mut self) -> Option<&mut TypedColumn<T>> {
        let index = self.column_index(Signature::of::<T>())?;
        self.columns[index].downcast_mut()
    }

    pub fn has<T: Component>(&self) -> bool {
        self.column_index(Signature::of::<T>()).is_some()
    }

    pub fn get<T: Component>(&self, row: usize) -> Option<&T> {
        self.find::<T>()?.get(row)
    }

    pub fn get_mut<T: Component>(&mut self, row: usize) -> Option<&mut T> {
        self.find_mut::<T>()?.get_mut(row)
    }

    /// Iterates `(entity, &mut T)` over every row, or `None` without a `T` column.
    pub fn iter_mut<T: Component>(
        &mut self,
    ) -> Option<impl Iterator<Item = (Entity, &mut T)> + '_> {
        let index = self.column_index(Signature::of::<T>())?;
        let entities = &self.entities;
        let column = self.columns[index].downcast_mut::<T>()?;
        Some(entities.iter().copied().zip(column.as_mut_slice().iter_mut()))
    }

    /// Appends `entity` to the entity column.
    ///
    /// The caller must follow up with exactly one
    /// [`push_component`](Self::push_component) per column before any other
    /// mutation.
    pub fn push_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    pub fn push_component<T: Component>(&mut self, value: T) {
        let Some(index) = self.column_index(Signature::of::<T>()) else {
            panic!(
                "archetype {:?} {:?} has no {} column",
                self.id,
                self.signature_set,
                Signature::of::<T>()
            );
        };
        self.columns[index]
            .downcast_mut::<T>()
            .unwrap_or_else(|| panic!("column {index} does not hold {}", Signature::of::<T>()))
            .push(value);
    }

    /// Removes row `index` from every column and returns the entity that
    /// owned it. The former last row now lives at `index`.
    pub fn swap_remove_row(&mut self, index: usize) -> Entity {
        assert!(
            index < self.entities.len(),
            "swap_remove_row index {index} out of bounds for archetype {:?} of size {}",
            self.id,
            self.entities.len()
        );
        for column in &mut self.columns {
            column.swap_remove_drop(index);
        }
        let removed = self.entities.swap_remove(index);
        self.debug_assert_index_locked();
        removed
    }

    /// Moves row `index` into `target` and returns the migrated entity.
    ///
    /// Row `index` is first swapped to the tail, so afterwards the former
    /// last row of `self` lives at `index`. Columns missing from `target` are
    /// dropped. Columns only `target` has are left one short: the caller
    /// pushes their values straight after this returns.
    pub fn migrate_row_to(&mut self, target: &mut Archetype, index: usize) -> Entity {
        let size = self.entities.len();
        assert!(
            index < size,
            "migrate_row_to index {index} out of bounds for archetype {:?} of size {size}",
            self.id
        );

        let last = size - 1;
        if index != last {
            for column in &mut self.columns {
                column.swap(index, last);
            }
            self.entities.swap(index, last);
        }

        for (signature, column) in self.signatures.iter().zip(self.columns.iter_mut()) {
            match target.column_index(*signature) {
                Some(target_index) => column.move_push_to(target.columns[target_index].as_mut()),
                None => column.pop(),
            }
        }

        let entity = self.entities.pop().unwrap_or_else(|| {
            panic!("archetype {:?} lost its entity column during migration", self.id)
        });
        target.entities.push(entity);
        self.debug_assert_index_locked();
        entity
    }

    /// Linear scan over the entity column.
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    pub fn assert_index_locked(&self) {
        for (signature, column) in self.signatures.iter().zip(&self.columns) {
            assert_eq!(
                column.len(),
                self.entities.len(),
                "index-lock violated in archetype {:?} {:?}: column {signature} has {} rows, entity column has {}",
                self.id,
                self.signature_set,
                column.len(),
                self.entities.len()
            );
        }
    }

    pub(crate) fn debug_assert_index_locked(&self) {
        if cfg!(debug_assertions) {
            self.assert_index_locked();
        }
    }
}

impl fmt::Debug for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Archetype")
            .field("id", &self.id)
            .field("signature_set", &self.signature_set)
            .field("columns", &self.signatures.iter().map(Signature::name).collect::<Vec<_>>())
            .field("size", &self.entities.len())
            .finish()
    }
}

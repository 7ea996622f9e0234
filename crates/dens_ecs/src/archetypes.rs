use crate::archetype::{Archetype, ArchetypeId};
use crate::archetype_graph::ArchetypeGraph;
use crate::bundle::Bundle;
use crate::component::{ColumnFactory, Component, ComponentId};
use crate::error::Result;
use crate::signature::SignatureSet;
use log::debug;
use std::collections::HashMap;

pub const DEFAULT_INITIAL_CAPACITY: usize = 64;

/// Owns every archetype of a registry, one per distinct signature-set.
///
/// The archetype with the empty signature-set always exists as
/// [`ArchetypeId::EMPTY`].
pub struct ArchetypeMap {
    factory: ColumnFactory,
    graph: ArchetypeGraph,
    by_signature: HashMap<SignatureSet, ArchetypeId>,
    storage: Vec<Archetype>,
    capacity: usize,
}

impl Default for ArchetypeMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchetypeMap {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_INITIAL_CAPACITY)
    }

    /// `capacity` is the number of rows pre-allocated in each new archetype.
    pub fn with_capacity(capacity: usize) -> Self {
        let empty = Archetype::empty(ArchetypeId::EMPTY, capacity);
        Self {
            factory: ColumnFactory::new(),
            graph: ArchetypeGraph::default(),
            by_signature: HashMap::from([(SignatureSet::empty(), ArchetypeId::EMPTY)]),
            storage: vec![empty],
            capacity,
        }
    }

    pub fn factory(&self) -> &ColumnFactory {
        &self.factory
    }

    pub fn register<T: Component>(&mut self) -> ComponentId {
        self.factory.register::<T>()
    }

    pub fn register_types<B: Bundle>(&mut self) {
        B::register(&mut self.factory);
    }

    pub fn get_or_make(&mut self, signature_set: &SignatureSet) -> Result<ArchetypeId> {
        if let Some(&id) = self.by_signature.get(signature_set) {
            return Ok(id);
        }

        let id = ArchetypeId(self.storage.len());
        let archetype = Archetype::make(id, &self.factory, signature_set.clone(), self.capacity)?;
        debug!("Creating archetype {id:?} for {signature_set:?}");
        self.by_signature.insert(signature_set.clone(), id);
        self.storage.push(archetype);
        Ok(id)
    }

    pub fn find_id(&self, signature_set: &SignatureSet) -> Option<ArchetypeId> {
        self.by_signature.get(signature_set).copied()
    }

    pub fn find_by_signature(&self, signature_set: &SignatureSet) -> Option<&Archetype> {
        self.find_id(signature_set).and_then(|id| self.get(id))
    }

    pub fn get(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.storage.get(id.0)
    }

    pub fn get_mut(&mut self, id: ArchetypeId) -> Option<&mut Archetype> {
        self.storage.get_mut(id.0)
    }

    pub(crate) fn archetype(&self, id: ArchetypeId) -> &Archetype {
        &self.storage[id.0]
    }

    pub(crate) fn archetype_mut(&mut self, id: ArchetypeId) -> &mut Archetype {
        &mut self.storage[id.0]
    }

    /// Borrows two distinct archetypes mutably, in argument order.
    pub fn get_pair_mut(&mut self, a: ArchetypeId, b: ArchetypeId) -> (&mut Archetype, &mut Archetype) {
        assert_ne!(a, b, "get_pair_mut needs two distinct archetypes");
        let (low, high) = self.storage.split_at_mut(a.0.max(b.0));
        if a.0 < b.0 {
            (&mut low[a.0], &mut high[0])
        } else {
            (&mut high[0], &mut low[b.0])
        }
    }

    /// Archetype reached from `start` by adding `component`.
    pub fn add_destination(&mut self, start: ArchetypeId, component: ComponentId) -> Result<ArchetypeId> {
        if let Some(id) = self.graph.get_add_edge(start, component) {
            return Ok(id);
        }

        let signature_set = self.archetype(start).signature_set().with(component);
        let id = self.get_or_make(&signature_set)?;
        if id != start {
            self.graph.insert_edge(start, component, id);
        }
        Ok(id)
    }

    /// Archetype reached from `start` by removing `component`.
    pub fn remove_destination(
        &mut self,
        start: ArchetypeId,
        component: ComponentId,
    ) -> Result<ArchetypeId> {
        if let Some(id) = self.graph.get_remove_edge(start, component) {
            return Ok(id);
        }

        let signature_set = self.archetype(start).signature_set().without(component);
        let id = self.get_or_make(&signature_set)?;
        if id != start {
            self.graph.insert_edge(id, component, start);
        }
        Ok(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Archetype> {
        self.storage.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Archetype> {
        self.storage.iter_mut()
    }

    /// Number of archetypes, the empty one included.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    pub fn entity_count(&self) -> usize {
        self.storage.iter().map(Archetype::size).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Signature;

    struct Position;
    impl Component for Position {}

    struct Velocity;
    impl Component for Velocity {}

    #[test]
    fn empty_archetype_exists_up_front() {
        let map = ArchetypeMap::new();
        assert_eq!(map.len(), 1);
        let empty = map.find_by_signature(&SignatureSet::empty()).unwrap();
        assert_eq!(empty.id(), ArchetypeId::EMPTY);
        assert!(empty.signature_set().is_empty());
    }

    #[test]
    fn get_or_make_never_duplicates() {
        let mut map = ArchetypeMap::new();
        map.register_types::<(Position, Velocity)>();

        let forward = map
            .factory()
            .combine(&[Signature::of::<Position>(), Signature::of::<Velocity>()])
            .unwrap();
        let backward = map
            .factory()
            .combine(&[Signature::of::<Velocity>(), Signature::of::<Position>()])
            .unwrap();

        let first = map.get_or_make(&forward).unwrap();
        let second = map.get_or_make(&backward).unwrap();
        assert_eq!(first, second);
        assert_eq!(map.len(), 2);
        assert!(std::ptr::eq(
            map.find_by_signature(&forward).unwrap(),
            map.get(first).unwrap()
        ));
    }

    #[test]
    fn unknown_component_ids_are_rejected() {
        let mut map = ArchetypeMap::new();
        assert!(map.get_or_make(&SignatureSet::from_ids([4])).is_err());
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn destinations_are_memoised() {
        let mut map = ArchetypeMap::new();
        let position = map.register::<Position>();
        let velocity = map.register::<Velocity>();

        let with_position = map.add_destination(ArchetypeId::EMPTY, position).unwrap();
        let with_both = map.add_destination(with_position, velocity).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.add_destination(ArchetypeId::EMPTY, position).unwrap(), with_position);
        assert_eq!(map.remove_destination(with_both, velocity).unwrap(), with_position);
        assert_eq!(map.remove_destination(with_position, position).unwrap(), ArchetypeId::EMPTY);

        let only_velocity = map.remove_destination(with_both, position).unwrap();
        assert_eq!(map.len(), 4);
        assert!(map.archetype(only_velocity).signature_set().contains(velocity));
    }

    #[test]
    fn pair_mut_follows_argument_order() {
        let mut map = ArchetypeMap::new();
        let position = map.register::<Position>();
        let id = map.add_destination(ArchetypeId::EMPTY, position).unwrap();

        let (a, b) = map.get_pair_mut(id, ArchetypeId::EMPTY);
        assert_eq!(a.id(), id);
        assert_eq!(b.id(), ArchetypeId::EMPTY);

        let (a, b) = map.get_pair_mut(ArchetypeId::EMPTY, id);
        assert_eq!(a.id(), ArchetypeId::EMPTY);
        assert_eq!(b.id(), id);
    }
}

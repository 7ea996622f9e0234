use crate::archetype::ArchetypeId;
use crate::component::ComponentId;
use std::collections::HashMap;

/// Memoised add/remove-one-component transitions between archetypes.
#[derive(Default)]
pub(crate) struct ArchetypeGraph {
    add_component_edges: HashMap<(ArchetypeId, ComponentId), ArchetypeId>,
    remove_component_edges: HashMap<(ArchetypeId, ComponentId), ArchetypeId>,
}

impl ArchetypeGraph {
    pub fn get_add_edge(&self, start: ArchetypeId, component: ComponentId) -> Option<ArchetypeId> {
        self.add_component_edges.get(&(start, component)).copied()
    }

    pub fn get_remove_edge(
        &self,
        start: ArchetypeId,
        component: ComponentId,
    ) -> Option<ArchetypeId> {
        self.remove_component_edges.get(&(start, component)).copied()
    }

    /// Records that `smaller + component == bigger`, in both directions.
    pub fn insert_edge(
        &mut self,
        smaller: ArchetypeId,
        component: ComponentId,
        bigger: ArchetypeId,
    ) {
        self.add_component_edges.insert((smaller, component), bigger);
        self.remove_component_edges.insert((bigger, component), smaller);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_are_recorded_both_ways() {
        let mut graph = ArchetypeGraph::default();
        assert_eq!(graph.get_add_edge(ArchetypeId(0), 3), None);

        graph.insert_edge(ArchetypeId(0), 3, ArchetypeId(1));
        assert_eq!(graph.get_add_edge(ArchetypeId(0), 3), Some(ArchetypeId(1)));
        assert_eq!(graph.get_remove_edge(ArchetypeId(1), 3), Some(ArchetypeId(0)));
        assert_eq!(graph.get_remove_edge(ArchetypeId(0), 3), None);
    }
}

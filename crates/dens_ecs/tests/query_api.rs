use dens_ecs::commands::CommandBuffer;
use dens_ecs::{Component, Entity, Registry};
use std::collections::HashSet;

#[derive(Debug, PartialEq)]
struct A(u32);
impl Component for A {}

#[derive(Debug, PartialEq)]
struct B(u32);
impl Component for B {}

#[derive(Debug, PartialEq)]
struct C(u32);
impl Component for C {}

struct Never;
impl Component for Never {}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register_component_type::<A>();
    registry.register_component_type::<B>();
    registry.register_component_type::<C>();
    registry
}

#[test]
fn query_visits_every_superset_archetype() {
    let mut registry = registry();
    let mut with_a = HashSet::new();
    for i in 0..10 {
        with_a.insert(registry.spawn_with((A(i),)).unwrap());
        with_a.insert(registry.spawn_with((A(i), B(i))).unwrap());
        with_a.insert(registry.spawn_with((C(i), A(i))).unwrap());
        registry.spawn_with((B(i), C(i))).unwrap();
        registry.spawn();
    }

    let query = registry.query::<&A>();
    assert_eq!(query.archetype_count(), 3);
    assert_eq!(query.len(), 30);

    let found: HashSet<Entity> = query.map(|(e, _)| e).collect();
    assert_eq!(found, with_a);
}

#[test]
fn query_values_match_get() {
    let mut registry = registry();
    for i in 0..5 {
        registry.spawn_with((A(i), B(i * 10))).unwrap();
    }
    registry.spawn_with((A(99),)).unwrap();

    let mut seen = 0;
    for (e, (a, b)) in registry.query::<(&A, &B)>() {
        assert_eq!(registry.get::<A>(e), Some(a));
        assert_eq!(b.0, a.0 * 10);
        seen += 1;
    }
    assert_eq!(seen, 5);
}

#[test]
fn tuple_order_does_not_change_the_match() {
    let mut registry = registry();
    registry.spawn_with((A(1), B(2), C(3))).unwrap();

    let (_, (c, a)) = registry.query::<(&C, &A)>().next().unwrap();
    assert_eq!((c.0, a.0), (3, 1));
    let (_, (b, (c, a))) = registry.query::<(&B, (&C, &A))>().next().unwrap();
    assert_eq!((b.0, c.0, a.0), (2, 3, 1));
}

#[test]
fn queries_over_unregistered_types_are_empty() {
    let mut registry = registry();
    registry.spawn_with((A(1),)).unwrap();
    assert_eq!(registry.query::<&Never>().count(), 0);
    assert_eq!(registry.query::<(&A, &Never)>().count(), 0);
}

#[test]
fn queries_restart_from_current_state() {
    let mut registry = registry();
    let e = registry.spawn_with((A(1),)).unwrap();
    assert_eq!(registry.query::<&A>().count(), 1);

    registry.spawn_with((A(2),)).unwrap();
    registry.destroy(e).unwrap();

    let values: Vec<u32> = registry.query::<&A>().map(|(_, a)| a.0).collect();
    assert_eq!(values, vec![2]);
}

#[test]
fn empty_archetypes_left_behind_are_skipped() {
    let mut registry = registry();
    let e = registry.spawn_with((A(1), B(1))).unwrap();
    registry.detach::<B>(e).unwrap();

    let query = registry.query::<&A>();
    assert_eq!(query.archetype_count(), 1);
    assert_eq!(query.count(), 1);
}

#[test]
fn deferred_attach_during_iteration() {
    let mut registry = registry();
    for i in 0..6 {
        registry.spawn_with((A(i),)).unwrap();
    }

    let mut commands = CommandBuffer::new();
    for (e, a) in registry.query::<&A>() {
        if a.0 % 2 == 0 {
            commands.attach(e, B(a.0));
        }
    }
    assert!(registry.apply(&mut commands).is_empty());

    let mut tagged: Vec<u32> = registry.query::<(&A, &B)>().map(|(_, (a, _))| a.0).collect();
    tagged.sort();
    assert_eq!(tagged, vec![0, 2, 4]);
    assert_eq!(registry.query::<&A>().count(), 6);
}

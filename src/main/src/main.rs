use dens_ecs::commands::CommandBuffer;
use dens_ecs::{Component, Registry};
use log::info;

#[derive(Debug)]
struct Position {
    x: f32,
    y: f32,
}

impl Component for Position {}

#[derive(Debug)]
struct Velocity {
    x: f32,
    y: f32,
}

impl Component for Velocity {}

#[derive(Debug)]
struct Lifetime(u32);

impl Component for Lifetime {}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let mut registry = Registry::new();
    registry.register_component_type::<Position>();
    registry.register_component_type::<Velocity>();
    registry.register_component_type::<Lifetime>();

    let player = registry.spawn();
    registry.attach(player, Position { x: 0.0, y: 0.0 })?;
    registry.attach(player, Velocity { x: 1.0, y: 0.5 })?;

    for i in 0..4 {
        registry.spawn_with((
            Position { x: i as f32, y: 0.0 },
            Velocity { x: 0.0, y: -1.0 },
            Lifetime(i + 1),
        ))?;
    }

    let mut commands = CommandBuffer::new();
    for tick in 0..3 {
        for (_, velocity) in registry.query_mut::<Velocity>() {
            velocity.y *= 0.9;
        }
        let moves: Vec<_> = registry
            .query::<(&Position, &Velocity)>()
            .map(|(entity, (p, v))| (entity, p.x + v.x, p.y + v.y))
            .collect();
        for (entity, x, y) in moves {
            if let Some(position) = registry.get_mut::<Position>(entity) {
                position.x = x;
                position.y = y;
            }
        }

        for (entity, lifetime) in registry.query::<&Lifetime>() {
            if lifetime.0 <= tick + 1 {
                commands.destroy(entity);
            }
        }
        let failed = registry.apply(&mut commands);
        info!(
            "Tick {tick}: {} entities alive, {} deferred commands failed",
            registry.len(),
            failed.len()
        );
    }

    registry.detach::<Velocity>(player)?;
    for (entity, position) in registry.query::<&Position>() {
        println!("{entity}: {position:?}");
    }
    println!(
        "{} archetypes, {} moving entities",
        registry.archetypes().len(),
        registry.query::<&Velocity>().count()
    );

    Ok(())
}

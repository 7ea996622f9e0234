use crate::bundle::Bundle;
use crate::component::Component;
use crate::entity::Entity;
use crate::error::Result;
use crate::registry::Registry;
use std::collections::VecDeque;
use std::marker::PhantomData;

/// A structural change recorded now and applied to a [`Registry`] later,
/// typically once a query over that registry has finished.
pub trait Command {
    fn apply(self: Box<Self>, registry: &mut Registry) -> Result<()>;
}

impl<F> Command for F
where
    F: FnOnce(&mut Registry) -> Result<()>,
{
    fn apply(self: Box<Self>, registry: &mut Registry) -> Result<()> {
        (*self)(registry)
    }
}

pub struct Spawn<B: Bundle> {
    pub bundle: B,
}

impl<B: Bundle> Command for Spawn<B> {
    fn apply(self: Box<Self>, registry: &mut Registry) -> Result<()> {
        registry.spawn_with(self.bundle).map(|_| ())
    }
}

pub struct Attach<T: Component> {
    pub entity: Entity,
    pub value: T,
}

impl<T: Component> Command for Attach<T> {
    fn apply(self: Box<Self>, registry: &mut Registry) -> Result<()> {
        let Attach { entity, value } = *self;
        registry.attach(entity, value)
    }
}

pub struct Detach<T: Component> {
    pub entity: Entity,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Component> Command for Detach<T> {
    fn apply(self: Box<Self>, registry: &mut Registry) -> Result<()> {
        registry.detach::<T>(self.entity)
    }
}

pub struct Destroy {
    pub entity: Entity,
}

impl Command for Destroy {
    fn apply(self: Box<Self>, registry: &mut Registry) -> Result<()> {
        registry.destroy(self.entity)
    }
}

/// FIFO buffer of deferred structural changes.
#[derive(Default)]
pub struct CommandBuffer {
    commands: VecDeque<Box<dyn Command>>,
}

impl CommandBuffer {
    pub fn new() -> Self {
        Self {
            commands: VecDeque::new(),
        }
    }

    pub fn push(&mut self, command: impl Command + 'static) {
        self.commands.push_back(Box::new(command));
    }

    pub fn spawn<B: Bundle>(&mut self, bundle: B) {
        self.push(Spawn { bundle });
    }

    pub fn attach<T: Component>(&mut self, entity: Entity, value: T) {
        self.push(Attach { entity, value });
    }

    pub fn detach<T: Component>(&mut self, entity: Entity) {
        self.push(Detach::<T> {
            entity,
            _marker: PhantomData,
        });
    }

    pub fn destroy(&mut self, entity: Entity) {
        self.push(Destroy { entity });
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Box<dyn Command>> + '_ {
        self.commands.drain(..)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

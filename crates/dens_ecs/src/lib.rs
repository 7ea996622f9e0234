pub mod archetype;
mod archetype_graph;
pub mod archetypes;
pub mod bundle;
pub mod column;
pub mod commands;
pub mod component;
pub mod entity;
pub mod error;
pub mod query;
pub mod registry;
pub mod signature;

pub use component::Component;
pub use entity::Entity;
pub use error::{EcsError, Result};
pub use registry::{Registry, RegistryConfig};

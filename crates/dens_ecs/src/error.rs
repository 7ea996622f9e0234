use crate::entity::Entity;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EcsError>;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcsError {
    #[error("entity {0} is not alive in this registry")]
    UnknownEntity(Entity),
    #[error("component type {0} was never registered")]
    UnregisteredType(&'static str),
    #[error("column type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

use crate::column::{Column, TypedColumn};
use crate::error::{EcsError, Result};
use crate::signature::SignatureSet;
use log::debug;
use std::any::{type_name, TypeId};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

pub trait Component: 'static {}

/// Dense per-factory index of a registered component type.
pub type ComponentId = usize;

/// Process-stable identity of a component type.
#[derive(Copy, Clone, Debug)]
pub struct Signature {
    type_id: TypeId,
    name: &'static str,
}

impl Signature {
    pub fn of<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for Signature {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for Signature {}

impl Hash for Signature {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl PartialOrd for Signature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Signature {
    fn cmp(&self, other: &Self) -> Ordering {
        self.type_id.cmp(&other.type_id)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[derive(Debug, Clone)]
pub struct ComponentInfo {
    pub id: ComponentId,
    pub signature: Signature,
    pub size: usize,
    pub align: usize,
}

type ColumnConstructor = fn(usize) -> Box<dyn Column>;

fn new_column<T: Component>(capacity: usize) -> Box<dyn Column> {
    Box::new(TypedColumn::<T>::with_capacity(capacity))
}

/// Maps registered component types to their ids and column constructors.
#[derive(Default)]
pub struct ColumnFactory {
    type_to_id: HashMap<TypeId, ComponentId>,
    components: Vec<ComponentInfo>,
    constructors: Vec<ColumnConstructor>,
}

impl ColumnFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T` and returns its id. Registering twice returns the same id.
    pub fn register<T: Component>(&mut self) -> ComponentId {
        let signature = Signature::of::<T>();
        if let Some(&id) = self.type_to_id.get(&signature.type_id) {
            return id;
        }

        let id = self.components.len() as ComponentId;
        let info = ComponentInfo {
            id,
            signature,
            size: size_of::<T>(),
            align: align_of::<T>(),
        };

        debug!("Registering component {signature} as id {id}");
        self.type_to_id.insert(signature.type_id, id);
        self.components.push(info);
        self.constructors.push(new_column::<T>);
        id
    }

    pub fn id_of(&self, signature: Signature) -> Option<ComponentId> {
        self.type_to_id.get(&signature.type_id).copied()
    }

    pub fn require_id(&self, signature: Signature) -> Result<ComponentId> {
        self.id_of(signature)
            .ok_or(EcsError::UnregisteredType(signature.name))
    }

    pub fn is_registered<T: Component>(&self) -> bool {
        self.type_to_id.contains_key(&TypeId::of::<T>())
    }

    pub fn info(&self, id: ComponentId) -> Option<&ComponentInfo> {
        self.components.get(id)
    }

    pub fn signature_of(&self, id: ComponentId) -> Option<Signature> {
        self.info(id).map(|info| info.signature)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn make_column(&self, signature: Signature, capacity: usize) -> Result<Box<dyn Column>> {
        let id = self.require_id(signature)?;
        Ok(self.make_column_by_id(id, capacity))
    }

    pub(crate) fn make_column_by_id(&self, id: ComponentId, capacity: usize) -> Box<dyn Column> {
        let constructor = self
            .constructors
            .get(id)
            .unwrap_or_else(|| panic!("component id {id} has no column constructor"));
        constructor(capacity)
    }

    /// Builds the signature-set of `signatures`, ignoring order and duplicates.
    pub fn combine(&self, signatures: &[Signature]) -> Result<SignatureSet> {
        let mut set = SignatureSet::empty();
        for signature in signatures {
            set.insert(self.require_id(*signature)?);
        }
        Ok(set)
    }
}

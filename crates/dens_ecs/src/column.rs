use crate::component::{Component, Signature};
use crate::error::{EcsError, Result};
use std::any::Any;

/// Type-erased view of a [`TypedColumn`], used by archetypes to keep all of
/// their columns in lock-step without knowing the concrete types.
pub trait Column: Any {
    fn signature(&self) -> Signature;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Swap-removes `index` and drops the removed value.
    fn swap_remove_drop(&mut self, index: usize);

    /// Drops the last element.
    fn pop(&mut self);

    fn swap(&mut self, a: usize, b: usize);

    /// Pops the last element and pushes it onto `other`, which must hold the
    /// same component type.
    fn try_move_push_to(&mut self, other: &mut dyn Column) -> Result<()>;

    fn move_push_to(&mut self, other: &mut dyn Column) {
        if let Err(err) = self.try_move_push_to(other) {
            panic!("move_push_to: {err}");
        }
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<'a> dyn Column + 'a {
    pub fn downcast_ref<T: Component>(&self) -> Option<&TypedColumn<T>> {
        self.as_any().downcast_ref()
    }

    pub fn downcast_mut<T: Component>(&mut self) -> Option<&mut TypedColumn<T>> {
        self.as_any_mut().downcast_mut()
    }
}

/// Contiguous storage for one component type.
pub struct TypedColumn<T: Component> {
    data: Vec<T>,
}

impl<T: Component> Default for TypedColumn<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> TypedColumn<T> {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn push(&mut self, value: T) -> usize {
        self.data.push(value);
        self.data.len() - 1
    }

    /// Removes `index` by moving the last element into its slot.
    ///
    /// Panics if `index` is out of bounds.
    pub fn swap_remove(&mut self, index: usize) -> T {
        assert!(
            index < self.data.len(),
            "swap_remove index {index} out of bounds for {} column of length {}",
            Signature::of::<T>(),
            self.data.len()
        );
        self.data.swap_remove(index)
    }

    pub fn take_last(&mut self) -> Option<T> {
        self.data.pop()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.data.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.data.get_mut(index)
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }
}

impl<T: Component> Column for TypedColumn<T> {
    fn signature(&self) -> Signature {
        Signature::of::<T>()
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn swap_remove_drop(&mut self, index: usize) {
        self.swap_remove(index);
    }

    fn pop(&mut self) {
        assert!(
            self.data.pop().is_some(),
            "pop on empty {} column",
            Signature::of::<T>()
        );
    }

    fn swap(&mut self, a: usize, b: usize) {
        self.data.swap(a, b);
    }

    fn try_move_push_to(&mut self, other: &mut dyn Column) -> Result<()> {
        let found = other.signature();
        let mismatch = EcsError::TypeMismatch {
            expected: Signature::of::<T>().name(),
            found: found.name(),
        };
        if found != Signature::of::<T>() {
            return Err(mismatch);
        }
        let target = other.downcast_mut::<T>().ok_or(mismatch)?;

        let value = self
            .data
            .pop()
            .unwrap_or_else(|| panic!("move_push_to from empty {} column", Signature::of::<T>()));
        target.data.push(value);
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

use crate::archetype::Archetype;
use crate::component::{ColumnFactory, Component, Signature};
use variadics_please::all_tuples;

/// A tuple of components spawned together straight into their archetype.
pub trait Bundle: 'static {
    fn signatures() -> Vec<Signature>;

    fn register(factory: &mut ColumnFactory);

    /// Pushes one value per column. The entity must already be pushed.
    fn push_into(self, archetype: &mut Archetype);
}

macro_rules! impl_bundle {
    ($(($C:ident, $c:ident)),*) => {
        impl<$($C: Component),*> Bundle for ($($C,)*) {
            fn signatures() -> Vec<Signature> {
                vec![$(Signature::of::<$C>()),*]
            }

            fn register(_factory: &mut ColumnFactory) {
                $(_factory.register::<$C>();)*
            }

            fn push_into(self, _archetype: &mut Archetype) {
                let ($($c,)*) = self;
                $(_archetype.push_component($c);)*
            }
        }
    }
}

all_tuples!(impl_bundle, 0, 15, C, c);

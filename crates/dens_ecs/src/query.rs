use crate::archetype::Archetype;
use crate::archetypes::ArchetypeMap;
use crate::component::{Component, Signature};
use crate::entity::Entity;
use variadics_please::all_tuples;

/// Component access a [`Query`] can fetch: `&T`, or a tuple of those.
pub trait QueryData {
    type Item<'a>;
    type Fetch<'a>: Copy;

    fn signatures(out: &mut Vec<Signature>);

    fn fetch(archetype: &Archetype) -> Option<Self::Fetch<'_>>;

    fn item<'a>(fetch: Self::Fetch<'a>, row: usize) -> Self::Item<'a>;
}

impl<T: Component> QueryData for &T {
    type Item<'a> = &'a T;
    type Fetch<'a> = &'a [T];

    fn signatures(out: &mut Vec<Signature>) {
        out.push(Signature::of::<T>());
    }

    fn fetch(archetype: &Archetype) -> Option<Self::Fetch<'_>> {
        archetype.find::<T>().map(|column| column.as_slice())
    }

    fn item<'a>(fetch: Self::Fetch<'a>, row: usize) -> Self::Item<'a> {
        &fetch[row]
    }
}

macro_rules! impl_query_data {
    ($(($Q:ident, $q:ident)),*) => {
        impl<$($Q: QueryData),*> QueryData for ($($Q,)*) {
            type Item<'a> = ($($Q::Item<'a>,)*);
            type Fetch<'a> = ($($Q::Fetch<'a>,)*);

            fn signatures(out: &mut Vec<Signature>) {
                $($Q::signatures(out);)*
            }

            fn fetch(archetype: &Archetype) -> Option<Self::Fetch<'_>> {
                Some(($($Q::fetch(archetype)?,)*))
            }

            fn item<'a>(fetch: Self::Fetch<'a>, row: usize) -> Self::Item<'a> {
                let ($($q,)*) = fetch;
                ($($Q::item($q, row),)*)
            }
        }
    }
}

all_tuples!(impl_query_data, 1, 15, Q, q);

/// Lazy iteration over every entity holding the components of `Q`.
///
/// The set of matching archetypes is captured when the query is created.
/// Order is unspecified. A query that names an unregistered type is empty.
pub struct Query<'a, Q: QueryData> {
    archetypes: Vec<&'a Archetype>,
    next_archetype: usize,
    current: Option<(&'a Archetype, Q::Fetch<'a>)>,
    row: usize,
    remaining: usize,
}

impl<'a, Q: QueryData> Query<'a, Q> {
    pub(crate) fn new(map: &'a ArchetypeMap) -> Self {
        let mut signatures = Vec::new();
        Q::signatures(&mut signatures);

        let archetypes: Vec<&'a Archetype> = match map.factory().combine(&signatures) {
            Ok(required) => map
                .iter()
                .filter(|archetype| {
                    !archetype.is_empty() && required.is_subset(archetype.signature_set())
                })
                .collect(),
            Err(_) => Vec::new(),
        };
        let remaining = archetypes.iter().map(|archetype| archetype.size()).sum();

        Self {
            archetypes,
            next_archetype: 0,
            current: None,
            row: 0,
            remaining,
        }
    }

    /// Number of archetypes this query visits.
    pub fn archetype_count(&self) -> usize {
        self.archetypes.len()
    }
}

impl<'a, Q: QueryData> Iterator for Query<'a, Q> {
    type Item = (Entity, Q::Item<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((archetype, fetch)) = self.current {
                if self.row < archetype.size() {
                    let row = self.row;
                    self.row += 1;
                    self.remaining -= 1;
                    return Some((archetype.entities()[row], Q::item(fetch, row)));
                }
                self.current = None;
            }

            let archetype = *self.archetypes.get(self.next_archetype)?;
            self.next_archetype += 1;
            self.row = 0;
            self.current = Q::fetch(archetype).map(|fetch| (archetype, fetch));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<Q: QueryData> ExactSizeIterator for Query<'_, Q> {}

use indexmap::IndexMap;

use crate::api::models::{RawAttachment, RawComment, RawFeed, RawPost, RawUser};

/// Records that carry an opaque string id.
pub trait Identified {
    fn id(&self) -> &str;
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_identified!(RawAttachment, RawComment, RawFeed, RawPost, RawUser);

/// Key a sequence by id, transforming each item.
///
/// `None` (the payload lacked the collection) stays `None`; an empty slice
/// gives an empty map. Insertion order follows the input, and a repeated id
/// keeps its first position with the last value.
pub fn key_by_id_and_map<'a, T, U, F>(
    items: Option<&'a [T]>,
    mut transform: F,
) -> Option<IndexMap<String, U>>
where
    T: Identified,
    F: FnMut(&'a T) -> U,
{
    items.map(|items| {
        items
            .iter()
            .map(|item| (item.id().to_string(), transform(item)))
            .collect()
    })
}

/// Key a sequence by id, keeping the items as they are.
pub fn key_by_id<T>(items: Option<&[T]>) -> Option<IndexMap<String, T>>
where
    T: Identified + Clone,
{
    key_by_id_and_map(items, T::clone)
}

//! List-valued sub-entities: lookup by reference and exclusive default flags.
//!
//! A reference that matches nothing is a `NotFound` error and the list is
//! left as it was. Setting a default clears every sibling in the same list,
//! so at most one entry per scope carries the flag.

use shared_types::{Bank, Card, Documentation, Photo, WallsBadge};

use super::errors::AccountError;

/// A sub-entity addressed by its own reference.
pub trait Referenced {
    /// Human name used in error messages.
    const KIND: &'static str;

    fn reference(&self) -> &str;
}

/// A sub-entity carrying an `is_default` flag.
pub trait DefaultFlag: Referenced {
    fn set_default(&mut self, value: bool);
}

macro_rules! referenced {
    ($ty:ty, $kind:literal, $field:ident) => {
        impl Referenced for $ty {
            const KIND: &'static str = $kind;

            fn reference(&self) -> &str {
                &self.$field
            }
        }
    };
}

macro_rules! default_flag {
    ($ty:ty) => {
        impl DefaultFlag for $ty {
            fn set_default(&mut self, value: bool) {
                self.is_default = value;
            }
        }
    };
}

referenced!(Bank, "bank", bank_reference);
referenced!(Card, "card", card_reference);
referenced!(WallsBadge, "walls badge", walls_badge_reference);
referenced!(Documentation, "documentation", documentation_reference);
referenced!(Photo, "photo", photo_reference);

default_flag!(Bank);
default_flag!(Card);
default_flag!(WallsBadge);

/// Find an entry by reference.
pub fn find_mut<'a, T: Referenced>(
    items: &'a mut [T],
    reference: &str,
) -> Result<&'a mut T, AccountError> {
    items
        .iter_mut()
        .find(|item| item.reference() == reference)
        .ok_or_else(|| AccountError::not_found(T::KIND, reference))
}

/// Replace the entry with the same reference, or append it.
pub fn upsert<T: Referenced>(items: &mut Vec<T>, entry: T) {
    match items
        .iter()
        .position(|item| item.reference() == entry.reference())
    {
        Some(index) => items[index] = entry,
        None => items.push(entry),
    }
}

/// Make `reference` the only default in `items`.
pub fn set_exclusive_default<T: DefaultFlag>(
    items: &mut [T],
    reference: &str,
) -> Result<(), AccountError> {
    if !items.iter().any(|item| item.reference() == reference) {
        return Err(AccountError::not_found(T::KIND, reference));
    }
    for item in items.iter_mut() {
        let selected = item.reference() == reference;
        item.set_default(selected);
    }
    Ok(())
}

/// Clear the flag on every entry except `keep`.
pub fn clear_other_defaults<T: DefaultFlag>(items: &mut [T], keep: &str) {
    for item in items.iter_mut().filter(|item| item.reference() != keep) {
        item.set_default(false);
    }
}

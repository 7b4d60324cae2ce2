//! Token lookup in the structural view

use crate::formats::catalog::{Element, TOKEN, TWO_BYTE, VALUE_ATTR};
use crate::types::{TokenKey, value_matches};

/// Find the `<token>` element for a key.
///
/// A single-byte key only matches direct children of the root, never a
/// token nested in a `<two-byte>` group. A two-byte key searches every group
/// whose value matches the primary byte, in document order.
#[must_use]
pub fn find_token(root: &Element, key: TokenKey) -> Option<&Element> {
    match key.secondary {
        None => root.elements_named(TOKEN).find(|token| has_value(token, key.primary)),
        Some(secondary) => root
            .elements_named(TWO_BYTE)
            .filter(|group| has_value(group, key.primary))
            .find_map(|group| group.elements_named(TOKEN).find(|token| has_value(token, secondary))),
    }
}

/// Mutable variant of [`find_token`]
pub fn find_token_mut(root: &mut Element, key: TokenKey) -> Option<&mut Element> {
    match key.secondary {
        None => root.elements_named_mut(TOKEN).find(|token| has_value(token, key.primary)),
        Some(secondary) => root
            .elements_named_mut(TWO_BYTE)
            .filter(|group| has_value(group, key.primary))
            .find_map(|group| {
                group
                    .elements_named_mut(TOKEN)
                    .find(|token| has_value(token, secondary))
            }),
    }
}

fn has_value(element: &Element, byte: u8) -> bool {
    element.attr(VALUE_ATTR).is_some_and(|value| value_matches(value, byte))
}

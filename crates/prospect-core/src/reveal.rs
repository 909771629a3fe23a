//! Per-row reveal toggles for masked contact fields.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use crate::mask::{mask_email, mask_phone, PhoneMask};

/// A contact field that is masked until revealed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RevealField {
    Email,
    Phone,
}

impl fmt::Display for RevealField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevealField::Email => f.write_str("email"),
            RevealField::Phone => f.write_str("phone"),
        }
    }
}

/// Reveal flags keyed by `(id, field)`. Missing entries read as masked.
///
/// Entries are created on first toggle and never removed; the state lives
/// as long as its owner.
#[derive(Debug, Clone)]
pub struct RevealState<Id> {
    flags: HashMap<(Id, RevealField), bool>,
}

impl<Id> Default for RevealState<Id> {
    fn default() -> Self {
        Self {
            flags: HashMap::new(),
        }
    }
}

impl<Id: Clone + Eq + Hash> RevealState<Id> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the flag for `(id, field)`. Returns the new value.
    pub fn toggle(&mut self, id: Id, field: RevealField) -> bool {
        let flag = self.flags.entry((id, field)).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn is_revealed(&self, id: &Id, field: RevealField) -> bool {
        self.flags
            .get(&(id.clone(), field))
            .copied()
            .unwrap_or(false)
    }

    /// Number of entries ever toggled.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

/// The text to show for `value`: itself when revealed, masked otherwise.
pub fn display(field: RevealField, value: &str, revealed: bool, policy: PhoneMask) -> String {
    if revealed {
        return value.to_string();
    }
    match field {
        RevealField::Email => mask_email(value),
        RevealField::Phone => mask_phone(value, policy),
    }
}

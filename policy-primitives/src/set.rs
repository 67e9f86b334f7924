//! Ordered policy collections built on every load.

use std::collections::HashMap;

use crate::{Error, PolicyDefinition, PolicyValue, Result};

/// Ordered mapping from policy key to [`PolicyDefinition`].
///
/// Keys keep the position of their first insertion; re-inserting a key
/// replaces the stored definition in place.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicySet {
    entries: Vec<PolicyDefinition>,
    index: HashMap<String, usize>,
}

impl PolicySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a definition, returning the one it replaced.
    pub fn insert(&mut self, definition: PolicyDefinition) -> Option<PolicyDefinition> {
        if let Some(&slot) = self.index.get(definition.key()) {
            return Some(std::mem::replace(&mut self.entries[slot], definition));
        }

        self.index
            .insert(definition.key().to_owned(), self.entries.len());
        self.entries.push(definition);
        None
    }

    /// Looks up a definition by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PolicyDefinition> {
        self.index.get(key).map(|&slot| &self.entries[slot])
    }

    /// Returns `true` when the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(PolicyDefinition::key)
    }

    /// Iterates definitions in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, PolicyDefinition> {
        self.entries.iter()
    }

    /// Number of policies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no policies are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct source groups in first-seen order.
    #[must_use]
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = Vec::new();
        for group in self.entries.iter().filter_map(PolicyDefinition::source_group) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Definitions belonging to `group`, in insertion order.
    pub fn in_group<'a>(&'a self, group: &'a str) -> impl Iterator<Item = &'a PolicyDefinition> {
        self.entries
            .iter()
            .filter(move |definition| definition.source_group() == Some(group))
    }

    /// Definitions whose key or description contains `term`, ignoring ASCII
    /// case. A blank term matches everything.
    pub fn search<'a>(
        &'a self,
        term: &str,
    ) -> impl Iterator<Item = &'a PolicyDefinition> + use<'a> {
        let needle = term.trim().to_ascii_lowercase();
        self.entries.iter().filter(move |definition| {
            needle.is_empty()
                || definition.key().to_ascii_lowercase().contains(&needle)
                || definition.description().to_ascii_lowercase().contains(&needle)
        })
    }
}

impl<'a> IntoIterator for &'a PolicySet {
    type Item = &'a PolicyDefinition;
    type IntoIter = std::slice::Iter<'a, PolicyDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct ValueSlot {
    key: String,
    value: PolicyValue,
}

/// Current value of every policy in a [`PolicySet`].
///
/// Seeded from the defaults, then mutated by edits. Keys mirror the set they
/// were seeded from; edits never add or remove keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PolicyValues {
    slots: Vec<ValueSlot>,
    index: HashMap<String, usize>,
    touched: Vec<usize>,
}

impl PolicyValues {
    /// Seeds values from every definition's default.
    #[must_use]
    pub fn seeded_from(set: &PolicySet) -> Self {
        let slots: Vec<ValueSlot> = set
            .iter()
            .map(|definition| ValueSlot {
                key: definition.key().to_owned(),
                value: definition.default_value().clone(),
            })
            .collect();
        let index = slots
            .iter()
            .enumerate()
            .map(|(slot, entry)| (entry.key.clone(), slot))
            .collect();

        Self {
            slots,
            index,
            touched: Vec::new(),
        }
    }

    /// Returns the current value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PolicyValue> {
        self.index.get(key).map(|&slot| &self.slots[slot].value)
    }

    /// Replaces the value for `key` and marks it touched, returning the old value.
    ///
    /// Type consistency is the caller's concern; see [`PolicyDefinition::check`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPolicy`] when the key was not seeded.
    pub fn assign(&mut self, key: &str, value: PolicyValue) -> Result<PolicyValue> {
        let slot = self.slot(key)?;
        if !self.touched.contains(&slot) {
            self.touched.push(slot);
        }
        Ok(std::mem::replace(&mut self.slots[slot].value, value))
    }

    /// Restores `value` for `key` and clears its touched mark.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownPolicy`] when the key was not seeded.
    pub fn restore(&mut self, key: &str, value: PolicyValue) -> Result<()> {
        let slot = self.slot(key)?;
        self.touched.retain(|&touched| touched != slot);
        self.slots[slot].value = value;
        Ok(())
    }

    /// Returns `true` when the key has been assigned since seeding.
    #[must_use]
    pub fn is_touched(&self, key: &str) -> bool {
        self.index
            .get(key)
            .is_some_and(|slot| self.touched.contains(slot))
    }

    /// Iterates `(key, value)` pairs in seed order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PolicyValue)> {
        self.slots
            .iter()
            .map(|slot| (slot.key.as_str(), &slot.value))
    }

    /// Iterates touched `(key, value)` pairs in first-touch order.
    pub fn touched(&self) -> impl Iterator<Item = (&str, &PolicyValue)> {
        self.touched.iter().map(|&slot| {
            let entry = &self.slots[slot];
            (entry.key.as_str(), &entry.value)
        })
    }

    /// Iterates keys in seed order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.key.as_str())
    }

    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when no values are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn slot(&self, key: &str) -> Result<usize> {
        self.index
            .get(key)
            .copied()
            .ok_or_else(|| Error::UnknownPolicy { key: key.into() })
    }
}

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Render slot name to path template, in declaration order.
///
/// Loads are issued and their results reported in this order. Re-inserting a
/// slot replaces its path but keeps its original position.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SlotPaths {
    entries: Vec<(String, String)>,
}

impl SlotPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: impl Into<String>, path: impl Into<String>) {
        let slot = slot.into();
        let path = path.into();
        match self.entries.iter_mut().find(|(s, _)| *s == slot) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((slot, path)),
        }
    }

    pub fn get(&self, slot: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(s, _)| s == slot)
            .map(|(_, p)| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), p.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for SlotPaths {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut slots = SlotPaths::new();
        for (k, v) in iter {
            slots.insert(k, v);
        }
        slots
    }
}

impl Serialize for SlotPaths {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (slot, path) in &self.entries {
            map.serialize_entry(slot, path)?;
        }
        map.end()
    }
}

struct SlotPathsVisitor;

impl<'de> Visitor<'de> for SlotPathsVisitor {
    type Value = SlotPaths;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an object of slot names to path strings")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SlotPaths, A::Error> {
        let mut slots = SlotPaths::new();
        while let Some((slot, path)) = access.next_entry::<String, String>()? {
            slots.insert(slot, path);
        }
        Ok(slots)
    }
}

impl<'de> Deserialize<'de> for SlotPaths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SlotPathsVisitor)
    }
}

//! Class Map
//!
//! An insertion-ordered mapping from class label to a value. Class labels are
//! enumerated in first-seen order, which decides tie-breaking during
//! prediction, so the order has to survive serialization.
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Ordered class label → value mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMap<V>(Vec<(String, V)>);

/// Number of records per class.
pub type ClassCounts = ClassMap<usize>;

/// Probability per class.
pub type ClassProbabilities = ClassMap<f64>;

impl<V> Default for ClassMap<V> {
    fn default() -> Self {
        ClassMap(Vec::new())
    }
}

impl<V> ClassMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, class: &str) -> Option<&V> {
        self.0.iter().find(|(c, _)| c == class).map(|(_, v)| v)
    }

    /// Set the value for `class`, keeping its original position if it is
    /// already present.
    pub fn insert(&mut self, class: &str, value: V) {
        match self.0.iter_mut().find(|(c, _)| c == class) {
            Some((_, v)) => *v = value,
            None => self.0.push((class.to_string(), value)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(c, v)| (c.as_str(), v))
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(c, _)| c.as_str())
    }
}

impl<V: PartialOrd> ClassMap<V> {
    /// The first class holding the strictly greatest value.
    pub fn argmax(&self) -> Option<&str> {
        let mut best: Option<(&str, &V)> = None;
        for (c, v) in self.iter() {
            match best {
                Some((_, bv)) if v <= bv => {}
                _ => best = Some((c, v)),
            }
        }
        best.map(|(c, _)| c)
    }
}

impl ClassCounts {
    pub fn increment(&mut self, class: &str) {
        self.add(class, 1);
    }

    pub fn add(&mut self, class: &str, n: usize) {
        match self.0.iter_mut().find(|(c, _)| c == class) {
            Some((_, v)) => *v += n,
            None => self.0.push((class.to_string(), n)),
        }
    }

    /// Count for `class`, zero when the class was never observed.
    pub fn count(&self, class: &str) -> usize {
        self.get(class).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, v)| v).sum()
    }

    /// Share of each class, `count / max(1, total)`.
    pub fn probabilities(&self) -> ClassProbabilities {
        let total = self.total().max(1) as f64;
        ClassMap(self.0.iter().map(|(c, v)| (c.clone(), *v as f64 / total)).collect())
    }
}

impl<V> FromIterator<(String, V)> for ClassMap<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        let mut map = ClassMap::new();
        for (c, v) in iter {
            map.insert(&c, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for ClassMap<V> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (c, v) in &self.0 {
            map.serialize_entry(c, v)?;
        }
        map.end()
    }
}

struct ClassMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for ClassMapVisitor<V> {
    type Value = ClassMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map keyed by class label")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((class, value)) = access.next_entry::<String, V>()? {
            if entries.iter().any(|(c, _)| *c == class) {
                return Err(de::Error::custom(format!("duplicate class label `{}`", class)));
            }
            entries.push((class, value));
        }
        Ok(ClassMap(entries))
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for ClassMap<V> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(ClassMapVisitor(PhantomData))
    }
}

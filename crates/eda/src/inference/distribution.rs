//! Score distributions over a fixed, ordered set of labels.

use std::hash::Hash;

use indexmap::IndexMap;

use crate::schema::Hypothesis;

/// Mapping from label to a non-negative mass, in insertion order.
///
/// Transforms consume the distribution and return the adjusted one, so a
/// heuristic rule is a plain function from distribution to distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution<K: Eq + Hash> {
    masses: IndexMap<K, f64>,
}

/// Distribution over the semantic type hypotheses.
pub type ScoreDistribution = Distribution<Hypothesis>;

impl<K: Eq + Hash + Clone> Distribution<K> {
    /// Equal mass `1/n` for each label.
    pub fn uniform(labels: impl IntoIterator<Item = K>) -> Self {
        let labels: Vec<K> = labels.into_iter().collect();
        let mass = if labels.is_empty() {
            0.0
        } else {
            1.0 / labels.len() as f64
        };
        Self {
            masses: labels.into_iter().map(|label| (label, mass)).collect(),
        }
    }

    /// Mass of a label; unknown labels have zero mass.
    pub fn get(&self, label: &K) -> f64 {
        self.masses.get(label).copied().unwrap_or(0.0)
    }

    /// Replace the mass of a label.
    pub fn set(mut self, label: K, mass: f64) -> Self {
        self.masses.insert(label, mass.max(0.0));
        self
    }

    /// Multiply the mass of an existing label.
    pub fn scale(mut self, label: &K, factor: f64) -> Self {
        if let Some(mass) = self.masses.get_mut(label) {
            *mass = (*mass * factor).max(0.0);
        }
        self
    }

    /// Sum of all masses.
    pub fn total(&self) -> f64 {
        self.masses.values().sum()
    }

    /// Divide every mass by the total.
    ///
    /// A distribution without positive total mass falls back to uniform over
    /// the same labels.
    pub fn normalize(&self) -> Self {
        let total = self.total();
        if !(total > 0.0 && total.is_finite()) {
            return Self::uniform(self.masses.keys().cloned());
        }
        Self {
            masses: self
                .masses
                .iter()
                .map(|(label, mass)| (label.clone(), mass / total))
                .collect(),
        }
    }

    /// Label with the strictly greatest mass; the first one wins ties.
    pub fn argmax(&self) -> Option<&K> {
        let mut best: Option<(&K, f64)> = None;
        for (label, &mass) in &self.masses {
            match best {
                Some((_, best_mass)) if mass <= best_mass => {}
                _ => best = Some((label, mass)),
            }
        }
        best.map(|(label, _)| label)
    }

    /// Iterate over labels and masses in order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, f64)> {
        self.masses.iter().map(|(label, mass)| (label, *mass))
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.masses.len()
    }

    /// Whether there are no labels.
    pub fn is_empty(&self) -> bool {
        self.masses.is_empty()
    }
}

impl<K: Eq + Hash> FromIterator<(K, f64)> for Distribution<K> {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            masses: iter
                .into_iter()
                .map(|(label, mass)| (label, mass.max(0.0)))
                .collect(),
        }
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The best docking score obtained for one compound, in kcal/mol (lower is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub compound: String,
    pub affinity: f64,
}

impl ScoreRecord {
    pub fn new(compound: impl Into<String>, affinity: f64) -> Self {
        Self {
            compound: compound.into(),
            affinity,
        }
    }
}

/// An ordered relation `{compound, affinity}` with unique compound identifiers.
///
/// Records keep insertion order. Inserting a compound that is already present replaces
/// its affinity in place (last write wins) and hands back the previous value so the
/// caller can report the collision.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultsTable {
    records: Vec<ScoreRecord>,
    index: HashMap<String, usize>,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: ScoreRecord) -> Option<f64> {
        match self.index.get(&record.compound) {
            Some(&pos) => {
                let previous = self.records[pos].affinity;
                self.records[pos].affinity = record.affinity;
                Some(previous)
            }
            None => {
                self.index.insert(record.compound.clone(), self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScoreRecord> {
        self.records.iter()
    }

    pub fn get(&self, compound: &str) -> Option<f64> {
        self.index.get(compound).map(|&pos| self.records[pos].affinity)
    }

    pub fn affinities(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.affinity).collect()
    }

    /// Returns a copy sorted ascending by affinity. The sort is stable, so equal scores
    /// keep their current relative order.
    pub fn sorted_by_affinity(&self) -> Self {
        let mut records = self.records.clone();
        records.sort_by(|a, b| a.affinity.total_cmp(&b.affinity));
        records.into_iter().collect()
    }
}

impl FromIterator<ScoreRecord> for ResultsTable {
    fn from_iter<I: IntoIterator<Item = ScoreRecord>>(iter: I) -> Self {
        let mut table = Self::new();
        for record in iter {
            table.insert(record);
        }
        table
    }
}

impl<'a> IntoIterator for &'a ResultsTable {
    type Item = &'a ScoreRecord;
    type IntoIter = std::slice::Iter<'a, ScoreRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, f64)]) -> ResultsTable {
        rows.iter()
            .map(|&(name, affinity)| ScoreRecord::new(name, affinity))
            .collect()
    }

    #[test]
    fn insert_preserves_discovery_order() {
        let t = table(&[("comp1", -7.5), ("comp2", -8.2), ("comp0", -6.0)]);
        let names: Vec<_> = t.iter().map(|r| r.compound.as_str()).collect();
        assert_eq!(names, ["comp1", "comp2", "comp0"]);
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn duplicate_compound_overwrites_in_place() {
        let mut t = table(&[("a", -7.0), ("b", -8.0)]);
        let previous = t.insert(ScoreRecord::new("a", -9.0));

        assert_eq!(previous, Some(-7.0));
        assert_eq!(t.len(), 2);
        assert_eq!(t.records()[0], ScoreRecord::new("a", -9.0));
        assert_eq!(t.get("a"), Some(-9.0));
    }

    #[test]
    fn sorted_by_affinity_places_most_negative_first() {
        let t = table(&[("comp1", -7.5), ("comp2", -8.2)]);
        let sorted = t.sorted_by_affinity();
        let names: Vec<_> = sorted.iter().map(|r| r.compound.as_str()).collect();
        assert_eq!(names, ["comp2", "comp1"]);
        assert_eq!(t.records()[0].compound, "comp1");
    }

    #[test]
    fn sorted_by_affinity_is_stable_for_ties() {
        let t = table(&[("x", -6.0), ("y", -9.0), ("z", -6.0), ("w", -6.0)]);
        let sorted = t.sorted_by_affinity();
        let names: Vec<_> = sorted.iter().map(|r| r.compound.as_str()).collect();
        assert_eq!(names, ["y", "x", "z", "w"]);
    }

    #[test]
    fn get_returns_none_for_unknown_compound() {
        let t = table(&[("a", -1.0)]);
        assert_eq!(t.get("missing"), None);
        assert!(ResultsTable::new().is_empty());
    }
}

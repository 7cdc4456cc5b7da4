use std::collections::{BTreeMap, HashMap};

use crate::models::{Component, StudentRecord};

/// Running sum and count for one key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bucket {
    pub sum: f64,
    pub count: usize,
}

impl Bucket {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// `None` for an empty bucket so callers never divide by zero.
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum / self.count as f64)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Averages {
    pub general: BTreeMap<Component, f64>,
    pub grouped: BTreeMap<String, f64>,
}

#[derive(Debug, Default)]
pub struct Aggregator {
    overall: HashMap<Component, Bucket>,
    groups: HashMap<String, Bucket>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, student: &StudentRecord) {
        for component in Component::RANKED {
            self.overall
                .entry(component)
                .or_default()
                .add(student.scores.get(component));
        }

        if let Some(group) = &student.group {
            self.groups
                .entry(group.clone())
                .or_default()
                .add(student.scores.total);
        }
    }

    pub fn finish(self) -> Averages {
        let general = self
            .overall
            .into_iter()
            .filter_map(|(component, bucket)| bucket.average().map(|avg| (component, avg)))
            .collect();
        let grouped = self
            .groups
            .into_iter()
            .filter_map(|(group, bucket)| bucket.average().map(|avg| (group, avg)))
            .collect();

        Averages { general, grouped }
    }
}

use std::collections::BTreeMap;

use crate::config::RankingKey;
use crate::models::{Component, RankingEntry, StudentRecord};

pub const DEFAULT_TOP_N: usize = 3;

#[derive(Debug)]
pub struct Ranker {
    key: RankingKey,
    top_n: usize,
    buffers: BTreeMap<Component, Vec<StudentRecord>>,
}

impl Ranker {
    pub fn new(key: RankingKey, top_n: usize) -> Self {
        Self {
            key,
            top_n,
            buffers: BTreeMap::new(),
        }
    }

    pub fn record(&mut self, student: &StudentRecord) {
        for component in Component::RANKED {
            self.buffers
                .entry(component)
                .or_default()
                .push(student.clone());
        }
    }

    pub fn finish(self) -> BTreeMap<Component, Vec<RankingEntry>> {
        let key = self.key;
        let top_n = self.top_n;

        self.buffers
            .into_iter()
            .map(|(component, students)| (component, top_students(students, component, key, top_n)))
            .collect()
    }
}

/// Orders `students` by descending score and keeps the first `top_n`.
///
/// The sort is stable, so students with equal scores keep their sheet order.
pub fn top_students(
    mut students: Vec<StudentRecord>,
    component: Component,
    key: RankingKey,
    top_n: usize,
) -> Vec<RankingEntry> {
    let sort_by = match key {
        RankingKey::Component => component,
        RankingKey::Total => Component::Total,
    };

    students.sort_by(|a, b| {
        b.scores
            .get(sort_by)
            .partial_cmp(&a.scores.get(sort_by))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    students
        .into_iter()
        .take(top_n)
        .enumerate()
        .map(|(position, student)| RankingEntry {
            rank: position + 1,
            marks: student.scores.get(sort_by),
            identifier: student.emplid,
            grouping_key: student.group,
        })
        .collect()
}

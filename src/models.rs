use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::config::GroupBy;

/// A scored column of the gradebook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Component {
    Quiz,
    MidSem,
    LabTest,
    WeeklyLabs,
    PreCompre,
    Compre,
    Total,
}

impl Component {
    /// Components read directly from the sheet and summed into the recomputed total.
    pub const SUMMED: [Component; 5] = [
        Component::Quiz,
        Component::MidSem,
        Component::LabTest,
        Component::WeeklyLabs,
        Component::Compre,
    ];

    /// Components that get an overall average and a top-N list.
    pub const RANKED: [Component; 6] = [
        Component::Quiz,
        Component::MidSem,
        Component::LabTest,
        Component::WeeklyLabs,
        Component::Compre,
        Component::Total,
    ];

    /// Header label matched by substring against the sheet's header row.
    pub fn label(self) -> &'static str {
        match self {
            Component::Quiz => "Quiz (30)",
            Component::MidSem => "Mid-Sem (75)",
            Component::LabTest => "Lab Test (60)",
            Component::WeeklyLabs => "Weekly Labs (30)",
            Component::PreCompre => "Pre-Compre (195)",
            Component::Compre => "Compre (105)",
            Component::Total => "Total (300)",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Component::Quiz => "Quiz",
            Component::MidSem => "MidSem",
            Component::LabTest => "LabTest",
            Component::WeeklyLabs => "WeeklyLabs",
            Component::PreCompre => "PreCompre",
            Component::Compre => "Compre",
            Component::Total => "Total",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ComponentScores {
    pub quiz: f64,
    pub mid_sem: f64,
    pub lab_test: f64,
    pub weekly_labs: f64,
    pub compre: f64,
    /// The total as written in the sheet.
    pub total: f64,
}

impl ComponentScores {
    /// Pre-compre is always derived so it is never counted twice.
    pub fn pre_compre(&self) -> f64 {
        self.quiz + self.mid_sem + self.lab_test + self.weekly_labs
    }

    pub fn get(&self, component: Component) -> f64 {
        match component {
            Component::Quiz => self.quiz,
            Component::MidSem => self.mid_sem,
            Component::LabTest => self.lab_test,
            Component::WeeklyLabs => self.weekly_labs,
            Component::PreCompre => self.pre_compre(),
            Component::Compre => self.compre,
            Component::Total => self.total,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StudentRecord {
    /// 1-based sheet row, counting the header.
    pub row: usize,
    pub emplid: String,
    pub group: Option<String>,
    pub scores: ComponentScores,
    pub computed_total: f64,
    pub discrepancy: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscrepancyRecord {
    pub row: usize,
    pub identifier: String,
    pub computed_total: f64,
    pub expected_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub identifier: String,
    pub grouping_key: Option<String>,
    pub marks: f64,
}

/// How every data row below the header was classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowTally {
    pub data_rows: usize,
    pub empty_rows: usize,
    pub filtered_rows: usize,
    pub counted_rows: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub group_by: GroupBy,
    pub general_averages: BTreeMap<Component, f64>,
    pub grouped_averages: BTreeMap<String, f64>,
    pub discrepancies: Vec<DiscrepancyRecord>,
    pub top_students: BTreeMap<Component, Vec<RankingEntry>>,
    pub tally: RowTally,
    pub missing_columns: Vec<String>,
}

// WHY: speaker → category table used to reorder matrices for visualization
// Not consulted by any core stage

use serde::{Deserialize, Serialize};

/// One category and its members in display order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerGroup {
    pub category: String,
    pub members: Vec<String>,
}

impl SpeakerGroup {
    pub fn new(category: &str, members: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            members: members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

/// Default grouping by race
pub fn default_groups() -> Vec<SpeakerGroup> {
    vec![
        SpeakerGroup::new("Humans", &["ARAGORN", "THÉODEN", "FARAMIR", "BOROMIR", "ÉOWYN"]),
        SpeakerGroup::new("Hobbits", &["FRODO", "SAM", "PIPPIN", "MERRY", "BILBO"]),
        SpeakerGroup::new("Elves", &["GALADRIEL", "LEGOLAS", "ELROND", "ARWEN"]),
        SpeakerGroup::new("Wizards", &["GANDALF", "SARUMAN"]),
        SpeakerGroup::new("Other", &["GOLLUM", "GIMLI", "TREEBEARD", "SMÉAGOL"]),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupingTable {
    groups: Vec<SpeakerGroup>,
}

impl GroupingTable {
    pub fn new(groups: Vec<SpeakerGroup>) -> Self {
        Self { groups }
    }

    pub fn groups(&self) -> &[SpeakerGroup] {
        &self.groups
    }

    pub fn category_of(&self, speaker: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|g| g.members.iter().any(|m| m == speaker))
            .map(|g| g.category.as_str())
    }

    /// Permutation of `labels`: grouped speakers in table order, then the rest as given
    pub fn group_order<S: AsRef<str>>(&self, labels: &[S]) -> Vec<String> {
        let labels: Vec<&str> = labels.iter().map(|l| l.as_ref()).collect();
        let mut order: Vec<String> = Vec::with_capacity(labels.len());

        for group in &self.groups {
            for member in &group.members {
                if labels.contains(&member.as_str()) && !order.contains(member) {
                    order.push(member.clone());
                }
            }
        }
        for label in labels {
            if !order.iter().any(|o| o == label) {
                order.push(label.to_string());
            }
        }
        order
    }
}

impl Default for GroupingTable {
    fn default() -> Self {
        Self::new(default_groups())
    }
}

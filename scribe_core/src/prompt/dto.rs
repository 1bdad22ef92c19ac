use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Whole text fits in one chunk.
    Single,
    /// One call per chunk.
    Map,
    /// One call over the joined chunk summaries.
    Reduce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Text,
    Summaries,
}

impl Slot {
    pub fn placeholder(&self) -> &'static str {
        match self {
            Slot::Text => "{text}",
            Slot::Summaries => "{summaries}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PromptTemplate {
    pub template: &'static str,
    pub slot: Slot,
}

impl From<(&'static str, Slot)> for PromptTemplate {
    fn from((template, slot): (&'static str, Slot)) -> Self {
        Self { template, slot }
    }
}

impl PromptTemplate {
    pub fn render(&self, value: &str) -> String {
        self.template.replacen(self.slot.placeholder(), value, 1)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Single => write!(f, "single"),
            Phase::Map => write!(f, "map"),
            Phase::Reduce => write!(f, "reduce"),
        }
    }
}

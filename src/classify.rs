//! Rule-based labelling of job listings.
//!
//! Two independent passes over a listing's text:
//!   1. category: ordered, first-match-wins rules over the title only
//!   2. skills: closed-vocabulary substring hits over title + description
//!
//! Both are pure functions of the lowercased text. The label and keyword
//! strings are read by downstream consumers and must not change.

use std::fmt;

use serde::{Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    BusinessProcessAnalyst,
    SystemAnalyst,
    ProductAnalyst,
    ItOperations,
    BusinessOperations,
    BusinessAnalyst,
    Others,
}

impl Category {
    pub fn label(self) -> &'static str {
        match self {
            Category::BusinessProcessAnalyst => "Business Process Analyst",
            Category::SystemAnalyst => "System Analyst",
            Category::ProductAnalyst => "Product Analyst",
            Category::ItOperations => "IT Operations",
            Category::BusinessOperations => "Business Operations",
            Category::BusinessAnalyst => "Business Analyst",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Assign exactly one category from the title. Order matters: the first
/// matching rule wins.
pub fn classify(title: &str) -> Category {
    let t = title.to_lowercase();
    let has = |needle: &str| t.contains(needle);

    if has("business process") {
        Category::BusinessProcessAnalyst
    } else if has("system") && has("analyst") {
        Category::SystemAnalyst
    } else if has("product") && has("analyst") {
        Category::ProductAnalyst
    } else if has("data") && has("analyst") {
        Category::ProductAnalyst
    } else if has("it") && has("operat") {
        Category::ItOperations
    } else if has("product") && has("operat") {
        Category::BusinessOperations
    } else if has("business") && has("operat") {
        Category::BusinessOperations
    } else if has("business analyst") || has("bi ") || has("intelligence") {
        Category::BusinessAnalyst
    } else {
        Category::Others
    }
}

pub const SKILL_KEYWORDS: [&str; 26] = [
    "SQL",
    "Python",
    "Excel",
    "Tableau",
    "Power BI",
    "CRM",
    "UAT",
    "Analytics",
    "Agile",
    "Scrum",
    "JIRA",
    "Confluence",
    "SAP",
    "Salesforce",
    "KPI",
    "Dashboard",
    "Automation",
    "API",
    "ETL",
    "A/B Testing",
    "Stakeholder",
    "Requirements",
    "Strategy",
    "Reporting",
    "Forecasting",
    "Machine Learning",
];

const SENIORITY_WORDS: &[&str] = &[
    // junior
    "junior", "associate", "entry", "intern", "graduate", "trainee",
    // mid
    "analyst", "specialist", "coordinator", "consultant",
    // senior
    "senior", "lead", "principal", "staff", "head",
    // executive
    "director", "manager", "vp", "chief", "executive",
];

/// Vocabulary hits in title + description, in vocabulary order.
pub fn extract_skills(title: &str, description: Option<&str>) -> Vec<&'static str> {
    let text = format!("{} {}", title, description.unwrap_or("")).to_lowercase();
    SKILL_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| text.contains(&kw.to_lowercase()))
        .collect()
}

/// Share of the vocabulary hit, as a 0..=100 percentage.
pub fn keyword_score(hits: usize) -> u8 {
    let pct = (hits as f64 / SKILL_KEYWORDS.len() as f64 * 100.0).round();
    pct.min(100.0) as u8
}

pub fn seniority_hint(title: &str) -> bool {
    let t = title.to_lowercase();
    SENIORITY_WORDS.iter().any(|w| t.contains(w))
}

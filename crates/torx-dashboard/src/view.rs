//! Lenient reading of stored payloads into the five dashboard sections.
//!
//! Stored JSON is never validated against the target schema, so every
//! lookup falls back to an empty value instead of failing.

use serde::Serialize;
use serde_json::Value;

/// Wrapper key the model is asked to produce
pub const ROOT_KEY: &str = "bid_submission_documents_part_1";

/// One way of proving financial capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinancialOption {
    /// When this option applies
    pub condition: String,
    /// Document required
    pub document: String,
}

/// Document lists for one project, grouped by bidder type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectView {
    /// Ordinary or limited partnerships
    pub partnership: Vec<String>,
    /// Limited companies
    pub company: Vec<String>,
    /// Individuals
    pub individual: Vec<String>,
    /// Joint ventures
    pub joint_venture: Vec<String>,
    /// Financial capability note
    pub financial_note: Option<String>,
    /// Financial capability options
    pub financial_options: Vec<FinancialOption>,
    /// Everything else
    pub general: Vec<String>,
}

impl ProjectView {
    /// Read the sections out of a payload
    ///
    /// Payloads without the wrapper key are read from the top level.
    pub fn from_value(payload: &Value) -> Self {
        let root = match payload.get(ROOT_KEY) {
            Some(inner) if inner.as_object().is_some_and(|o| !o.is_empty()) => inner,
            _ => payload,
        };

        let legal = field(root, "1_legal_entity_documents");
        let finance = field(root, "4_financial_capability_evidence");

        Self {
            partnership: documents(field(legal, "case_partnership")),
            company: documents(field(legal, "case_company")),
            individual: documents(field(root, "2_individual_documents")),
            joint_venture: documents(field(root, "3_joint_venture_documents")),
            financial_note: field(finance, "note")
                .as_str()
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            financial_options: field(finance, "options")
                .as_array()
                .map(|options| {
                    options
                        .iter()
                        .map(|opt| FinancialOption {
                            condition: text_or(field(opt, "condition"), "เงื่อนไข"),
                            document: text_or(field(opt, "document"), "-"),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            general: documents(field(root, "5_general_documents")),
        }
    }

    /// True when no section has any content
    pub fn is_empty(&self) -> bool {
        self.partnership.is_empty()
            && self.company.is_empty()
            && self.individual.is_empty()
            && self.joint_venture.is_empty()
            && self.financial_note.is_none()
            && self.financial_options.is_empty()
            && self.general.is_empty()
    }
}

fn field<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&Value::Null)
}

fn documents(section: &Value) -> Vec<String> {
    field(section, "required_documents")
        .as_array()
        .map(|items| items.iter().filter_map(item_text).collect())
        .unwrap_or_default()
}

fn item_text(item: &Value) -> Option<String> {
    match item {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn text_or(value: &Value, fallback: &str) -> String {
    item_text(value).unwrap_or_else(|| fallback.to_string())
}

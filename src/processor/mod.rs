//! Result processor: raw audit output -> scored summary + reduced violations
//!
//! This is a pure function of its input. It counts errors/warnings, applies
//! the fixed scoring table, and reduces each raw violation to the fields
//! worth persisting, with rule-specific extraction for a small set of known
//! rule ids.

use crate::audit::{RawAuditResult, RawNode};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// High-level summary of one page's audit
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub error_count: usize,
    pub warning_count: usize,
    /// 0-100, a step function of `error_count` fixed at computation time
    pub score: u8,
    pub timestamp: DateTime<Utc>,
}

/// One processed violation with its affected elements
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    pub impact: Option<String>,
    pub description: String,
    pub help: String,
    pub help_url: String,
    pub elements: Vec<ViolationElement>,
}

/// One affected element, reduced to the essentials
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ViolationElement {
    pub html: String,
    /// First CSS selector from the raw target chain
    pub target: Option<String>,
    pub failure_summary: Option<String>,
    #[serde(flatten)]
    pub extra: RuleData,
}

/// Rule-specific extra data, keyed by violation id
///
/// Unknown rule ids yield the empty value; new rules get a field here and an
/// arm in `extract_rule_data`.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RuleData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<ContrastData>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_alt: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_link_text: Option<bool>,
}

/// Contrast details pulled from a color-contrast check datum
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContrastData {
    pub ratio: Option<f64>,
    pub expected: Option<String>,
    pub foreground: Option<String>,
    pub background: Option<String>,
    pub font_size: Option<String>,
}

/// Fully processed audit result for one page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedResult {
    pub summary: Summary,
    pub violations: Vec<Violation>,
    pub page_url: String,
}

/// Computes the 0-100 accessibility score from the violation count
///
/// Fixed step function; boundaries are inclusive:
///
/// | violations | score |
/// |------------|-------|
/// | 0          | 100   |
/// | 1-3        | 80    |
/// | 4-10       | 60    |
/// | 11-20      | 40    |
/// | 21-35      | 20    |
/// | >35        | 0     |
pub fn accessibility_score(error_count: usize) -> u8 {
    match error_count {
        0 => 100,
        1..=3 => 80,
        4..=10 => 60,
        11..=20 => 40,
        21..=35 => 20,
        _ => 0,
    }
}

/// Processes one page's raw audit output into a scored summary and a reduced
/// violation list
///
/// Incomplete checks are counted as warnings. The score is a function of the
/// error count alone and is never recomputed after this point.
pub fn process_audit_results(raw: &RawAuditResult, page_url: &str) -> ProcessedResult {
    let summary = Summary {
        error_count: raw.violations.len(),
        warning_count: raw.incomplete.len(),
        score: accessibility_score(raw.violations.len()),
        timestamp: Utc::now(),
    };

    let violations = raw
        .violations
        .iter()
        .map(|violation| Violation {
            id: violation.id.clone(),
            impact: violation.impact.clone(),
            description: violation.description.clone(),
            help: violation.help.clone(),
            help_url: violation.help_url.clone(),
            elements: violation
                .nodes
                .iter()
                .map(|node| ViolationElement {
                    html: node.html.clone(),
                    target: node.target.first().cloned(),
                    failure_summary: node.failure_summary.clone(),
                    extra: extract_rule_data(&violation.id, node),
                })
                .collect(),
        })
        .collect();

    ProcessedResult {
        summary,
        violations,
        page_url: page_url.to_string(),
    }
}

/// Extracts rule-specific data for known rule ids
fn extract_rule_data(rule_id: &str, node: &RawNode) -> RuleData {
    let mut data = RuleData::default();

    match rule_id {
        "color-contrast" => {
            if let Some(check_data) = node.any.first().and_then(|check| check.data.as_ref()) {
                data.contrast = Some(ContrastData {
                    ratio: check_data.get("contrastRatio").and_then(|v| v.as_f64()),
                    expected: check_data
                        .get("expectedContrastRatio")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    foreground: check_data
                        .get("fgColor")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    background: check_data
                        .get("bgColor")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                    font_size: check_data
                        .get("fontSize")
                        .and_then(|v| v.as_str())
                        .map(String::from),
                });
            }
        }

        "image-alt" => {
            data.missing_alt = Some(true);
        }

        "link-name" => {
            data.missing_link_text = Some(true);
        }

        _ => {}
    }

    data
}

//! The audit capability seam
//!
//! The accessibility engine itself is an external collaborator: given a
//! navigated page it returns raw violations and incomplete checks. This
//! module defines that seam as the [`Auditor`] trait plus the raw result
//! types, and ships one built-in implementation so the CLI can run end to
//! end without an external engine.

mod builtin;

pub use builtin::BuiltinAuditor;

use async_trait::async_trait;
use serde::Deserialize;

/// A navigated page, exclusively owned by the worker executing its job
#[derive(Debug, Clone)]
pub struct PageHandle {
    /// The URL the page was loaded from
    pub url: String,

    /// The page body as served
    pub html: String,
}

/// Raw output of an accessibility audit (axe-shaped)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAuditResult {
    /// Definite rule violations
    pub violations: Vec<RawViolation>,

    /// Checks the engine could not complete; treated as warnings downstream
    pub incomplete: Vec<RawViolation>,
}

/// One raw rule violation with its affected nodes
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawViolation {
    pub id: String,
    pub impact: Option<String>,
    pub description: String,
    pub help: String,
    pub help_url: String,
    pub nodes: Vec<RawNode>,
}

/// One affected element within a violation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawNode {
    /// Element HTML snippet
    pub html: String,

    /// CSS selector chain; the first entry is the most specific selector
    pub target: Vec<String>,

    pub failure_summary: Option<String>,

    /// Per-check results; rule-specific data lives in `any[0].data`
    pub any: Vec<RawCheck>,
}

/// One check result attached to a node
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawCheck {
    pub id: String,
    pub data: Option<serde_json::Value>,
}

/// The opaque audit capability
///
/// Implementations inspect a page and return raw findings. The mechanism
/// (embedded rules, a headless browser, a remote engine) is out of scope
/// for the pipeline; workers only see this trait.
#[async_trait]
pub trait Auditor: Send + Sync {
    async fn audit(&self, page: &PageHandle) -> crate::Result<RawAuditResult>;
}

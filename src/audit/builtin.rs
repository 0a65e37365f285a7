//! Built-in auditor with a small set of static HTML checks
//!
//! This is not a substitute for a full accessibility engine. It covers two
//! cheap, high-signal rules (missing image alt text, links without a
//! readable name) so the pipeline is usable standalone, and it emits its
//! findings in the same raw shape an external engine would.

use crate::audit::{Auditor, PageHandle, RawAuditResult, RawCheck, RawNode, RawViolation};
use async_trait::async_trait;
use regex::Regex;

pub struct BuiltinAuditor {
    img_tag: Regex,
    alt_attr: Regex,
    anchor: Regex,
}

impl BuiltinAuditor {
    pub fn new() -> Self {
        Self {
            img_tag: Regex::new(r"(?is)<img\b[^>]*>").expect("valid regex"),
            alt_attr: Regex::new(r#"(?i)\balt\s*=\s*("[^"]*"|'[^']*')"#).expect("valid regex"),
            anchor: Regex::new(r"(?is)<a\b[^>]*>(.*?)</a>").expect("valid regex"),
        }
    }

    /// Finds `<img>` elements without an alt attribute
    fn check_image_alt(&self, html: &str) -> Option<RawViolation> {
        let nodes: Vec<RawNode> = self
            .img_tag
            .find_iter(html)
            .filter(|m| !self.alt_attr.is_match(m.as_str()))
            .map(|m| RawNode {
                html: m.as_str().to_string(),
                target: vec!["img".to_string()],
                failure_summary: Some(
                    "Fix any of the following: Element does not have an alt attribute".to_string(),
                ),
                any: vec![RawCheck {
                    id: "has-alt".to_string(),
                    data: None,
                }],
            })
            .collect();

        if nodes.is_empty() {
            return None;
        }

        Some(RawViolation {
            id: "image-alt".to_string(),
            impact: Some("critical".to_string()),
            description: "Images must have alternate text".to_string(),
            help: "Images must have an alt attribute".to_string(),
            help_url: "https://dequeuniversity.com/rules/axe/4.4/image-alt".to_string(),
            nodes,
        })
    }

    /// Finds `<a>` elements whose content carries no readable text
    fn check_link_name(&self, html: &str) -> Option<RawViolation> {
        let nodes: Vec<RawNode> = self
            .anchor
            .captures_iter(html)
            .filter(|cap| {
                let inner = cap.get(1).map(|m| m.as_str()).unwrap_or("");
                // Strip nested tags, then check for visible text
                let text: String = strip_tags(inner);
                text.trim().is_empty()
            })
            .map(|cap| RawNode {
                html: cap.get(0).map(|m| m.as_str()).unwrap_or("").to_string(),
                target: vec!["a".to_string()],
                failure_summary: Some(
                    "Fix all of the following: Element does not have text that is visible"
                        .to_string(),
                ),
                any: vec![RawCheck {
                    id: "has-visible-text".to_string(),
                    data: None,
                }],
            })
            .collect();

        if nodes.is_empty() {
            return None;
        }

        Some(RawViolation {
            id: "link-name".to_string(),
            impact: Some("serious".to_string()),
            description: "Links must have discernible text".to_string(),
            help: "Links must have discernible text".to_string(),
            help_url: "https://dequeuniversity.com/rules/axe/4.4/link-name".to_string(),
            nodes,
        })
    }
}

impl Default for BuiltinAuditor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Auditor for BuiltinAuditor {
    async fn audit(&self, page: &PageHandle) -> crate::Result<RawAuditResult> {
        let mut violations = Vec::new();

        if let Some(v) = self.check_image_alt(&page.html) {
            violations.push(v);
        }
        if let Some(v) = self.check_link_name(&page.html) {
            violations.push(v);
        }

        tracing::debug!(
            "Built-in audit of {} found {} violation(s)",
            page.url,
            violations.len()
        );

        Ok(RawAuditResult {
            violations,
            incomplete: Vec::new(),
        })
    }
}

fn strip_tags(fragment: &str) -> String {
    let mut out = String::new();
    let mut in_tag = false;
    for c in fragment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> PageHandle {
        PageHandle {
            url: "https://example.com/".to_string(),
            html: html.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_alt_flagged() {
        let auditor = BuiltinAuditor::new();
        let result = auditor
            .audit(&page(r#"<img src="a.png"><img src="b.png" alt="b">"#))
            .await
            .unwrap();

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].id, "image-alt");
        assert_eq!(result.violations[0].nodes.len(), 1);
        assert!(result.violations[0].nodes[0].html.contains("a.png"));
    }

    #[tokio::test]
    async fn test_empty_alt_is_accepted() {
        // alt="" marks a decorative image; only a missing attribute is flagged
        let auditor = BuiltinAuditor::new();
        let result = auditor
            .audit(&page(r#"<img src="deco.png" alt="">"#))
            .await
            .unwrap();
        assert!(result.violations.is_empty());
    }

    #[tokio::test]
    async fn test_empty_link_flagged() {
        let auditor = BuiltinAuditor::new();
        let result = auditor
            .audit(&page(r#"<a href="/x"><span></span></a><a href="/y">fine</a>"#))
            .await
            .unwrap();

        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].id, "link-name");
        assert_eq!(result.violations[0].nodes.len(), 1);
    }

    #[tokio::test]
    async fn test_clean_page() {
        let auditor = BuiltinAuditor::new();
        let result = auditor
            .audit(&page(r#"<img src="a.png" alt="chart"><a href="/x">link</a>"#))
            .await
            .unwrap();
        assert!(result.violations.is_empty());
        assert!(result.incomplete.is_empty());
    }
}

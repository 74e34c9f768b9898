//! Record → AST → layout → document.
//!
//! Checks the caller contract once, then runs the pure stages in order. Every function
//! here is synchronous and CPU-bound; the HTTP handlers call them from `spawn_blocking`.

use thiserror::Error;
use tracing::{info, warn};

use crate::canonical::map_to_ast;
use crate::layout::resolver::{resolve_layout, LayoutMeta, ResolvedLayout};
use crate::layout::rules::TemplateRules;
use crate::models::ast::ResumeAst;
use crate::models::legacy::LegacyResume;
use crate::render::{self, pdf, HtmlDocument};

/// Input the engine refuses to lay out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("resume name is missing or blank")]
    MissingName,
}

pub fn validate_record(record: &LegacyResume) -> Result<(), ContractError> {
    match record.name.as_deref() {
        Some(name) if !name.trim().is_empty() => Ok(()),
        _ => Err(ContractError::MissingName),
    }
}

pub fn build_ast(record: &LegacyResume, rules: &TemplateRules) -> Result<ResumeAst, ContractError> {
    validate_record(record)?;
    Ok(map_to_ast(record, rules))
}

pub fn build_layout(
    record: &LegacyResume,
    rules: &TemplateRules,
) -> Result<ResolvedLayout, ContractError> {
    let ast = build_ast(record, rules)?;
    let layout = resolve_layout(&ast, rules);
    log_meta(&layout.meta, layout.sections.len());
    Ok(layout)
}

#[derive(Debug, Clone)]
pub struct RenderedHtml {
    pub meta: LayoutMeta,
    pub document: HtmlDocument,
}

#[derive(Debug, Clone)]
pub struct RenderedPdf {
    pub meta: LayoutMeta,
    pub bytes: Vec<u8>,
    /// Lowercase hex SHA-256 of `bytes`.
    pub digest: String,
}

pub fn render_html_document(
    record: &LegacyResume,
    rules: &TemplateRules,
) -> Result<RenderedHtml, ContractError> {
    let layout = build_layout(record, rules)?;
    let document = render::render_html(&layout);
    Ok(RenderedHtml {
        meta: layout.meta,
        document,
    })
}

pub fn render_pdf_document(
    record: &LegacyResume,
    rules: &TemplateRules,
) -> Result<RenderedPdf, ContractError> {
    let layout = build_layout(record, rules)?;
    let bytes = render::render_pdf(&layout).to_bytes();
    let digest = pdf::digest(&bytes);
    Ok(RenderedPdf {
        meta: layout.meta,
        bytes,
        digest,
    })
}

fn log_meta(meta: &LayoutMeta, sections: usize) {
    info!(
        sections,
        used_height_pt = meta.used_height_pt,
        dropped_entries = meta.dropped_entries,
        dropped_bullets = meta.dropped_bullets,
        "layout resolved"
    );
    if meta.dropped_entries > 0 {
        warn!(dropped_entries = meta.dropped_entries, "entries did not fit on the page");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rules::default_rules;
    use serde_json::json;

    fn record(value: serde_json::Value) -> LegacyResume {
        serde_json::from_value(value).unwrap()
    }

    fn busy_record() -> LegacyResume {
        let experience: Vec<_> = (0..6)
            .map(|i| {
                json!({
                    "role": format!("Role {i}"),
                    "company": format!("Company {i}"),
                    "startDate": "2019", "endDate": "2021",
                    "bullets": (0..6).map(|b| format!("Delivered outcome {b} for team {i} ").repeat(3)).collect::<Vec<_>>()
                })
            })
            .collect();
        record(json!({
            "name": "Ada Lovelace",
            "email": "ada@a.dev",
            "github": "github.com/ada",
            "experience": experience,
            "projects": [{ "name": "Engine", "bullets": ["Designed it"] }, null, {}],
            "education": [{ "degree": "Mathematics", "school": "Home" }],
            "skills": ["Rust", "Go"]
        }))
    }

    #[test]
    fn test_missing_name_rejected() {
        let rules = default_rules();
        for value in [json!({}), json!({ "name": "   " }), json!({ "name": null })] {
            let r = record(value);
            assert_eq!(validate_record(&r), Err(ContractError::MissingName));
            assert!(build_layout(&r, &rules).is_err());
            assert!(render_pdf_document(&r, &rules).is_err());
        }
    }

    #[test]
    fn test_pdf_output_is_deterministic() {
        let rules = default_rules();
        let r = busy_record();
        let a = render_pdf_document(&r, &rules).unwrap();
        let b = render_pdf_document(&r, &rules).unwrap();
        assert_eq!(a.bytes, b.bytes);
        assert_eq!(a.digest, b.digest);
        assert_eq!(a.digest, pdf::digest(&a.bytes));
    }

    #[test]
    fn test_pdf_output_is_identical_across_threads() {
        let rules = default_rules();
        let r = busy_record();
        let expected = render_pdf_document(&r, &rules).unwrap();

        let digests: Vec<String> = std::thread::scope(|scope| {
            let workers: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| render_pdf_document(&r, &rules).unwrap()))
                .collect();
            workers
                .into_iter()
                .map(|worker| {
                    let rendered = worker.join().unwrap();
                    assert_eq!(rendered.bytes, expected.bytes);
                    rendered.digest
                })
                .collect()
        });

        assert_eq!(digests.len(), 8);
        assert!(digests.iter().all(|d| *d == expected.digest), "{digests:?}");
    }

    #[test]
    fn test_html_output_is_deterministic() {
        let rules = default_rules();
        let r = busy_record();
        let a = render_html_document(&r, &rules).unwrap();
        let b = render_html_document(&r, &rules).unwrap();
        assert_eq!(a.document, b.document);
        assert_eq!(a.meta, b.meta);
    }

    #[test]
    fn test_layout_has_no_empty_sections() {
        let rules = default_rules();
        let sparse = record(json!({
            "name": "Ada",
            "experience": [],
            "projects": [null, null],
            "education": [{ "degree": "BSc" }],
            "skills": [{ "category": "Empty", "items": [] }]
        }));
        for r in [sparse, busy_record()] {
            let layout = build_layout(&r, &rules).unwrap();
            assert!(layout.sections.iter().all(|s| !s.entries.is_empty()));
        }
    }

    #[test]
    fn test_busy_record_respects_caps_and_budget() {
        let rules = default_rules();
        let layout = build_layout(&busy_record(), &rules).unwrap();
        assert!(layout.meta.used_height_pt <= rules.content_height_pt());
        assert!(layout.meta.dropped_entries >= 2);
        assert!(layout.meta.dropped_bullets >= 4);
        assert_eq!(layout.meta.page_count, 1);
        for section in &layout.sections {
            assert!(section.entries.len() <= rules.limits.max_entries_for(&section.id));
            for entry in &section.entries {
                assert!(entry.bullets.len() <= rules.limits.max_bullets_per_entry);
            }
        }
    }

    #[test]
    fn test_header_urls_normalized_in_layout() {
        let layout = build_layout(&busy_record(), &default_rules()).unwrap();
        let urls: Vec<&str> = layout.header.links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["https://github.com/ada"]);
    }

    #[test]
    fn test_ast_keeps_everything_layout_trims() {
        let rules = default_rules();
        let ast = build_ast(&busy_record(), &rules).unwrap();
        let experience = ast.sections.iter().find(|s| s.id == "experience").unwrap();
        assert_eq!(experience.entries.len(), 6);
        assert_eq!(experience.entries[0].bullets.len(), 6);
    }
}

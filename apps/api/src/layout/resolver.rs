//! One-page layout resolver.
//!
//! # Algorithm
//! Greedy, irreversible, single pass against one height budget. Sections are walked in
//! `section_order`; within each section:
//! 1. entries beyond `max_entries_per_section[id]` are truncated from the tail,
//! 2. bullets beyond `max_bullets_per_entry` are truncated from the tail,
//! 3. the section title height is charged, then each entry is placed if it still fits.
//!    An entry that overflows is dropped and the walk continues with the next entry.
//! 4. sections with no surviving entries are omitted.
//!
//! The title charge in step 3 stays on the budget even when the section ends up omitted.
//! The resolver never fails; truncation is reported only through `LayoutMeta`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::layout::metrics::{HeightModel, HEIGHT_MODEL};
use crate::layout::rules::{PageSize, TemplateRules, POINTS_PER_INCH};
use crate::models::ast::{ResumeAst, ResumeHeader, ResumeSection};

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Page geometry and typography snapshot, in points. Carried on the layout so the
/// renderers never need the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub size: PageSize,
    pub width_pt: f64,
    pub height_pt: f64,
    pub margin_top_pt: f64,
    pub margin_right_pt: f64,
    pub margin_bottom_pt: f64,
    pub margin_left_pt: f64,
    pub base_font_size: f64,
    pub line_height: f64,
    pub header_font_size: f64,
    pub content_height_pt: f64,
}

impl PageSpec {
    pub fn from_rules(rules: &TemplateRules) -> Self {
        let margins = &rules.layout.margins;
        PageSpec {
            size: rules.page.size,
            width_pt: rules.page.size.width_pt(),
            height_pt: rules.page.size.height_pt(),
            margin_top_pt: margins.top * POINTS_PER_INCH,
            margin_right_pt: margins.right * POINTS_PER_INCH,
            margin_bottom_pt: margins.bottom * POINTS_PER_INCH,
            margin_left_pt: margins.left * POINTS_PER_INCH,
            base_font_size: rules.typography.base_font_size,
            line_height: rules.typography.line_height,
            header_font_size: rules.typography.header_font_size,
            content_height_pt: rules.content_height_pt(),
        }
    }

    pub fn line_height_pt(&self) -> f64 {
        self.base_font_size * self.line_height
    }

    pub fn content_width_pt(&self) -> f64 {
        self.width_pt - self.margin_left_pt - self.margin_right_pt
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMeta {
    pub dropped_bullets: usize,
    pub dropped_entries: usize,
    /// Always 1: the resolver enforces a single page.
    pub page_count: u8,
    /// Header reserve plus every placed section title and entry, by the height model.
    pub used_height_pt: f64,
}

/// The subset of the AST that fits one page. Consumed by both renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedLayout {
    pub header: ResumeHeader,
    pub sections: Vec<ResumeSection>,
    pub meta: LayoutMeta,
    pub page: PageSpec,
}

// ────────────────────────────────────────────────────────────────────────────
// Resolver
// ────────────────────────────────────────────────────────────────────────────

/// Resolves `ast` against `rules` with the calibrated height model.
pub fn resolve_layout(ast: &ResumeAst, rules: &TemplateRules) -> ResolvedLayout {
    resolve_with_model(ast, rules, &HEIGHT_MODEL)
}

pub(crate) fn resolve_with_model(
    ast: &ResumeAst,
    rules: &TemplateRules,
    model: &HeightModel,
) -> ResolvedLayout {
    let content_height = rules.content_height_pt();
    let max_bullets = rules.limits.max_bullets_per_entry;

    let mut current_height = model.header_height;
    let mut used_height = model.header_height;
    let mut dropped_bullets = 0usize;
    let mut dropped_entries = 0usize;
    let mut sections = Vec::new();
    let mut visited: BTreeSet<&str> = BTreeSet::new();

    for section_id in &rules.layout.section_order {
        if !visited.insert(section_id.as_str()) {
            continue;
        }
        let Some(section) = ast.sections.iter().find(|s| &s.id == section_id) else {
            continue;
        };

        // 1. Entry-count cap, before any height accounting.
        let cap = rules.limits.max_entries_for(&section.id);
        let kept = section.entries.len().min(cap);
        let over_cap = section.entries.len() - kept;
        if over_cap > 0 {
            debug!(section = %section.id, cap, truncated = over_cap, "entry cap applied");
            dropped_entries += over_cap;
        }

        // 3. Title is charged once, even if nothing below it fits.
        current_height += model.section_title_height;

        let mut placed = Vec::with_capacity(kept);
        for (index, original) in section.entries[..kept].iter().enumerate() {
            // 2. Bullet cap.
            let mut entry = original.clone();
            if entry.bullets.len() > max_bullets {
                let excess = entry.bullets.len() - max_bullets;
                entry.bullets.truncate(max_bullets);
                dropped_bullets += excess;
                debug!(section = %section.id, index, truncated = excess, "bullet cap applied");
            }

            let entry_height = model.entry_height_in(section, &entry, &rules.typography);
            if current_height + entry_height > content_height {
                dropped_entries += 1;
                debug!(
                    section = %section.id,
                    index,
                    entry_height,
                    remaining = content_height - current_height,
                    "entry does not fit; dropped"
                );
                continue;
            }

            current_height += entry_height;
            used_height += entry_height;
            placed.push(entry);
        }

        // 4. No empty sections.
        if placed.is_empty() {
            debug!(section = %section.id, "no entries fit; section omitted");
            continue;
        }

        used_height += model.section_title_height;
        sections.push(ResumeSection {
            id: section.id.clone(),
            title: section.title.clone(),
            entries: placed,
        });
    }

    for section in ast.sections.iter().filter(|s| !visited.contains(s.id.as_str())) {
        debug!(section = %section.id, "section not in section_order; dropped");
        dropped_entries += section.entries.len();
    }

    ResolvedLayout {
        header: ast.header.clone(),
        sections,
        meta: LayoutMeta {
            dropped_bullets,
            dropped_entries,
            page_count: 1,
            used_height_pt: used_height,
        },
        page: PageSpec::from_rules(rules),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Canonicalizer: legacy résumé record → `ResumeAst`.
//!
//! Total and pure. Malformed-but-tolerable input degrades by omission: missing arrays
//! become absent sections, `null` members are filtered out before any field mapping,
//! and a section with zero entries is never emitted. Field-precedence rules are applied
//! here once and never re-interpreted downstream.

pub mod links;

use crate::layout::rules::TemplateRules;
use crate::models::ast::{
    LinkType, ResumeAst, ResumeEntry, ResumeHeader, ResumeSection, SECTION_EDUCATION,
    SECTION_EXPERIENCE, SECTION_PROJECTS, SECTION_SKILLS,
};
use crate::models::legacy::{
    LegacyEducation, LegacyExperience, LegacyProject, LegacyResume, LegacySkill, TextOrLines,
};

/// Title of the single entry built from a flat skills list.
pub const FLAT_SKILLS_TITLE: &str = "Skills";

/// Separator used when joining a start and end date.
pub const DATE_RANGE_SEPARATOR: &str = " – ";

/// Maps a legacy record onto the canonical AST, ordered by `rules.layout.section_order`.
pub fn map_to_ast(record: &LegacyResume, rules: &TemplateRules) -> ResumeAst {
    let mut sections = Vec::new();

    if let Some(items) = record.experience.as_deref() {
        let entries = items.iter().flatten().map(map_experience).collect();
        push_section(&mut sections, SECTION_EXPERIENCE, "Experience", entries);
    }
    if let Some(items) = record.projects.as_deref() {
        let entries = items.iter().flatten().map(map_project).collect();
        push_section(&mut sections, SECTION_PROJECTS, "Projects", entries);
    }
    if let Some(items) = record.education.as_deref() {
        let entries = items.iter().flatten().map(map_education).collect();
        push_section(&mut sections, SECTION_EDUCATION, "Education", entries);
    }
    if let Some(items) = record.skills.as_deref() {
        push_section(&mut sections, SECTION_SKILLS, "Skills", map_skills(items));
    }

    // Stable: unknown ids keep discovery order after the listed ones.
    sections.sort_by_key(|s| rules.section_rank(&s.id).unwrap_or(usize::MAX));

    ResumeAst {
        header: map_header(record),
        sections,
    }
}

fn push_section(sections: &mut Vec<ResumeSection>, id: &str, title: &str, entries: Vec<ResumeEntry>) {
    if entries.is_empty() {
        return;
    }
    sections.push(ResumeSection {
        id: id.to_string(),
        title: title.to_string(),
        entries,
    });
}

// ────────────────────────────────────────────────────────────────────────────
// Header
// ────────────────────────────────────────────────────────────────────────────

fn map_header(record: &LegacyResume) -> ResumeHeader {
    let mut header_links: Vec<_> = record
        .links
        .iter()
        .flatten()
        .flatten()
        .filter_map(links::map_link)
        .collect();

    let shorthand = [
        (record.linkedin.as_deref(), LinkType::Linkedin),
        (record.github.as_deref(), LinkType::Github),
        (record.portfolio.as_deref(), LinkType::Portfolio),
    ];
    for (value, link_type) in shorthand {
        if let Some(link) = links::shorthand_link(value, link_type) {
            if !header_links.iter().any(|l| l.url == link.url) {
                header_links.push(link);
            }
        }
    }

    ResumeHeader {
        name: record.name.clone().unwrap_or_default(),
        location: present(record.location.as_ref()),
        email: present(record.email.as_ref()),
        phone: present(record.phone.as_ref()),
        links: header_links,
    }
}

/// Copies a header field verbatim unless it is blank.
fn present(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}

// ────────────────────────────────────────────────────────────────────────────
// Entries
// ────────────────────────────────────────────────────────────────────────────

fn map_experience(item: &LegacyExperience) -> ResumeEntry {
    ResumeEntry {
        title: first_text(&item.role, &item.title),
        role: text(&item.role),
        company: text(&item.company),
        location: text(&item.location),
        date: join_dates(
            first_text(&item.start_date, &item.start),
            first_text(&item.end_date, &item.end),
        ),
        description: description(&item.description),
        bullets: text_list(&item.bullets),
        tech: Vec::new(),
    }
}

fn map_project(item: &LegacyProject) -> ResumeEntry {
    let tech = if item.tech.is_some() {
        text_list(&item.tech)
    } else {
        text_list(&item.technologies)
    };

    ResumeEntry {
        title: first_text(&item.name, &item.title),
        role: text(&item.role),
        company: text(&item.company),
        location: text(&item.location),
        date: join_dates(
            first_text(&item.start_date, &item.start),
            first_text(&item.end_date, &item.end),
        ),
        description: description(&item.description),
        bullets: text_list(&item.bullets),
        tech,
    }
}

fn map_education(item: &LegacyEducation) -> ResumeEntry {
    ResumeEntry {
        title: first_text(&item.degree, &item.title),
        role: None,
        company: first_text(&item.institution, &item.school),
        location: text(&item.location),
        date: join_dates(
            first_text(&item.start_date, &item.start),
            first_text(&item.end_date, &item.end),
        ),
        description: description(&item.description),
        bullets: text_list(&item.bullets),
        tech: Vec::new(),
    }
}

/// Each `{category, items}` group becomes one entry with the items in `bullets`.
/// Bare skill names are gathered into a single trailing "Skills" entry.
fn map_skills(items: &[Option<LegacySkill>]) -> Vec<ResumeEntry> {
    let mut entries = Vec::new();
    let mut loose = Vec::new();

    for skill in items.iter().flatten() {
        match skill {
            LegacySkill::Category(group) => {
                let bullets = text_list(&group.items);
                if bullets.is_empty() {
                    continue;
                }
                entries.push(ResumeEntry {
                    title: Some(text(&group.category).unwrap_or_else(|| FLAT_SKILLS_TITLE.to_string())),
                    bullets,
                    ..Default::default()
                });
            }
            LegacySkill::Name(name) => {
                if let Some(name) = non_blank(name) {
                    loose.push(name);
                }
            }
        }
    }

    if !loose.is_empty() {
        entries.push(ResumeEntry {
            title: Some(FLAT_SKILLS_TITLE.to_string()),
            bullets: loose,
            ..Default::default()
        });
    }
    entries
}

// ────────────────────────────────────────────────────────────────────────────
// Field helpers
// ────────────────────────────────────────────────────────────────────────────

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed text, or `None` when absent or blank.
fn text(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_blank)
}

/// `primary ?? fallback`, where blank counts as absent.
fn first_text(primary: &Option<String>, fallback: &Option<String>) -> Option<String> {
    text(primary).or_else(|| text(fallback))
}

fn text_list(values: &Option<Vec<Option<String>>>) -> Vec<String> {
    values
        .iter()
        .flatten()
        .filter_map(|v| text(v))
        .collect()
}

fn description(value: &Option<TextOrLines>) -> Option<String> {
    match value.as_ref()? {
        TextOrLines::Text(s) => non_blank(s),
        TextOrLines::Lines(lines) => {
            let lines: Vec<String> = lines.iter().filter_map(|l| text(l)).collect();
            (!lines.is_empty()).then(|| lines.join("\n"))
        }
    }
}

fn join_dates(start: Option<String>, end: Option<String>) -> Option<String> {
    match (start, end) {
        (Some(start), Some(end)) => Some(format!("{start}{DATE_RANGE_SEPARATOR}{end}")),
        (Some(only), None) | (None, Some(only)) => Some(only),
        (None, None) => None,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

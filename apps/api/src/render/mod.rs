// Renderers: ResolvedLayout → HTML preview subtree / PDF page description.
// Presentation only; all truncation happened in the resolver. Both renderers take their
// branch decisions from `view`, so they stay structurally parallel.

pub mod handlers;
pub mod html;
pub mod pdf;
pub mod view;

use serde::Serialize;

use crate::models::ast::ResumeSection;
use crate::render::view::EntryView;

pub use html::{render_html, HtmlDocument};
pub use pdf::{render_pdf, PdfDocument};

/// One rendered entry, in render order: `(section id, entry index, displayed title)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    pub section_id: String,
    pub entry_index: usize,
    pub title: String,
}

impl OutlineEntry {
    pub(crate) fn new(section: &ResumeSection, view: &EntryView<'_>) -> Self {
        OutlineEntry {
            section_id: section.id.clone(),
            entry_index: view.index,
            title: view.display_title.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::map_to_ast;
    use crate::layout::resolver::{resolve_layout, ResolvedLayout};
    use crate::layout::rules::default_rules;
    use crate::models::legacy::LegacyResume;
    use crate::render::pdf::RunRole;
    use serde_json::json;

    fn layout(value: serde_json::Value) -> ResolvedLayout {
        let record: LegacyResume = serde_json::from_value(value).unwrap();
        let rules = default_rules();
        resolve_layout(&map_to_ast(&record, &rules), &rules)
    }

    fn full_record() -> serde_json::Value {
        json!({
            "name": "Grace Hopper",
            "location": "Arlington, VA",
            "email": "grace@navy.example",
            "links": [{ "type": "linkedin", "url": "linkedin.com/in/grace" }],
            "experience": [
                { "role": "Rear Admiral", "company": "US Navy", "startDate": "1967", "endDate": "1986",
                  "bullets": ["Standardized COBOL across the fleet", "Led the programming languages group",
                              "Audited compilers", "Wrote validation suites", "Lectured widely"] },
                { "title": "Senior Mathematician", "company": "Remington Rand", "location": "Philadelphia",
                  "start": "1949", "end": "1967", "description": ["Built the A-0 compiler", "Led UNIVAC work"] },
                null,
                { "role": "Research Fellow", "bullets": [] }
            ],
            "projects": [{ "name": "FLOW-MATIC", "tech": ["UNIVAC I"], "bullets": ["English-like data processing"] }],
            "education": [{ "degree": "PhD Mathematics", "institution": "Yale", "endDate": "1934" }],
            "skills": [
                { "category": "Languages", "items": ["COBOL", "FLOW-MATIC"] },
                { "category": "Hardware", "items": ["Mark I", "UNIVAC"] }
            ]
        })
    }

    #[test]
    fn test_renderer_parity_on_outline() {
        let l = layout(full_record());
        let html = render_html(&l);
        let pdf = render_pdf(&l);
        assert!(!html.outline().is_empty());
        assert_eq!(html.outline(), pdf.outline());
    }

    #[test]
    fn test_outline_follows_layout_order() {
        let l = layout(full_record());
        let expected: Vec<(String, usize, String)> = l
            .sections
            .iter()
            .flat_map(|s| {
                s.entries.iter().enumerate().map(move |(i, e)| {
                    (s.id.clone(), i, e.title.clone().unwrap_or_default())
                })
            })
            .collect();
        let actual: Vec<(String, usize, String)> = render_pdf(&l)
            .outline()
            .iter()
            .map(|o| (o.section_id.clone(), o.entry_index, o.title.clone()))
            .collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_pdf_text_appears_in_html() {
        let l = layout(full_record());
        let html = render_html(&l);
        let pdf = render_pdf(&l);
        for run in pdf.text_runs() {
            match run.role {
                RunRole::BulletGlyph => continue,
                // Upper-cased in print and by CSS in the preview.
                RunRole::SectionTitle => {
                    assert!(l.sections.iter().any(|s| s.title.to_uppercase() == run.text));
                    continue;
                }
                _ => {}
            }
            let escaped = maud::html! { (run.text) }.into_string();
            let found = html.markup.contains(&escaped);
            assert!(found, "PDF text {:?} missing from HTML", run.text);
        }
    }

    #[test]
    fn test_skills_identical_in_both_renderers() {
        for (skills, expected) in [
            (json!(["Go", "Rust"]), "Skills: Go, Rust"),
            (
                json!([{ "category": "Languages", "items": ["Go", "Rust"] }]),
                "Languages: Go, Rust",
            ),
        ] {
            let l = layout(json!({ "name": "Ada", "skills": skills }));
            let skills_section = &l.sections[0];
            assert_eq!(skills_section.entries.len(), 1);
            assert_eq!(skills_section.entries[0].bullets, vec!["Go", "Rust"]);

            let html = render_html(&l);
            let pdf = render_pdf(&l);
            assert!(html.markup.contains(&format!(">{expected}</span>")));
            assert!(pdf.text_runs().any(|r| r.text == expected));
            assert_eq!(html.outline(), pdf.outline());
        }
    }

    /// Text of every body line in the HTML, in document order, still escaped.
    fn html_lines(markup: &str) -> Vec<String> {
        markup
            .split(r#"<span class="line""#)
            .skip(1)
            .filter_map(|rest| {
                let start = rest.find('>')? + 1;
                let end = rest.find("</span>")?;
                Some(rest[start..end].to_string())
            })
            .collect()
    }

    fn pdf_lines(pdf: &PdfDocument) -> Vec<String> {
        pdf.text_runs()
            .filter(|r| matches!(r.role, RunRole::Bullet | RunRole::Description | RunRole::SkillLine))
            .map(|r| maud::html! { (r.text) }.into_string())
            .collect()
    }

    #[test]
    fn test_line_breaks_identical_in_both_renderers() {
        let wide = ["a".repeat(46), "b".repeat(46), "c".repeat(46)].join(" ");
        let prose = "R&D on <compilers> and ".repeat(8);
        let l = layout(json!({
            "name": "Ada",
            "experience": [
                { "role": "Eng", "company": "Acme", "bullets": [wide, prose, "short"] },
                { "role": "Writer", "description": [prose, "", "second paragraph"] }
            ],
            "projects": [{ "name": "Engine", "bullets": ["word ".repeat(40)] }],
            "skills": [{ "category": "Languages", "items": vec!["TypeScript"; 12] }]
        }));
        let html = html_lines(&render_html(&l).markup);
        let pdf = pdf_lines(&render_pdf(&l));

        assert!(html.len() > 10, "{html:?}");
        assert_eq!(html, pdf);
        assert!(html.iter().any(|line| line.contains("&amp;")));
    }

    #[test]
    fn test_renderers_add_no_content_beyond_layout() {
        let l = layout(full_record());
        // Resolver kept 4 of the 5 bullets for the first entry.
        assert_eq!(l.meta.dropped_bullets, 1);
        let pdf = render_pdf(&l);
        assert!(!pdf.text_runs().any(|r| r.text == "Lectured widely"));
        assert!(!render_html(&l).markup.contains("Lectured widely"));
        // Tech tags are carried on the layout but not drawn.
        assert!(!pdf.text_runs().any(|r| r.text.contains("UNIVAC I")));
    }
}

//! HTML preview renderer.
//!
//! Emits an `<article>` subtree whose inline styles come from the layout's page snapshot
//! and the height-model constants, so the preview box matches the PDF page: same
//! page size, margins, font size, line height, header reserve, section title band and
//! entry spacing. Text is emitted one fixed-height line per view line, so the preview
//! breaks lines exactly where the PDF does. All interpolated text is escaped by `maud`.

use maud::{html, Markup};

use crate::layout::metrics::HEIGHT_MODEL;
use crate::layout::resolver::{PageSpec, ResolvedLayout};
use crate::layout::rules::PageSize;
use crate::render::view::{self, ContactItem, EntryBody, EntryView, INLINE_SEPARATOR, NAME_LINE_HEIGHT};
use crate::render::OutlineEntry;

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlDocument {
    pub markup: String,
    pub outline: Vec<OutlineEntry>,
}

impl HtmlDocument {
    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }
}

pub fn render_html(layout: &ResolvedLayout) -> HtmlDocument {
    let mut outline = Vec::new();
    for section in &layout.sections {
        outline.extend(view::entry_views(section).map(|v| OutlineEntry::new(section, &v)));
    }

    HtmlDocument {
        markup: render_markup(layout).into_string(),
        outline,
    }
}

fn render_markup(layout: &ResolvedLayout) -> Markup {
    let page = &layout.page;
    let contacts = view::contact_lines(&layout.header, page);
    let line_pt = page.line_height_pt();

    html! {
        article.resume data-page-size=(page_size_name(page.size)) style=(page_style(page)) {
            header.resume-header style=(format!("height:{}pt;overflow:hidden", HEIGHT_MODEL.header_height)) {
                h1.resume-name style=(format!(
                    "margin:0;font-size:{}pt;line-height:{NAME_LINE_HEIGHT};white-space:nowrap;overflow:hidden",
                    page.header_font_size
                )) {
                    (layout.header.name)
                }
                @if !contacts.is_empty() {
                    div.resume-contact {
                        @for items in &contacts {
                            div.contact-line style=(line_style(line_pt)) {
                                @for (i, item) in items.iter().enumerate() {
                                    @if i > 0 {
                                        span.sep { (INLINE_SEPARATOR) }
                                    }
                                    @match item {
                                        ContactItem::Text(text) => {
                                            span { (text) }
                                        },
                                        ContactItem::Link { label, url } => {
                                            a href=(url) { (label) }
                                        },
                                    }
                                }
                            }
                        }
                    }
                }
            }
            @for section in &layout.sections {
                section.resume-section data-section=(section.id) {
                    h2.section-title style=(section_title_style()) {
                        (section.title)
                    }
                    @for entry in view::entry_views(section) {
                        (render_entry(&section.id, &entry, line_pt))
                    }
                }
            }
        }
    }
}

/// One display line: fixed height, no browser-side wrapping. Line breaks come from the view.
fn line_style(line_pt: f64) -> String {
    format!("display:block;margin:0;height:{line_pt}pt;white-space:nowrap;overflow:hidden")
}

fn lines(text: &[String], line_pt: f64) -> Markup {
    html! {
        @for line in text {
            span.line style=(line_style(line_pt)) { (line) }
        }
    }
}

fn render_entry(section_id: &str, entry: &EntryView<'_>, line_pt: f64) -> Markup {
    let row_style = line_style(line_pt);

    html! {
        div.resume-entry data-section=(section_id) data-entry=(entry.index)
            style=(format!("margin:0 0 {}pt 0", HEIGHT_MODEL.entry_margin)) {
            @if entry.has_heading_row() {
                div.entry-heading style=(format!("{row_style};display:flex;justify-content:space-between")) {
                    strong.entry-title { (entry.heading.unwrap_or_default()) }
                    @if let Some(date) = entry.date {
                        span.entry-date { (date) }
                    }
                }
            }
            @if let Some(subheader) = &entry.subheader {
                p.entry-subheader style=(format!("{row_style};font-style:italic")) { (subheader) }
            }
            @match &entry.body {
                EntryBody::SkillLine(text) => {
                    div.skill-line { (lines(text, line_pt)) }
                },
                EntryBody::Bullets(bullets) => {
                    ul.entry-bullets style="margin:0;padding-left:14pt" {
                        @for bullet in bullets {
                            li { (lines(bullet, line_pt)) }
                        }
                    }
                },
                EntryBody::Description(text) => {
                    div.entry-description { (lines(text, line_pt)) }
                },
                EntryBody::Empty => {},
            }
        }
    }
}

fn page_size_name(size: PageSize) -> &'static str {
    match size {
        PageSize::Letter => "letter",
        PageSize::A4 => "a4",
    }
}

fn page_style(page: &PageSpec) -> String {
    format!(
        "box-sizing:border-box;width:{}pt;height:{}pt;padding:{}pt {}pt {}pt {}pt;overflow:hidden;\
         font-family:Helvetica,Arial,sans-serif;font-size:{}pt;line-height:{}",
        page.width_pt,
        page.height_pt,
        page.margin_top_pt,
        page.margin_right_pt,
        page.margin_bottom_pt,
        page.margin_left_pt,
        page.base_font_size,
        page.line_height,
    )
}

fn section_title_style() -> String {
    format!(
        "box-sizing:border-box;margin:0;height:{}pt;font-size:1.2em;text-transform:uppercase;\
         border-bottom:0.5pt solid #000",
        HEIGHT_MODEL.section_title_height
    )
}

//! PDF renderer.
//!
//! `render_pdf` lays a `ResolvedLayout` out as positioned page primitives (text runs,
//! rules and link areas) in PDF user space (origin bottom-left, points). The vertical
//! rhythm uses the same height-model constants as the resolver and the HTML preview.
//!
//! `PdfDocument::to_bytes` serializes the primitives with `pdf-writer`. The output is
//! deterministic: no timestamps, no document ids, fixed object numbering and the
//! standard Helvetica family, so identical layouts produce identical bytes.

use pdf_writer::types::{ActionType, AnnotationType};
use pdf_writer::{Content, Name, Pdf, Rect, Ref, Str};
use sha2::{Digest, Sha256};

use crate::layout::metrics::HEIGHT_MODEL;
use crate::layout::resolver::{PageSpec, ResolvedLayout};
use crate::render::view::{self, ContactItem, EntryBody, EntryView, INLINE_SEPARATOR, NAME_LINE_HEIGHT};
use crate::render::OutlineEntry;

/// Average Helvetica advance width in em; used for right alignment and link boxes only.
const AVERAGE_CHAR_EM: f64 = 0.5;
/// Cap height as a fraction of the font size, for centering text in a band.
const CAP_HEIGHT_EM: f64 = 0.7;
const BULLET_GLYPH: &str = "•";
const BULLET_INDENT_PT: f64 = 4.0;
const BULLET_TEXT_INDENT_PT: f64 = 14.0;
const RULE_WIDTH_PT: f64 = 0.5;
const SECTION_TITLE_SCALE: f64 = 1.2;

// ────────────────────────────────────────────────────────────────────────────
// Page primitives
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfFont {
    Regular,
    Bold,
    Italic,
}

impl PdfFont {
    const ALL: [PdfFont; 3] = [PdfFont::Regular, PdfFont::Bold, PdfFont::Italic];

    fn resource_name(self) -> &'static [u8] {
        match self {
            PdfFont::Regular => b"F1",
            PdfFont::Bold => b"F2",
            PdfFont::Italic => b"F3",
        }
    }

    fn base_font(self) -> &'static [u8] {
        match self {
            PdfFont::Regular => b"Helvetica",
            PdfFont::Bold => b"Helvetica-Bold",
            PdfFont::Italic => b"Helvetica-Oblique",
        }
    }
}

/// What a text run shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunRole {
    Name,
    Contact,
    Separator,
    SectionTitle,
    EntryTitle,
    Date,
    Subheader,
    BulletGlyph,
    Bullet,
    Description,
    SkillLine,
}

/// One line of text; `y` is the baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub role: RunRole,
    pub x: f64,
    pub y: f64,
    pub font: PdfFont,
    pub size: f64,
    pub text: String,
}

/// Horizontal rule at height `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageItem {
    Text(TextRun),
    Rule(Rule),
}

/// Clickable URI area.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkArea {
    pub url: String,
    pub rect: [f64; 4],
}

/// A single-page, print-ready page description.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfDocument {
    pub page: PageSpec,
    pub items: Vec<PageItem>,
    pub links: Vec<LinkArea>,
    pub outline: Vec<OutlineEntry>,
}

impl PdfDocument {
    pub fn outline(&self) -> &[OutlineEntry] {
        &self.outline
    }

    pub fn text_runs(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            PageItem::Text(run) => Some(run),
            PageItem::Rule(_) => None,
        })
    }

    /// Serializes the page to PDF bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut next_id = 0;
        let mut alloc = || {
            next_id += 1;
            Ref::new(next_id)
        };

        let catalog_id = alloc();
        let pages_id = alloc();
        let page_id = alloc();
        let content_id = alloc();
        let font_ids: Vec<(PdfFont, Ref)> = PdfFont::ALL.iter().map(|f| (*f, alloc())).collect();
        let annotation_ids: Vec<Ref> = self.links.iter().map(|_| alloc()).collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(pages_id);
        pdf.pages(pages_id).kids([page_id]).count(1);

        {
            let mut page = pdf.page(page_id);
            page.media_box(Rect::new(
                0.0,
                0.0,
                self.page.width_pt as f32,
                self.page.height_pt as f32,
            ));
            page.parent(pages_id);
            page.contents(content_id);
            if !annotation_ids.is_empty() {
                page.annotations(annotation_ids.iter().copied());
            }
            let mut resources = page.resources();
            let mut fonts = resources.fonts();
            for (font, id) in &font_ids {
                fonts.pair(Name(font.resource_name()), *id);
            }
        }

        for (font, id) in &font_ids {
            pdf.type1_font(*id)
                .base_font(Name(font.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        for (link, id) in self.links.iter().zip(&annotation_ids) {
            let [x1, y1, x2, y2] = link.rect;
            let mut annotation = pdf.annotation(*id);
            annotation
                .subtype(AnnotationType::Link)
                .rect(Rect::new(x1 as f32, y1 as f32, x2 as f32, y2 as f32))
                .border(0.0, 0.0, 0.0, None);
            annotation
                .action()
                .action_type(ActionType::Uri)
                .uri(Str(link.url.as_bytes()));
        }

        // Nothing is painted outside the margins.
        let mut content = Content::new();
        content.save_state();
        content.rect(
            self.page.margin_left_pt as f32,
            self.page.margin_bottom_pt as f32,
            self.page.content_width_pt() as f32,
            (self.page.height_pt - self.page.margin_top_pt - self.page.margin_bottom_pt) as f32,
        );
        content.clip_nonzero();
        content.end_path();
        for item in &self.items {
            match item {
                PageItem::Text(run) => {
                    content.begin_text();
                    content.set_font(Name(run.font.resource_name()), run.size as f32);
                    content.next_line(run.x as f32, run.y as f32);
                    content.show(Str(&encode_win_ansi(&run.text)));
                    content.end_text();
                }
                PageItem::Rule(rule) => {
                    content.set_line_width(RULE_WIDTH_PT as f32);
                    content.move_to(rule.x1 as f32, rule.y as f32);
                    content.line_to(rule.x2 as f32, rule.y as f32);
                    content.stroke();
                }
            }
        }
        content.restore_state();
        pdf.stream(content_id, &content.finish());

        pdf.finish()
    }
}

/// Lowercase hex SHA-256 of serialized PDF bytes.
pub fn digest(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Encodes text for the standard fonts' WinAnsi encoding. Unmappable characters become `?`.
fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Layout walk
// ────────────────────────────────────────────────────────────────────────────

/// Tracks the drawing cursor as a distance from the top edge of the page.
struct PageWriter<'a> {
    page: &'a PageSpec,
    top: f64,
    items: Vec<PageItem>,
    links: Vec<LinkArea>,
}

impl<'a> PageWriter<'a> {
    fn left(&self) -> f64 {
        self.page.margin_left_pt
    }

    fn right(&self) -> f64 {
        self.left() + self.page.content_width_pt()
    }

    /// Baseline (PDF space) for text of `size` centered in a band of `band` points
    /// starting at the cursor.
    fn baseline(&self, band: f64, size: f64) -> f64 {
        self.page.height_pt - (self.top + (band + size * CAP_HEIGHT_EM) / 2.0)
    }

    fn text(&mut self, role: RunRole, x: f64, y: f64, font: PdfFont, size: f64, text: &str) {
        self.items.push(PageItem::Text(TextRun {
            role,
            x,
            y,
            font,
            size,
            text: text.to_string(),
        }));
    }

    /// Draws one line of text in a band, then advances past the band.
    fn line(&mut self, role: RunRole, x: f64, font: PdfFont, size: f64, band: f64, text: &str) {
        let y = self.baseline(band, size);
        self.text(role, x, y, font, size, text);
        self.top += band;
    }
}

fn approx_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * AVERAGE_CHAR_EM
}

pub fn render_pdf(layout: &ResolvedLayout) -> PdfDocument {
    let page = &layout.page;
    let mut writer = PageWriter {
        page,
        top: page.margin_top_pt,
        items: Vec::new(),
        links: Vec::new(),
    };

    write_header(&mut writer, layout);

    let mut outline = Vec::new();
    for section in &layout.sections {
        write_section_title(&mut writer, &section.title);
        for entry in view::entry_views(section) {
            outline.push(OutlineEntry::new(section, &entry));
            write_entry(&mut writer, &entry);
        }
    }

    PdfDocument {
        page: page.clone(),
        items: writer.items,
        links: writer.links,
        outline,
    }
}

fn write_header(w: &mut PageWriter<'_>, layout: &ResolvedLayout) {
    let header_top = w.top;
    let page = w.page;
    let size = page.base_font_size;
    let line = page.line_height_pt();

    let name_band = page.header_font_size * NAME_LINE_HEIGHT;
    let left = w.left();
    w.line(RunRole::Name, left, PdfFont::Bold, page.header_font_size, name_band, &layout.header.name);

    for contacts in view::contact_lines(&layout.header, page) {
        let y = w.baseline(line, size);
        let mut x = w.left();
        for (i, item) in contacts.iter().enumerate() {
            if i > 0 {
                w.text(RunRole::Separator, x, y, PdfFont::Regular, size, INLINE_SEPARATOR);
                x += approx_width(INLINE_SEPARATOR, size);
            }
            let text = item.text();
            let width = approx_width(text, size);
            w.text(RunRole::Contact, x, y, PdfFont::Regular, size, text);
            if let ContactItem::Link { url, .. } = item {
                let x2 = (x + width).min(w.right());
                w.links.push(LinkArea {
                    url: url.to_string(),
                    rect: [x, y - size * 0.25, x2, y + size],
                });
            }
            x += width;
        }
        w.top += line;
    }

    w.top = header_top + HEIGHT_MODEL.header_height;
}

fn write_section_title(w: &mut PageWriter<'_>, title: &str) {
    let band = HEIGHT_MODEL.section_title_height;
    let size = w.page.base_font_size * SECTION_TITLE_SCALE;
    let rule_y = w.page.height_pt - (w.top + band - 3.0);
    let (left, right) = (w.left(), w.right());

    w.line(RunRole::SectionTitle, left, PdfFont::Bold, size, band, &title.to_uppercase());
    w.items.push(PageItem::Rule(Rule {
        x1: left,
        x2: right,
        y: rule_y,
    }));
}

fn write_entry(w: &mut PageWriter<'_>, entry: &EntryView<'_>) {
    let size = w.page.base_font_size;
    let line = w.page.line_height_pt();
    let left = w.left();

    if entry.has_heading_row() {
        let y = w.baseline(line, size);
        if let Some(heading) = entry.heading {
            w.text(RunRole::EntryTitle, left, y, PdfFont::Bold, size, heading);
        }
        if let Some(date) = entry.date {
            let x = w.right() - approx_width(date, size);
            w.text(RunRole::Date, x, y, PdfFont::Regular, size, date);
        }
        w.top += line;
    }

    if let Some(subheader) = &entry.subheader {
        w.line(RunRole::Subheader, left, PdfFont::Italic, size, line, subheader);
    }

    match &entry.body {
        EntryBody::SkillLine(lines) => {
            for text in lines {
                w.line(RunRole::SkillLine, left, PdfFont::Regular, size, line, text);
            }
        }
        EntryBody::Bullets(bullets) => {
            for lines in bullets {
                let y = w.baseline(line, size);
                w.text(
                    RunRole::BulletGlyph,
                    left + BULLET_INDENT_PT,
                    y,
                    PdfFont::Regular,
                    size,
                    BULLET_GLYPH,
                );
                for text in lines {
                    w.line(
                        RunRole::Bullet,
                        left + BULLET_TEXT_INDENT_PT,
                        PdfFont::Regular,
                        size,
                        line,
                        text,
                    );
                }
            }
        }
        EntryBody::Description(lines) => {
            for text in lines {
                w.line(RunRole::Description, left, PdfFont::Regular, size, line, text);
            }
        }
        EntryBody::Empty => {}
    }

    w.top += HEIGHT_MODEL.entry_margin;
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Presentation decisions shared by both renderers.
//!
//! Every conditional that affects what appears on the page lives here, so the HTML and
//! PDF renderers walk the same sections in the same order and make identical choices.
//! Line breaks are decided here too: both renderers draw exactly the lines `break_lines`
//! returns, and never more than the height model charged for the text.

use crate::layout::metrics::HEIGHT_MODEL;
use crate::layout::resolver::PageSpec;
use crate::models::ast::{ResumeEntry, ResumeHeader, ResumeSection};

/// Separator between items on the contact and subheader lines.
pub const INLINE_SEPARATOR: &str = " | ";
/// Line height of the name, as a multiple of the header font size.
pub const NAME_LINE_HEIGHT: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub enum ContactItem<'a> {
    Text(&'a str),
    Link { label: &'a str, url: &'a str },
}

impl ContactItem<'_> {
    pub fn text(&self) -> &str {
        match self {
            ContactItem::Text(text) => *text,
            ContactItem::Link { label, .. } => *label,
        }
    }
}

/// Contact items in display order: location, email, phone, then links.
pub fn contact_items(header: &ResumeHeader) -> Vec<ContactItem<'_>> {
    let mut items: Vec<ContactItem<'_>> = [&header.location, &header.email, &header.phone]
        .into_iter()
        .flatten()
        .map(|s| ContactItem::Text(s.as_str()))
        .collect();
    items.extend(header.links.iter().map(|l| ContactItem::Link {
        label: &l.label,
        url: &l.url,
    }));
    items
}

/// Contact lines that fit in the header reserve below the name.
pub fn contact_line_budget(page: &PageSpec) -> usize {
    let free = HEIGHT_MODEL.header_height - page.header_font_size * NAME_LINE_HEIGHT;
    (free / page.line_height_pt()).floor().max(0.0) as usize
}

/// Packs the contact items into lines of at most `chars_per_line` characters, counting
/// separators. An item wider than a line gets a line of its own. Items past the header's
/// line budget are not shown.
pub fn contact_lines<'a>(header: &'a ResumeHeader, page: &PageSpec) -> Vec<Vec<ContactItem<'a>>> {
    let max_chars = HEIGHT_MODEL.chars_per_line;
    let separator = INLINE_SEPARATOR.chars().count();
    let budget = contact_line_budget(page);

    let mut lines: Vec<Vec<ContactItem<'a>>> = Vec::new();
    let mut width = 0usize;
    for item in contact_items(header) {
        let len = item.text().chars().count();
        if let Some(line) = lines
            .last_mut()
            .filter(|_| width + separator + len <= max_chars)
        {
            width += separator + len;
            line.push(item);
            continue;
        }
        if lines.len() == budget {
            break;
        }
        width = len;
        lines.push(vec![item]);
    }
    lines
}

/// What goes below an entry's heading. Text is already broken into display lines.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryBody {
    /// Skills branch: "Category: a, b, c", wrapped.
    SkillLine(Vec<String>),
    /// One element per bullet, each holding that bullet's lines.
    Bullets(Vec<Vec<String>>),
    /// The description's lines, each paragraph wrapped in turn.
    Description(Vec<String>),
    Empty,
}

/// Everything a renderer needs to draw one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView<'a> {
    pub index: usize,
    /// Title shown in the heading row; `None` in the skills branch, where the
    /// category leads the skill line instead.
    pub heading: Option<&'a str>,
    pub date: Option<&'a str>,
    /// Shown only when a company or location is present.
    pub subheader: Option<String>,
    pub body: EntryBody,
    /// The entry's displayed title, used for outlines.
    pub display_title: &'a str,
}

impl<'a> EntryView<'a> {
    pub fn new(section: &ResumeSection, index: usize, entry: &'a ResumeEntry) -> Self {
        let display_title = entry.title.as_deref().unwrap_or_default();

        if section.is_skills() {
            let lines = break_lines(&entry.skill_line(), HEIGHT_MODEL.chars_per_line);
            return EntryView {
                index,
                heading: None,
                date: None,
                subheader: None,
                body: EntryBody::SkillLine(lines),
                display_title,
            };
        }

        EntryView {
            index,
            heading: entry.title.as_deref(),
            date: entry.date.as_deref(),
            subheader: subheader(entry),
            body: body(entry),
            display_title,
        }
    }

    /// The heading row (title left, date right) is drawn when either side has content.
    pub fn has_heading_row(&self) -> bool {
        self.heading.is_some() || self.date.is_some()
    }
}

fn subheader(entry: &ResumeEntry) -> Option<String> {
    if entry.company.is_none() && entry.location.is_none() {
        return None;
    }
    let parts: Vec<&str> = [&entry.company, &entry.location]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect();
    Some(parts.join(INLINE_SEPARATOR))
}

fn body(entry: &ResumeEntry) -> EntryBody {
    let chars = HEIGHT_MODEL.chars_per_line;
    if !entry.bullets.is_empty() {
        let bullets = entry
            .bullets
            .iter()
            .map(|b| break_lines(b, chars))
            .filter(|lines| !lines.is_empty())
            .collect();
        return EntryBody::Bullets(bullets);
    }
    match entry.description.as_deref() {
        Some(description) => EntryBody::Description(
            description
                .lines()
                .flat_map(|paragraph| break_lines(paragraph, chars))
                .collect(),
        ),
        None => EntryBody::Empty,
    }
}

/// Entry views for a section, in layout order.
pub fn entry_views(section: &ResumeSection) -> impl Iterator<Item = EntryView<'_>> {
    section
        .entries
        .iter()
        .enumerate()
        .map(move |(index, entry)| EntryView::new(section, index, entry))
}

/// Display lines for `text` at `max_chars` characters per line.
///
/// Word wrap first. When word boundaries would cost more lines than
/// `ceil(chars / max_chars)`, the text is cut into fixed `max_chars` chunks instead,
/// so the result never outgrows `HeightModel::bullet_lines`.
pub fn break_lines(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let budget = text.chars().count().div_ceil(max_chars);
    let wrapped = wrap_words(text, max_chars);
    if wrapped.len() <= budget {
        return wrapped;
    }

    let chars: Vec<char> = text
        .chars()
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    chars
        .chunks(max_chars)
        .map(|chunk| chunk.iter().collect::<String>().trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Greedy word wrap. Words longer than a line are split.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        if word.is_empty() {
            continue;
        }

        let needed = if current_len == 0 { word.len() } else { current_len + 1 + word.len() };
        if needed > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word.iter());
        current_len += word.len();
    }

    if current_len > 0 {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rules::default_rules;
    use crate::models::ast::{LinkType, ResumeLink};

    fn section(id: &str, entries: Vec<ResumeEntry>) -> ResumeSection {
        ResumeSection {
            id: id.to_string(),
            title: id.to_string(),
            entries,
        }
    }

    #[test]
    fn test_skill_line_joins_items() {
        let entry = ResumeEntry {
            title: Some("Languages".to_string()),
            bullets: vec!["Go".to_string(), "Rust".to_string()],
            ..Default::default()
        };
        assert_eq!(entry.skill_line(), "Languages: Go, Rust");
    }

    #[test]
    fn test_skills_branch_keyed_on_section_id() {
        let entry = ResumeEntry {
            title: Some("Skills".to_string()),
            bullets: vec!["Go".to_string()],
            ..Default::default()
        };
        let skills = section("skills", vec![entry.clone()]);
        let view = EntryView::new(&skills, 0, &skills.entries[0]);
        assert_eq!(view.body, EntryBody::SkillLine(vec!["Skills: Go".to_string()]));
        assert!(view.heading.is_none());

        // Same shape elsewhere renders as bullets.
        let other = section("projects", vec![entry]);
        let view = EntryView::new(&other, 0, &other.entries[0]);
        assert!(matches!(view.body, EntryBody::Bullets(_)));
        assert_eq!(view.heading, Some("Skills"));
    }

    #[test]
    fn test_subheader_requires_company_or_location() {
        let plain = ResumeEntry {
            title: Some("Eng".to_string()),
            role: Some("Eng".to_string()),
            ..Default::default()
        };
        let s = section("experience", vec![plain]);
        assert!(EntryView::new(&s, 0, &s.entries[0]).subheader.is_none());

        let located = ResumeEntry {
            location: Some("Berlin".to_string()),
            ..Default::default()
        };
        let s = section("experience", vec![located]);
        assert_eq!(
            EntryView::new(&s, 0, &s.entries[0]).subheader.as_deref(),
            Some("Berlin")
        );

        let both = ResumeEntry {
            company: Some("Acme".to_string()),
            location: Some("Berlin".to_string()),
            ..Default::default()
        };
        let s = section("experience", vec![both]);
        assert_eq!(
            EntryView::new(&s, 0, &s.entries[0]).subheader.as_deref(),
            Some("Acme | Berlin")
        );
    }

    #[test]
    fn test_description_used_only_without_bullets() {
        let with_both = ResumeEntry {
            description: Some("Prose".to_string()),
            bullets: vec!["Point".to_string()],
            ..Default::default()
        };
        let s = section("projects", vec![with_both]);
        assert!(matches!(EntryView::new(&s, 0, &s.entries[0]).body, EntryBody::Bullets(_)));

        let description_only = ResumeEntry {
            description: Some("Line one\nLine two".to_string()),
            ..Default::default()
        };
        let s = section("projects", vec![description_only]);
        assert_eq!(
            EntryView::new(&s, 0, &s.entries[0]).body,
            EntryBody::Description(vec!["Line one".to_string(), "Line two".to_string()])
        );

        let s = section("projects", vec![ResumeEntry::default()]);
        let view = EntryView::new(&s, 0, &s.entries[0]);
        assert_eq!(view.body, EntryBody::Empty);
        assert_eq!(view.display_title, "");
    }

    #[test]
    fn test_contact_items_order() {
        let header = ResumeHeader {
            name: "Ada".to_string(),
            location: Some("London".to_string()),
            email: Some("ada@a.dev".to_string()),
            phone: None,
            links: vec![ResumeLink {
                link_type: LinkType::Github,
                url: "https://github.com/ada".to_string(),
                label: "github.com/ada".to_string(),
            }],
        };
        assert_eq!(
            contact_items(&header),
            vec![
                ContactItem::Text("London"),
                ContactItem::Text("ada@a.dev"),
                ContactItem::Link {
                    label: "github.com/ada",
                    url: "https://github.com/ada"
                },
            ]
        );
    }

    fn page() -> PageSpec {
        PageSpec::from_rules(&default_rules())
    }

    fn header_with_links(count: usize) -> ResumeHeader {
        ResumeHeader {
            name: "Ada".to_string(),
            location: Some("London".to_string()),
            email: Some("ada@a.dev".to_string()),
            phone: None,
            links: (0..count)
                .map(|i| ResumeLink {
                    link_type: LinkType::Portfolio,
                    url: format!("https://site{i}.example/portfolio"),
                    label: format!("site{i}.example/portfolio"),
                })
                .collect(),
        }
    }

    #[test]
    fn test_break_lines_respects_width() {
        let text = "alpha beta gamma delta epsilon";
        let lines = break_lines(text, 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta", "epsilon"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 11));
    }

    #[test]
    fn test_break_lines_splits_long_words() {
        let lines = break_lines(&"x".repeat(25), 10);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "xxxxx");
    }

    #[test]
    fn test_break_lines_empty() {
        assert!(break_lines("   ", 10).is_empty());
        assert!(break_lines("", 10).is_empty());
    }

    #[test]
    fn test_break_lines_falls_back_to_fixed_chunks() {
        // Three 46-char words: 140 chars is 2 model lines, but only one word fits per line.
        let word = "a".repeat(46);
        let text = [word.as_str(); 3].join(" ");
        assert_eq!(wrap_words(&text, 90).len(), 3);

        let lines = break_lines(&text, 90);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.len(), HEIGHT_MODEL.bullet_lines(&text));
        assert!(lines.iter().all(|l| l.chars().count() <= 90));
        // Nothing is lost: the chunks are the original characters in order.
        assert_eq!(lines.concat().replace(' ', ""), text.replace(' ', ""));
    }

    #[test]
    fn test_break_lines_never_exceeds_model_lines() {
        let mut state = 0x2545_f491_4f6c_dd1d_u64;
        let mut next = |bound: u64| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % bound
        };
        for _ in 0..500 {
            let words = next(12) as usize;
            let text: Vec<String> = (0..words).map(|_| "w".repeat(1 + next(70) as usize)).collect();
            let text = text.join(" ");
            let lines = break_lines(&text, HEIGHT_MODEL.chars_per_line);
            assert!(
                lines.len() <= HEIGHT_MODEL.bullet_lines(&text),
                "{} lines for {text:?}",
                lines.len()
            );
            assert!(lines.iter().all(|l| l.chars().count() <= HEIGHT_MODEL.chars_per_line));
        }
    }

    #[test]
    fn test_empty_bullets_have_no_lines() {
        let entry = ResumeEntry {
            bullets: vec!["".to_string(), "kept".to_string()],
            ..Default::default()
        };
        let s = section("projects", vec![entry]);
        assert_eq!(
            EntryView::new(&s, 0, &s.entries[0]).body,
            EntryBody::Bullets(vec![vec!["kept".to_string()]])
        );
    }

    #[test]
    fn test_contact_lines_pack_within_width() {
        let page = page();
        assert_eq!(contact_line_budget(&page), 4);

        let header = header_with_links(3);
        let lines = contact_lines(&header, &page);
        assert_eq!(lines.len(), 2);
        for line in &lines {
            let width: usize = line.iter().map(|i| i.text().chars().count()).sum::<usize>()
                + (line.len() - 1) * INLINE_SEPARATOR.chars().count();
            assert!(width <= HEIGHT_MODEL.chars_per_line, "{line:?}");
        }
        let shown: Vec<&str> = lines.iter().flatten().map(|i| i.text()).collect();
        assert_eq!(shown.first(), Some(&"London"));
        assert_eq!(shown.len(), 5);
    }

    #[test]
    fn test_contact_lines_stop_at_header_budget() {
        let page = page();
        let header = header_with_links(40);
        let lines = contact_lines(&header, &page);
        assert_eq!(lines.len(), contact_line_budget(&page));
        let name_band = page.header_font_size * NAME_LINE_HEIGHT;
        assert!(name_band + lines.len() as f64 * page.line_height_pt() <= HEIGHT_MODEL.header_height);
    }
}

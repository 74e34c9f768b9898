use serde::{Deserialize, Serialize};

/// Stable section ids. These are the join keys for `TemplateRules` and are never
/// derived from a display title.
pub const SECTION_EXPERIENCE: &str = "experience";
pub const SECTION_PROJECTS: &str = "projects";
pub const SECTION_EDUCATION: &str = "education";
pub const SECTION_SKILLS: &str = "skills";

/// Separator between skill items on a skill line.
pub const SKILL_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkType {
    Linkedin,
    Github,
    Portfolio,
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeLink {
    pub link_type: LinkType,
    /// Always carries a scheme; normalized once by the mapper.
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeHeader {
    pub name: String,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub links: Vec<ResumeLink>,
}

/// One unit of content within a section.
///
/// In the `skills` section `title` holds the category name and `bullets` holds the
/// skill items. Renderers branch on the section id, never on the entry's shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeEntry {
    pub title: Option<String>,
    pub role: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    /// Pre-formatted and range-joined, e.g. "Jan 2020 – Present".
    pub date: Option<String>,
    pub description: Option<String>,
    pub bullets: Vec<String>,
    pub tech: Vec<String>,
}

impl ResumeEntry {
    /// The skills rendering: `"{category}: a, b, c"`, or just the items without a category.
    pub fn skill_line(&self) -> String {
        let items = self.bullets.join(SKILL_SEPARATOR);
        match self.title.as_deref() {
            Some(title) => format!("{title}: {items}"),
            None => items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeSection {
    pub id: String,
    pub title: String,
    pub entries: Vec<ResumeEntry>,
}

impl ResumeSection {
    pub fn is_skills(&self) -> bool {
        self.id == SECTION_SKILLS
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeAst {
    pub header: ResumeHeader,
    pub sections: Vec<ResumeSection>,
}

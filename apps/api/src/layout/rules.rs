//! Template rules: page geometry, typography, section ordering and content limits.
//!
//! Rules are immutable inputs to the resolver. The catalog in `templates.rs` builds them
//! once at startup and shares them behind an `Arc`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::ast::{SECTION_EDUCATION, SECTION_EXPERIENCE, SECTION_PROJECTS, SECTION_SKILLS};

pub const POINTS_PER_INCH: f64 = 72.0;

/// Entry cap applied to sections with no entry in `max_entries_per_section`.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Page
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSize {
    /// US letter, 8.5" × 11".
    Letter,
    /// ISO A4, 210mm × 297mm.
    A4,
}

impl PageSize {
    pub fn width_pt(self) -> f64 {
        match self {
            PageSize::Letter => 612.0,
            PageSize::A4 => 595.0,
        }
    }

    pub fn height_pt(self) -> f64 {
        match self {
            PageSize::Letter => 792.0,
            PageSize::A4 => 842.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRules {
    pub size: PageSize,
    /// Only 1 is honored; the resolver never paginates.
    pub max_pages: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Typography {
    pub base_font_size: f64,
    /// Multiplier applied to `base_font_size` to get one line's height.
    pub line_height: f64,
    pub header_font_size: f64,
}

impl Typography {
    pub fn line_height_pt(&self) -> f64 {
        self.base_font_size * self.line_height
    }
}

/// Margins in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(inches: f64) -> Self {
        Margins {
            top: inches,
            right: inches,
            bottom: inches,
            left: inches,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRules {
    pub columns: u8,
    pub section_order: Vec<String>,
    pub margins: Margins,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Limits {
    pub max_bullets_per_entry: usize,
    pub max_entries_per_section: BTreeMap<String, usize>,
}

impl Limits {
    pub fn max_entries_for(&self, section_id: &str) -> usize {
        self.max_entries_per_section
            .get(section_id)
            .copied()
            .unwrap_or(DEFAULT_MAX_ENTRIES)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRules {
    pub page: PageRules,
    pub typography: Typography,
    pub layout: LayoutRules,
    pub limits: Limits,
}

impl TemplateRules {
    /// Page height minus the top and bottom margins, in points.
    pub fn content_height_pt(&self) -> f64 {
        let margins = &self.layout.margins;
        self.page.size.height_pt() - (margins.top + margins.bottom) * POINTS_PER_INCH
    }

    /// Position of `section_id` in `section_order`, if listed.
    pub fn section_rank(&self, section_id: &str) -> Option<usize> {
        self.layout
            .section_order
            .iter()
            .position(|id| id == section_id)
    }
}

/// Returns the default rule set.
///
/// US letter, 0.5" margins all sides, 10pt base font at 1.4 line height, one column,
/// section order experience → projects → skills → education.
pub fn default_rules() -> TemplateRules {
    let max_entries_per_section = [
        (SECTION_EXPERIENCE, 4),
        (SECTION_PROJECTS, 3),
        (SECTION_EDUCATION, 2),
        (SECTION_SKILLS, 1),
    ]
    .into_iter()
    .map(|(id, cap)| (id.to_string(), cap))
    .collect();

    TemplateRules {
        page: PageRules {
            size: PageSize::Letter,
            max_pages: 1,
        },
        typography: Typography {
            base_font_size: 10.0,
            line_height: 1.4,
            header_font_size: 18.0,
        },
        layout: LayoutRules {
            columns: 1,
            section_order: [
                SECTION_EXPERIENCE,
                SECTION_PROJECTS,
                SECTION_SKILLS,
                SECTION_EDUCATION,
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            margins: Margins::uniform(0.5),
        },
        limits: Limits {
            max_bullets_per_entry: 4,
            max_entries_per_section,
        },
    }
}

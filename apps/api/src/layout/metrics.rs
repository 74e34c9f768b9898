//! Calibrated height model for the one-page resolver.
//!
//! This is an intentional approximation: no glyph metrics, no real line breaking.
//! Every element costs a fixed number of points, and text wraps at a fixed
//! characters-per-line count. Both renderers break lines with `view::break_lines`,
//! which never yields more lines than `bullet_lines` charges. The constants live in one table so they can be
//! recalibrated without touching the resolver's control flow.

use serde::{Deserialize, Serialize};

use crate::layout::rules::Typography;
use crate::models::ast::{ResumeEntry, ResumeSection};

/// Fixed per-element costs, in points unless noted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeightModel {
    /// Reserved for the header block before any section is placed.
    pub header_height: f64,
    /// Charged once per visited section.
    pub section_title_height: f64,
    /// Space after each entry.
    pub entry_margin: f64,
    /// Characters that fit on one bullet line (unitless).
    pub chars_per_line: usize,
}

pub const HEIGHT_MODEL: HeightModel = HeightModel {
    header_height: 80.0,
    section_title_height: 25.0,
    entry_margin: 10.0,
    chars_per_line: 90,
};

impl HeightModel {
    /// Whole lines a bullet occupies: `ceil(chars / chars_per_line)`. Empty text takes none.
    pub fn bullet_lines(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_line)
    }

    /// Lines the entry body occupies: the bullets when there are any, otherwise the
    /// description, one wrapped paragraph per line.
    fn body_lines(&self, entry: &ResumeEntry) -> usize {
        if !entry.bullets.is_empty() {
            return entry.bullets.iter().map(|b| self.bullet_lines(b)).sum();
        }
        entry
            .description
            .as_deref()
            .map(|d| d.lines().map(|l| self.bullet_lines(l)).sum())
            .unwrap_or(0)
    }

    /// Estimated height of one entry.
    ///
    /// One title line, one subheader line when a company, role or location is present,
    /// the wrapped body lines, and the trailing entry margin. Tech tags are not drawn
    /// and not measured.
    pub fn entry_height(&self, entry: &ResumeEntry, typography: &Typography) -> f64 {
        let line = typography.line_height_pt();
        let has_subheader =
            entry.company.is_some() || entry.role.is_some() || entry.location.is_some();
        let lines = 1 + usize::from(has_subheader) + self.body_lines(entry);

        lines as f64 * line + self.entry_margin
    }

    /// Height of `entry` as placed in `section`. Skills entries are drawn as one joined
    /// skill line, so they are charged whichever is larger: the generic estimate or the
    /// wrapped skill line.
    pub fn entry_height_in(
        &self,
        section: &ResumeSection,
        entry: &ResumeEntry,
        typography: &Typography,
    ) -> f64 {
        let generic = self.entry_height(entry, typography);
        if !section.is_skills() {
            return generic;
        }
        let skill_lines = self.bullet_lines(&entry.skill_line());
        let drawn = skill_lines as f64 * typography.line_height_pt() + self.entry_margin;
        generic.max(drawn)
    }
}

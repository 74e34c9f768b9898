//! Header link normalization.

use crate::models::ast::{LinkType, ResumeLink};
use crate::models::legacy::LegacyLink;

/// Prefixes `https://` onto URLs that carry no scheme.
///
/// Idempotent: a URL that already has `scheme://`, `mailto:` or `tel:` is returned as-is
/// (trimmed), so running it through the mapper twice never double-prefixes.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    if has_scheme(url) {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

fn has_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return true;
    }
    match url.find("://") {
        Some(idx) if idx > 0 => url[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Parses the legacy `type` string; unknown strings fall back to host inference.
pub fn parse_link_type(raw: Option<&str>, url: &str) -> LinkType {
    match raw.map(|s| s.trim().to_ascii_lowercase()).as_deref() {
        Some("linkedin") => LinkType::Linkedin,
        Some("github") => LinkType::Github,
        Some("portfolio") | Some("website") => LinkType::Portfolio,
        Some("other") => LinkType::Other,
        _ => infer_link_type(url),
    }
}

fn infer_link_type(url: &str) -> LinkType {
    let lower = url.to_ascii_lowercase();
    if lower.contains("linkedin.com") {
        LinkType::Linkedin
    } else if lower.contains("github.com") {
        LinkType::Github
    } else {
        LinkType::Other
    }
}

/// Display form of a URL: scheme and trailing slash stripped.
pub fn display_label(url: &str) -> String {
    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url
            .strip_prefix("mailto:")
            .or_else(|| url.strip_prefix("tel:"))
            .unwrap_or(url),
    };
    without_scheme.trim_end_matches('/').to_string()
}

/// Maps one legacy link. Links without a usable URL are dropped.
pub fn map_link(link: &LegacyLink) -> Option<ResumeLink> {
    let raw = link.url.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    let url = normalize_url(raw);
    let label = link
        .label
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| display_label(&url));

    Some(ResumeLink {
        link_type: parse_link_type(link.link_type.as_deref(), &url),
        url,
        label,
    })
}

/// Builds a link from one of the shorthand header fields (`linkedin`, `github`, `portfolio`).
pub fn shorthand_link(value: Option<&str>, link_type: LinkType) -> Option<ResumeLink> {
    let raw = value.map(str::trim).filter(|v| !v.is_empty())?;
    let url = normalize_url(raw);
    Some(ResumeLink {
        link_type,
        label: display_label(&url),
        url,
    })
}

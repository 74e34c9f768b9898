//! Loosely-typed résumé record as delivered by the ingestion collaborators.
//!
//! Every field is optional and arrays may contain `null` members. Field-precedence rules
//! (`role ?? title`, `startDate ?? start`, ...) are NOT applied here; they belong to the
//! mapper in `crate::canonical`.
//!
//! Deserialization never rejects a record over a badly shaped field. A lone value where a
//! list is expected becomes a one-element list, numbers in text fields are stringified,
//! and list members of the wrong shape become `None` and are filtered like `null`s.

use serde::{Deserialize, Serialize};

mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::TextOrLines;

    /// Strings pass through and numbers are stringified. Anything else is absent.
    pub fn scalar_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn one_or_many(value: Value) -> Option<Vec<Value>> {
        match value {
            Value::Null => None,
            Value::Array(items) => Some(items),
            single => Some(vec![single]),
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(scalar_text(Value::deserialize(deserializer)?))
    }

    pub fn text_list<'de, D>(deserializer: D) -> Result<Option<Vec<Option<String>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = one_or_many(Value::deserialize(deserializer)?);
        Ok(items.map(|items| items.into_iter().map(scalar_text).collect()))
    }

    pub fn record_list<'de, D, T>(deserializer: D) -> Result<Option<Vec<Option<T>>>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        let items = one_or_many(Value::deserialize(deserializer)?);
        Ok(items.map(|items| {
            items
                .into_iter()
                .map(|item| match item {
                    Value::Null => None,
                    other => serde_json::from_value(other).ok(),
                })
                .collect()
        }))
    }

    pub fn text_or_lines<'de, D>(deserializer: D) -> Result<Option<TextOrLines>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::Array(lines) => Some(TextOrLines::Lines(
                lines.into_iter().map(scalar_text).collect(),
            )),
            other => scalar_text(other).map(TextOrLines::Text),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyResume {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub email: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub phone: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::record_list")]
    pub links: Option<Vec<Option<LegacyLink>>>,
    #[serde(deserialize_with = "lenient::text")]
    pub linkedin: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub github: Option<String>,
    #[serde(alias = "website", deserialize_with = "lenient::text")]
    pub portfolio: Option<String>,
    #[serde(deserialize_with = "lenient::record_list")]
    pub experience: Option<Vec<Option<LegacyExperience>>>,
    #[serde(deserialize_with = "lenient::record_list")]
    pub projects: Option<Vec<Option<LegacyProject>>>,
    #[serde(deserialize_with = "lenient::record_list")]
    pub education: Option<Vec<Option<LegacyEducation>>>,
    #[serde(deserialize_with = "lenient::record_list")]
    pub skills: Option<Vec<Option<LegacySkill>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyLink {
    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub link_type: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub url: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub label: Option<String>,
}

/// `description` arrives either as one string or as a list of lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrLines {
    Text(String),
    Lines(Vec<Option<String>>),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyExperience {
    #[serde(deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub start: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub end: Option<String>,
    #[serde(deserialize_with = "lenient::text_or_lines")]
    pub description: Option<TextOrLines>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub bullets: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyProject {
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub role: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub company: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub start: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub end: Option<String>,
    #[serde(deserialize_with = "lenient::text_or_lines")]
    pub description: Option<TextOrLines>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub bullets: Option<Vec<Option<String>>>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub tech: Option<Vec<Option<String>>>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub technologies: Option<Vec<Option<String>>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyEducation {
    #[serde(deserialize_with = "lenient::text")]
    pub degree: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub institution: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub school: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub location: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub start: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub end_date: Option<String>,
    #[serde(deserialize_with = "lenient::text")]
    pub end: Option<String>,
    #[serde(deserialize_with = "lenient::text_or_lines")]
    pub description: Option<TextOrLines>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub bullets: Option<Vec<Option<String>>>,
}

/// One member of the `skills` array: a `{category, items}` group or a bare skill name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacySkill {
    Category(SkillCategory),
    Name(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    #[serde(deserialize_with = "lenient::text")]
    pub category: Option<String>,
    #[serde(deserialize_with = "lenient::text_list")]
    pub items: Option<Vec<Option<String>>>,
}

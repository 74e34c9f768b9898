use std::collections::BTreeMap;
use std::sync::Arc;

use crate::layout::rules::{default_rules, PageSize, TemplateRules};

pub const DEFAULT_TEMPLATE: &str = "classic";

/// Built-in template rule sets, keyed by template name.
///
/// Built once at startup; rules are handed out as `Arc`s and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: BTreeMap<String, Arc<TemplateRules>>,
}

impl TemplateCatalog {
    pub fn builtin() -> Self {
        let classic = default_rules();

        let mut classic_a4 = default_rules();
        classic_a4.page.size = PageSize::A4;

        let templates = [(DEFAULT_TEMPLATE, classic), ("classic-a4", classic_a4)]
            .into_iter()
            .map(|(name, rules)| (name.to_string(), Arc::new(rules)))
            .collect();

        TemplateCatalog { templates }
    }

    pub fn get(&self, name: &str) -> Option<Arc<TemplateRules>> {
        self.templates.get(name).cloned()
    }

    /// Template names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }
}

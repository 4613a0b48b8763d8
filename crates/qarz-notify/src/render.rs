//! Template rendering
//!
//! Replaces `{{key}}` placeholders with values from a variable map. Keys
//! with no value are left verbatim; rendering never fails.

use once_cell::sync::Lazy;
use qarz_core::NotificationTemplate;
use regex::{Captures, Regex};
use std::collections::BTreeMap;

/// Template variables. Values are already formatted for display.
pub type Variables = BTreeMap<String, String>;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^{}]+)\}\}").expect("Invalid placeholder regex"));

/// Rendered title and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub title: String,
    pub body: String,
}

/// Render a single pattern
pub fn render_str(pattern: &str, variables: &Variables) -> String {
    PLACEHOLDER
        .replace_all(pattern, |caps: &Captures| match variables.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Render a template's title and message
pub fn render(template: &NotificationTemplate, variables: &Variables) -> Rendered {
    Rendered {
        title: render_str(&template.title_template, variables),
        body: render_str(&template.message_template, variables),
    }
}

/// Build a variable map from key/value pairs
pub fn variables<const N: usize>(pairs: [(&str, String); N]) -> Variables {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

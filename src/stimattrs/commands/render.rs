use crate::cache::HasStimulusAttrs;
use crate::commands::{CmdMessage, CmdResult};
use crate::component::AttributeMap;
use crate::config::StimattrsConfig;
use crate::error::Result;
use crate::manifest::Manifest;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

pub fn run(manifest_path: &Path, config: &StimattrsConfig, format: OutputFormat) -> Result<CmdResult> {
    let manifest = Manifest::load(manifest_path)?;
    let component = manifest.component(config)?;
    let attributes = component.stimulus_attributes()?;

    let rendered = match format {
        OutputFormat::Html => to_html_attributes(&attributes, &config.attribute_prefix),
        OutputFormat::Json => serde_json::to_string_pretty(&attributes)?,
    };

    let mut result = CmdResult::default().with_rendered(rendered);
    if attributes.is_empty() {
        result.add_message(CmdMessage::warning(format!(
            "{} produced no attributes",
            manifest_path.display()
        )));
    }
    Ok(result)
}

/// `key="value"` pairs, prefixed and escaped, separated by single spaces.
pub fn to_html_attributes(attributes: &AttributeMap, prefix: &str) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!("{}{}=\"{}\"", prefix, key, escape_attribute(value)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

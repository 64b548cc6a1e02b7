use crate::cache::HasStimulusAttrs;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::StimattrsConfig;
use crate::error::Result;
use crate::manifest::Manifest;
use std::path::Path;

/// Compile the manifest and run its chain once, reporting instead of failing.
///
/// Only an unreadable or unparsable manifest is an `Err`; declaration and
/// evaluation problems come back as error messages.
pub fn run(manifest_path: &Path, config: &StimattrsConfig) -> Result<CmdResult> {
    let manifest = Manifest::load(manifest_path)?;
    let mut result = CmdResult::default();

    let component = match manifest.component(config) {
        Ok(component) => component,
        Err(e) => {
            result.add_message(CmdMessage::error(e.to_string()));
            return Ok(result);
        }
    };

    match component.stimulus_attributes() {
        Ok(attributes) => {
            result.add_message(CmdMessage::success(format!(
                "{}: {} rules, {} attributes",
                manifest_path.display(),
                component.rule_count(),
                attributes.len()
            )));
        }
        Err(e) => result.add_message(CmdMessage::error(e.to_string())),
    }

    Ok(result)
}

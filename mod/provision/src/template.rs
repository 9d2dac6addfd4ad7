//! Template dispatch.
//!
//! The engine itself is a black box behind [`TemplateEngine`]; the
//! pipeline only cares that "no such template" is distinguishable from
//! a render-time fault.

use std::path::Path;

use handlebars::{DirectorySourceOptions, Handlebars};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template {0} not found")]
    NotFound(String),

    #[error("{0}")]
    Render(String),
}

pub trait TemplateEngine: Send + Sync {
    /// Render the named template against a JSON context.
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, TemplateError>;
}

/// Handlebars templates loaded from a directory tree at startup.
///
/// A file `templates/cisco/7960.xml` registers as `cisco/7960`, which is
/// exactly the `{manufacturer}/{model}` dispatch key the pipeline
/// builds. The registry is immutable after load.
pub struct DirTemplates {
    registry: Handlebars<'static>,
}

impl DirTemplates {
    pub fn load(dir: &Path) -> Result<Self, TemplateError> {
        let mut registry = Handlebars::new();
        let mut options = DirectorySourceOptions::default();
        options.tpl_extension = ".xml".to_owned();
        registry
            .register_templates_directory(dir, options)
            .map_err(|e| TemplateError::Render(format!("loading {}: {e}", dir.display())))?;
        tracing::info!(
            dir = %dir.display(),
            count = registry.get_templates().len(),
            "templates loaded"
        );
        Ok(Self { registry })
    }
}

impl TemplateEngine for DirTemplates {
    fn render(&self, name: &str, context: &serde_json::Value) -> Result<String, TemplateError> {
        if !self.registry.has_template(name) {
            return Err(TemplateError::NotFound(name.to_owned()));
        }
        self.registry
            .render(name, context)
            .map_err(|e| TemplateError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn template_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("cisco")).unwrap();
        fs::write(
            dir.path().join("cisco/7960.xml"),
            "<device><user>{{device.name}}</user><proxy>{{config.sip_outbound_proxy}}</proxy></device>",
        )
        .unwrap();
        dir
    }

    #[test]
    fn renders_registered_template() {
        let dir = template_dir();
        let engine = DirTemplates::load(dir.path()).unwrap();
        let body = engine
            .render(
                "cisco/7960",
                &serde_json::json!({
                    "device": { "name": "lobby" },
                    "config": { "sip_outbound_proxy": "proxy.example.com" },
                }),
            )
            .unwrap();
        assert_eq!(
            body,
            "<device><user>lobby</user><proxy>proxy.example.com</proxy></device>"
        );
    }

    #[test]
    fn missing_template_is_not_found() {
        let dir = template_dir();
        let engine = DirTemplates::load(dir.path()).unwrap();
        let err = engine.render("polycom/vvx500", &serde_json::json!({})).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(name) if name == "polycom/vvx500"));
    }
}

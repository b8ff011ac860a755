//! Handlebars-backed template renderer.
//!
//! Templates are registered once up front; rendering takes `&self` only, so
//! one renderer is shared by every render worker.

use handlebars::{Handlebars, handlebars_helper, no_escape};
use serde_json::Value;
use tracing::{instrument, trace};

use weft_core::{
    application::{ApplicationError, ports::TemplateRenderer},
    domain::naming::{
        to_camel_case, to_kebab_case, to_pascal_case, to_screaming_snake_case, to_snake_case,
    },
    error::WeftResult,
};

handlebars_helper!(snake: |s: str| to_snake_case(s));
handlebars_helper!(kebab: |s: str| to_kebab_case(s));
handlebars_helper!(pascal: |s: str| to_pascal_case(s));
handlebars_helper!(camel: |s: str| to_camel_case(s));
handlebars_helper!(screaming: |s: str| to_screaming_snake_case(s));
handlebars_helper!(replace: |s: str, from: str, to: str| s.replace(from, to));

/// Renderer over a [`Handlebars`] registry.
///
/// Output is source code, so HTML escaping is turned off.
pub struct HandlebarsRenderer {
    registry: Handlebars<'static>,
}

impl HandlebarsRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        registry.register_helper("snake", Box::new(snake));
        registry.register_helper("kebab", Box::new(kebab));
        registry.register_helper("pascal", Box::new(pascal));
        registry.register_helper("camel", Box::new(camel));
        registry.register_helper("screaming", Box::new(screaming));
        registry.register_helper("replace", Box::new(replace));
        Self { registry }
    }

    /// Register a named template.
    ///
    /// # Errors
    ///
    /// `RenderingFailed` when the source does not parse.
    pub fn register(&mut self, name: &str, source: &str) -> WeftResult<()> {
        self.registry
            .register_template_string(name, source)
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    template: name.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    /// Builder form of [`register`](Self::register).
    pub fn with_template(mut self, name: &str, source: &str) -> WeftResult<Self> {
        self.register(name, source)?;
        Ok(self)
    }

    /// Registered template names, sorted.
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .registry
            .get_templates()
            .keys()
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        names
    }
}

impl Default for HandlebarsRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer for HandlebarsRenderer {
    #[instrument(skip(self, context))]
    fn render(&self, template: &str, context: &Value) -> WeftResult<String> {
        if !self.registry.has_template(template) {
            return Err(ApplicationError::TemplateMissing {
                name: template.to_string(),
            }
            .into());
        }

        let out = self.registry.render(template, context).map_err(|e| {
            ApplicationError::RenderingFailed {
                template: template.to_string(),
                reason: e.to_string(),
            }
        })?;
        trace!(bytes = out.len(), "rendered");
        Ok(out)
    }

    fn render_inline(&self, source: &str, context: &Value) -> WeftResult<String> {
        self.registry
            .render_template(source, context)
            .map_err(|e| {
                ApplicationError::RenderingFailed {
                    template: source.to_string(),
                    reason: e.to_string(),
                }
                .into()
            })
    }

    fn has_template(&self, name: &str) -> bool {
        self.registry.has_template(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use weft_core::error::WeftError;

    #[test]
    fn renders_registered_template_without_escaping() {
        let renderer = HandlebarsRenderer::new()
            .with_template("t", "fn {{snake name}}() -> {{ty}}")
            .unwrap();

        let out = renderer
            .render("t", &json!({ "name": "ListAll", "ty": "Vec<&str>" }))
            .unwrap();
        assert_eq!(out, "fn list_all() -> Vec<&str>");
    }

    #[test]
    fn inline_paths_use_case_helpers() {
        let renderer = HandlebarsRenderer::new();
        let out = renderer
            .render_inline("src/{{kebab name}}/{{pascal name}}.kt", &json!({ "name": "user_profile" }))
            .unwrap();
        assert_eq!(out, "src/user-profile/UserProfile.kt");
    }

    #[test]
    fn replace_helper_mangles_packages() {
        let out = HandlebarsRenderer::new()
            .render_inline("Java_{{replace pkg \".\" \"_\"}}", &json!({ "pkg": "app.mobile" }))
            .unwrap();
        assert_eq!(out, "Java_app_mobile");
    }

    #[test]
    fn unknown_template_is_reported() {
        let err = HandlebarsRenderer::new()
            .render("missing", &json!({}))
            .unwrap_err();
        assert!(matches!(
            err,
            WeftError::Application(ApplicationError::TemplateMissing { .. })
        ));
    }

    #[test]
    fn bad_template_source_is_rejected() {
        let err = HandlebarsRenderer::new()
            .with_template("broken", "{{#each items}}")
            .err()
            .unwrap();
        assert!(matches!(
            err,
            WeftError::Application(ApplicationError::RenderingFailed { .. })
        ));
    }
}

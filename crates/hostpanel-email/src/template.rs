//! Email template rendering with Handlebars
//!
//! Templates come in pairs, `<name>.txt.hbs` and `<name>.html.hbs`, loaded from
//! the configured template directory. Templates missing there fall back to
//! the built-in ones. A template may start with YAML frontmatter holding the
//! subject line.

use handlebars::Handlebars;
use serde::Deserialize;
use std::path::Path;

use crate::prelude::*;

/// Metadata extracted from template frontmatter
#[derive(Debug, Default, Deserialize)]
pub struct TemplateMetadata {
	/// Email subject line
	#[serde(default)]
	pub subject: Option<String>,
}

/// Result of template rendering
#[derive(Debug)]
pub struct RenderResult {
	/// Subject rendered from template frontmatter
	pub subject: Option<String>,
	pub html_body: String,
	pub text_body: String,
}

fn builtin_template(name: &str, extension: &str) -> Option<&'static str> {
	match (name, extension) {
		("welcome", "txt.hbs") => Some(include_str!("../templates/welcome.txt.hbs")),
		("welcome", "html.hbs") => Some(include_str!("../templates/welcome.html.hbs")),
		_ => None,
	}
}

/// Template engine for email rendering
pub struct TemplateEngine {
	html: Handlebars<'static>,
	/// Plain text bodies and subjects are not HTML escaped
	text: Handlebars<'static>,
}

impl std::fmt::Debug for TemplateEngine {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TemplateEngine").finish_non_exhaustive()
	}
}

impl TemplateEngine {
	pub fn new() -> Self {
		// Enable strict mode to catch undefined variables
		let mut html = Handlebars::new();
		html.set_strict_mode(true);

		let mut text = Handlebars::new();
		text.set_strict_mode(true);
		text.register_escape_fn(handlebars::no_escape);

		Self { html, text }
	}

	/// Parse YAML frontmatter from template content
	///
	/// Frontmatter is delimited by `---` lines at the start of the file.
	/// Returns (metadata, content_without_frontmatter)
	fn parse_frontmatter(content: &str) -> (TemplateMetadata, &str) {
		let content = content.trim_start();

		let Some(after_first) = content.strip_prefix("---") else {
			return (TemplateMetadata::default(), content);
		};

		let Some(end_pos) = after_first.find("\n---") else {
			return (TemplateMetadata::default(), content);
		};

		let yaml_content = &after_first[..end_pos];
		let template_content = &after_first[end_pos + 4..];

		match serde_yaml::from_str(yaml_content) {
			Ok(metadata) => (metadata, template_content.trim_start_matches('\n')),
			Err(e) => {
				warn!("Failed to parse frontmatter YAML: {}", e);
				(TemplateMetadata::default(), content)
			}
		}
	}

	fn load_template(
		template_dir: Option<&Path>,
		template_name: &str,
		extension: &str,
	) -> ClResult<String> {
		if let Some(dir) = template_dir {
			let path = dir.join(format!("{}.{}", template_name, extension));
			match std::fs::read_to_string(&path) {
				Ok(content) => {
					debug!("Loaded template: {}", path.display());
					return Ok(content);
				}
				Err(e) => debug!("Template {} not loaded ({}), using built-in", path.display(), e),
			}
		}

		builtin_template(template_name, extension).map(ToString::to_string).ok_or_else(|| {
			Error::ConfigError(format!("Template not found: {}.{}", template_name, extension))
		})
	}

	/// Render an email template pair with variables
	///
	/// The subject comes from the HTML template's frontmatter, falling back to
	/// the text template's.
	pub fn render(
		&self,
		template_dir: Option<&Path>,
		template_name: &str,
		vars: &serde_json::Value,
	) -> ClResult<RenderResult> {
		let html_content = Self::load_template(template_dir, template_name, "html.hbs")?;
		let (html_metadata, html_template) = Self::parse_frontmatter(&html_content);

		let text_content = Self::load_template(template_dir, template_name, "txt.hbs")?;
		let (text_metadata, text_template) = Self::parse_frontmatter(&text_content);

		let subject = match html_metadata.subject.as_ref().or(text_metadata.subject.as_ref()) {
			Some(subj) => Some(self.text.render_template(subj, vars).map_err(|e| {
				Error::ValidationError(format!("Failed to render email subject: {}", e))
			})?),
			None => None,
		};

		let html_body = self.html.render_template(html_template, vars).map_err(|e| {
			Error::ValidationError(format!(
				"Failed to render HTML template '{}': {}",
				template_name, e
			))
		})?;

		let text_body = self.text.render_template(text_template, vars).map_err(|e| {
			Error::ValidationError(format!(
				"Failed to render text template '{}': {}",
				template_name, e
			))
		})?;

		Ok(RenderResult { subject, html_body, text_body })
	}
}

impl Default for TemplateEngine {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4

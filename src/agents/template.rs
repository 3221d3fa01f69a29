//! Prompt templates for agent commands.

use thiserror::Error;

/// Placeholder substituted with the quoted prompt
pub const PROMPT_PLACEHOLDER: &str = "{prompt}";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("template must include {{prompt}}: {0:?}")]
    MissingPlaceholder(String),
}

/// Substitute every `{prompt}` in `template` with the shell-quoted prompt.
pub fn render_prompt_template(template: &str, prompt: &str) -> Result<String, TemplateError> {
    if !template.contains(PROMPT_PLACEHOLDER) {
        return Err(TemplateError::MissingPlaceholder(template.to_string()));
    }
    Ok(template.replace(PROMPT_PLACEHOLDER, &shell_quote(prompt)))
}

/// Single-quote `value` for a POSIX shell.
pub fn shell_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    format!("'{}'", value.replace('\'', r#"'"'"'"#))
}

//! Template evaluation errors.

/// Failure to evaluate a template.
///
/// Neither variant reaches the HTTP caller: [`crate::render`] recovers by
/// falling back to plain placeholder substitution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The template text is not valid template syntax, or nests too deeply.
    #[error("template parse failed: {0}")]
    TemplateParseFailed(String),

    /// The template parsed but evaluating it failed.
    #[error("template execution failed: {0}")]
    TemplateExecFailed(String),
}

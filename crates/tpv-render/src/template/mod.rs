//! Evaluation of `{{ }}` action templates.
//!
//! Parsing and execution are done by `gtmpl` with the campaign helpers from
//! [`functions`] registered on every template. Source is checked against
//! [`nesting::MAX_NESTING`] first, since the engine recurses once per level.
//!
//! The engine does not escape output. Preview data is bound already
//! HTML-escaped (see [`crate::TemplateVar::rendered`]), so `{{.From}}`
//! cannot inject markup while `{{.Tracker}}` stays raw.

mod functions;
mod nesting;

use gtmpl::{Context, Value};

use crate::error::RenderError;

/// A parsed template, ready to execute against any data.
pub(crate) struct Template {
    inner: gtmpl::Template,
}

impl Template {
    /// Parse template source.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateParseFailed`] for malformed actions,
    /// unknown functions, unbalanced blocks, or nesting beyond the limit.
    pub(crate) fn parse(source: &str) -> Result<Self, RenderError> {
        nesting::check(source)?;

        let mut inner = gtmpl::Template::default();
        inner.add_funcs(functions::FUNCTIONS);
        inner
            .parse(source)
            .map_err(|err| RenderError::TemplateParseFailed(err.to_string()))?;
        Ok(Self { inner })
    }

    /// Execute the template with `data` as the initial dot.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::TemplateExecFailed`] when a function fails or
    /// an operand has the wrong type.
    pub(crate) fn execute(&self, data: &Value) -> Result<String, RenderError> {
        self.inner
            .render(&Context::from(data.clone()))
            .map_err(|err| RenderError::TemplateExecFailed(err.to_string()))
    }
}

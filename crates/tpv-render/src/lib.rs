//! Preview rendering of campaign templates.
//!
//! [`render`] turns raw template bytes into the HTML a browser should see:
//!
//! 1. evaluate `{{ }}` actions against fixed sample recipient data
//! 2. on any template failure, fall back to plain `{{.Name}}` substitution
//! 3. rewrite asset references to public `/templates/...` URLs
//!
//! Rendering never fails; a broken template still produces output.

mod assets;
mod error;
mod substitute;
mod template;
mod vars;

use std::path::Path;

pub use assets::{GLOBAL_ASSETS_DIR, rewrite_assets};
pub use error::RenderError;
pub use substitute::Placeholders;
pub use vars::{PUBLIC_MOUNT, TRACKER_MARKUP, TemplateVar, TemplateVars, base_url};

use template::Template;

/// Render the template at `request_path` (relative to `root`) from its raw bytes.
///
/// Invalid UTF-8 is replaced rather than rejected.
#[must_use]
pub fn render(root: &Path, request_path: &str, raw: &[u8]) -> Vec<u8> {
    let content = String::from_utf8_lossy(raw);
    let vars = TemplateVars::for_request(request_path);

    let text = match evaluate(&content, &vars) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(
                path = request_path,
                error = %err,
                "Template evaluation failed, substituting placeholders"
            );
            Placeholders::from_vars(&vars).apply(&content)
        }
    };

    rewrite_assets(root, request_path, &text).into_bytes()
}

/// Evaluate template actions in `content` against `vars`.
///
/// # Errors
///
/// Returns [`RenderError`] if the content fails to parse or execute.
pub fn evaluate(content: &str, vars: &TemplateVars) -> Result<String, RenderError> {
    Template::parse(content)?.execute(&vars.to_value())
}

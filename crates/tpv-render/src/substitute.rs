//! Plain `{{.Name}}` substitution used when a template cannot be evaluated.

use crate::vars::TemplateVars;

/// Collected `{{.Name}}` tokens and their replacement text.
///
/// Tokens are replaced in one scan over the input, so a replacement value
/// that itself looks like a token is never substituted again.
///
/// ```
/// use tpv_render::Placeholders;
///
/// let mut placeholders = Placeholders::new();
/// placeholders.add("Name", "{{.Name}}");
/// assert_eq!(placeholders.apply("Hi {{.Name}} {{.Other}}"), "Hi {{.Name}} {{.Other}}");
/// ```
#[derive(Debug, Default)]
pub struct Placeholders {
    items: Vec<(String, String)>,
}

impl Placeholders {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholders for every preview variable.
    ///
    /// Values are HTML-escaped except trusted markup, matching the data
    /// bound for template evaluation.
    #[must_use]
    pub fn from_vars(vars: &TemplateVars) -> Self {
        let mut placeholders = Self::new();
        for var in vars.iter() {
            placeholders.add(var.name, &var.rendered());
        }
        placeholders
    }

    /// Register `{{.name}}` to be replaced with `value`.
    pub fn add(&mut self, name: &str, value: &str) {
        self.items.push((format!("{{{{.{name}}}}}"), value.to_owned()));
    }

    /// Replace every registered token in `content`. Unknown tokens are kept.
    #[must_use]
    pub fn apply(&self, content: &str) -> String {
        let mut out = String::with_capacity(content.len());
        let mut rest = content;

        while let Some(start) = rest.find("{{.") {
            out.push_str(&rest[..start]);
            let candidate = &rest[start..];

            match self.items.iter().find(|(token, _)| candidate.starts_with(token.as_str())) {
                Some((token, value)) => {
                    out.push_str(value);
                    rest = &candidate[token.len()..];
                }
                None => {
                    out.push_str("{{.");
                    rest = &candidate[3..];
                }
            }
        }

        out.push_str(rest);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vars::TRACKER_MARKUP;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_known_tokens_replaced() {
        let placeholders = Placeholders::from_vars(&TemplateVars::for_request("a/b.html"));
        assert_eq!(
            placeholders.apply("Hi {{.FirstName}}, see {{.BaseURL}}/x.png"),
            "Hi John, see /templates/a/x.png"
        );
    }

    #[test]
    fn test_values_escaped_except_tracker() {
        let placeholders = Placeholders::from_vars(&TemplateVars::for_request("b.html"));
        assert_eq!(
            placeholders.apply("{{.From}}"),
            "Security Team &lt;security@phishing.test&gt;"
        );
        assert_eq!(placeholders.apply("{{.Tracker}}"), TRACKER_MARKUP);
    }

    #[test]
    fn test_unknown_and_malformed_tokens_kept() {
        let placeholders = Placeholders::from_vars(&TemplateVars::for_request("b.html"));
        assert_eq!(
            placeholders.apply("{{.Unknown}} {{ .FirstName }} {{.FirstName"),
            "{{.Unknown}} {{ .FirstName }} {{.FirstName"
        );
    }

    #[test]
    fn test_prefix_names_do_not_collide() {
        let mut placeholders = Placeholders::new();
        placeholders.add("URL", "u");
        placeholders.add("URLX", "x");
        assert_eq!(placeholders.apply("{{.URL}}{{.URLX}}"), "ux");
    }

    #[test]
    fn test_empty_collector_is_identity() {
        let content = "no {{.tokens}} here";
        assert_eq!(Placeholders::new().apply(content), content);
    }
}

//! Sample recipient data substituted into previews.

use std::borrow::Cow;
use std::collections::HashMap;

use gtmpl::Value;
use tpv_path::clean_path;

/// URL prefix the template tree is served under.
pub const PUBLIC_MOUNT: &str = "/templates";

/// Tracking pixel emitted verbatim in place of `{{.Tracker}}`.
pub const TRACKER_MARKUP: &str = r#"<img src="https://phishing.test/opened/unique-id" alt="" width="1" height="1" border="0" style="height:1px !important;width:1px" />"#;

/// Fixed preview values, everything except `BaseURL` and `Tracker`.
const SAMPLE_VALUES: &[(&str, &str)] = &[
    ("rID", "1234567890"),
    ("FirstName", "John"),
    ("LastName", "Doe"),
    ("Email", "john.doe@example.com"),
    ("To", "john.doe@example.com"),
    ("Phone", "+1-555-123-4567"),
    ("ExtraIdentifier", "EMP001"),
    ("Position", "IT Manager"),
    ("Department", "Information Technology"),
    ("City", "New York"),
    ("Country", "United States"),
    ("Misc", "Additional Info"),
    ("TrackingURL", "https://phishing.test/clicked/unique-id"),
    ("From", "Security Team <security@phishing.test>"),
    ("URL", "https://phishing.test/phishing-link"),
    ("DenyURL", "https://phishing.test/access-denied"),
    ("APIKey", ""),
    ("CustomField1", ""),
    ("CustomField2", ""),
    ("CustomField3", ""),
    ("CustomField4", ""),
];

/// One named preview value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateVar {
    pub name: &'static str,
    pub value: String,
    /// Trusted markup is written without escaping.
    pub trusted: bool,
}

impl TemplateVar {
    /// Text written into a preview: HTML-escaped unless trusted.
    #[must_use]
    pub fn rendered(&self) -> Cow<'_, str> {
        if self.trusted {
            Cow::Borrowed(&self.value)
        } else {
            html_escape::encode_quoted_attribute(&self.value)
        }
    }
}

/// The sample data bound for one request.
///
/// Everything is fixed except `BaseURL`, which points at the directory of
/// the template being rendered.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    vars: Vec<TemplateVar>,
}

impl TemplateVars {
    /// Bind the sample data for the template at `request_path`.
    #[must_use]
    pub fn for_request(request_path: &str) -> Self {
        let mut vars: Vec<TemplateVar> = SAMPLE_VALUES
            .iter()
            .map(|(name, value)| TemplateVar {
                name,
                value: (*value).to_owned(),
                trusted: false,
            })
            .collect();

        vars.push(TemplateVar {
            name: "Tracker",
            value: TRACKER_MARKUP.to_owned(),
            trusted: true,
        });
        vars.push(TemplateVar {
            name: "BaseURL",
            value: base_url(request_path),
            trusted: false,
        });

        Self { vars }
    }

    /// Value of a named variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|var| var.name == name)
            .map(|var| var.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TemplateVar> {
        self.vars.iter()
    }

    /// Template data: a map from variable name to its rendered text.
    pub(crate) fn to_value(&self) -> Value {
        let map: HashMap<String, Value> = self
            .vars
            .iter()
            .map(|var| (var.name.to_owned(), Value::from(var.rendered().into_owned())))
            .collect();
        Value::Map(map)
    }
}

/// Directory of the template relative to the root, `.` for root-level files.
pub(crate) fn template_dir(request_path: &str) -> String {
    let cleaned = clean_path(request_path.trim_start_matches('/'));
    match cleaned.rsplit_once('/') {
        Some((dir, _)) => dir.to_owned(),
        None => ".".to_owned(),
    }
}

/// Public URL of the directory containing the template at `request_path`.
///
/// # Examples
///
/// ```
/// use tpv_render::base_url;
///
/// assert_eq!(base_url("campaign/email.html"), "/templates/campaign");
/// assert_eq!(base_url("email.html"), "/templates");
/// ```
#[must_use]
pub fn base_url(request_path: &str) -> String {
    match template_dir(request_path).as_str() {
        "." => PUBLIC_MOUNT.to_owned(),
        dir => format!("{PUBLIC_MOUNT}/{}", dir.trim_end_matches('/')),
    }
}

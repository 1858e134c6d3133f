//! Rewriting asset references in rendered HTML to public URLs.
//!
//! Only `src`, `href` and `action` attribute values are touched; text and
//! script bodies (including `//` comments) are left alone. Each reference
//! resolves in priority order:
//!
//! 1. already public (`/templates/...`) and present: kept
//! 2. present next to the template: `/templates/<dir>/<path>`
//! 3. present in the shared pool (`<root>/assets`): `/templates/assets/<path>`
//! 4. otherwise the template-local URL
//!
//! Rewriting is idempotent: running it on its own output changes nothing.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tpv_path::clean_path;

use crate::vars::{PUBLIC_MOUNT, template_dir};

/// Directory under the root holding assets shared by all templates.
pub const GLOBAL_ASSETS_DIR: &str = "assets";

static ASSET_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(^|\s)(src|href|action)=(?:"([^"]*)"|'([^']*)')"#)
        .expect("invalid asset attribute regex")
});

static REPEATED_SLASHES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/{2,}").expect("invalid slash regex"));

/// URL scheme prefix such as `https:`, `data:` or `mailto:`.
static SCHEME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9+.\-]*:").expect("invalid scheme regex"));

/// Rewrite asset references in `html` rendered from the template at `request_path`.
#[must_use]
pub fn rewrite_assets(root: &Path, request_path: &str, html: &str) -> String {
    let dir = template_dir(request_path);

    ASSET_ATTR_RE
        .replace_all(html, |caps: &Captures| {
            let (lead, attr) = (&caps[1], &caps[2]);
            let (quote, value) = match (caps.get(3), caps.get(4)) {
                (Some(m), _) => ('"', m.as_str()),
                (None, Some(m)) => ('\'', m.as_str()),
                (None, None) => return caps[0].to_owned(),
            };
            match rewrite_reference(root, &dir, value) {
                Some(rewritten) => format!("{lead}{attr}={quote}{rewritten}{quote}"),
                None => caps[0].to_owned(),
            }
        })
        .into_owned()
}

/// New value for one attribute, or `None` to leave it untouched.
fn rewrite_reference(root: &Path, dir: &str, value: &str) -> Option<String> {
    if is_external(value) {
        return None;
    }

    let value = REPEATED_SLASHES_RE.replace_all(value, "/").into_owned();
    let mounted = value
        .strip_prefix(PUBLIC_MOUNT)
        .and_then(|rest| rest.strip_prefix('/'));
    let rewritten = match mounted {
        Some(mounted) => resolve_mounted(root, dir, mounted).unwrap_or_else(|| value.clone()),
        None => resolve_relative(root, dir, &value),
    };
    Some(rewritten)
}

/// Empty values, fragments, scheme-relative and absolute URLs are not assets.
fn is_external(value: &str) -> bool {
    value.is_empty()
        || value.starts_with('#')
        || value.starts_with("//")
        || SCHEME_RE.is_match(value)
}

/// A `/templates/...` reference: keep it if present, else try the shared pool.
fn resolve_mounted(root: &Path, dir: &str, mounted: &str) -> Option<String> {
    if exists(root, mounted) {
        return None;
    }

    let asset = if dir == "." {
        mounted
    } else {
        mounted.strip_prefix(dir)?.strip_prefix('/')?
    };
    global_asset(root, asset)
}

/// A relative or site-absolute reference.
fn resolve_relative(root: &Path, dir: &str, value: &str) -> String {
    let local = if dir == "." {
        value.to_owned()
    } else {
        format!("{dir}/{value}")
    };

    if exists(root, &local) {
        return public_url(&local);
    }
    global_asset(root, value).unwrap_or_else(|| public_url(&local))
}

/// Public URL of `asset` in the shared pool, if it exists there.
///
/// `..` segments may not climb out of the pool directory.
fn global_asset(root: &Path, asset: &str) -> Option<String> {
    let asset = asset.trim_start_matches('/');
    let asset = asset
        .strip_prefix(GLOBAL_ASSETS_DIR)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(asset);

    let pooled = clean_path(&format!("{GLOBAL_ASSETS_DIR}/{asset}"));
    if !pooled.starts_with(&format!("{GLOBAL_ASSETS_DIR}/")) {
        return None;
    }
    exists(root, &pooled).then(|| public_url(&pooled))
}

/// `/templates/<relative>`, cleaned and never outside the mount.
fn public_url(relative: &str) -> String {
    let url = clean_path(&format!("{PUBLIC_MOUNT}/{relative}"));
    if url == PUBLIC_MOUNT || url.starts_with(&format!("{PUBLIC_MOUNT}/")) {
        url
    } else {
        format!("{PUBLIC_MOUNT}/{}", url.trim_start_matches('/'))
    }
}

/// Whether `relative` names an existing entry under `root`.
///
/// Lookups that would leave the root, and any I/O error, count as absent.
fn exists(root: &Path, relative: &str) -> bool {
    let cleaned = clean_path(relative.trim_start_matches('/'));
    if cleaned == ".." || cleaned.starts_with("../") {
        return false;
    }
    root.join(cleaned).try_exists().unwrap_or(false)
}

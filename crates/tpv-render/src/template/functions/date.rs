//! Letter-based date formats (`Y-m-d H:i:s`) mapped onto chrono.

use chrono::{Local, TimeDelta};

/// Translate a letter format into a chrono format string in one pass.
///
/// Each letter is replaced independently, so expansions never feed back into
/// later replacements. Unknown characters are copied literally.
pub(super) fn to_chrono_format(format: &str) -> String {
    let mut out = String::with_capacity(format.len() * 2);
    for ch in format.chars() {
        let spec = match ch {
            'Y' => "%Y",
            'y' => "%y",
            'm' => "%m",
            'n' => "%-m",
            'M' => "%b",
            'F' => "%B",
            'd' => "%d",
            'j' => "%-d",
            'H' => "%H",
            'h' => "%I",
            'G' => "%-H",
            'g' => "%-I",
            'i' => "%M",
            's' => "%S",
            'A' => "%p",
            'a' => "%P",
            '%' => "%%",
            other => {
                out.push(other);
                continue;
            }
        };
        out.push_str(spec);
    }
    out
}

/// Format the local time shifted by `offset_seconds`.
pub(super) fn format_now(format: &str, offset_seconds: i64) -> Result<String, String> {
    let now = Local::now();
    let when = TimeDelta::try_seconds(offset_seconds)
        .and_then(|delta| now.checked_add_signed(delta))
        .ok_or_else(|| format!("date: offset {offset_seconds}s is out of range"))?;
    Ok(when.format(&to_chrono_format(format)).to_string())
}

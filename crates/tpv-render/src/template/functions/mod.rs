//! Campaign helpers registered with the template engine.
//!
//! Comparison and logic builtins (`eq`, `and`, `len`, ...) come from the
//! engine itself. Every function here takes already-evaluated arguments;
//! the piped value, if any, is the last one.

mod date;
mod qr;

use std::collections::HashMap;

use base64::Engine;
use base64::prelude::BASE64_STANDARD;
use gtmpl::{FuncError, Value};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::RngExt;

pub(crate) type Function = fn(&[Value]) -> Result<Value, FuncError>;

/// Characters left alone by query escaping.
const QUERY_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Longest string `randAlpha` will produce.
const MAX_RAND_ALPHA: i64 = 32;

/// Default module size in pixels for `qr`.
const DEFAULT_QR_DOT_SIZE: u32 = 5;

pub(crate) const FUNCTIONS: &[(&str, Function)] = &[
    ("base64", base64),
    ("basename", basename),
    ("date", date),
    ("dict", dict),
    ("ext", ext),
    ("htmlEscape", html_escape_fn),
    ("join", join),
    ("qr", qr),
    ("randAlpha", rand_alpha),
    ("randInt", rand_int),
    ("split", split),
    ("urlEscape", url_escape),
];

fn fail(message: impl Into<String>) -> FuncError {
    FuncError::Generic(message.into())
}

fn arity(args: &[Value], name: &str, min: usize, max: usize) -> Result<(), FuncError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min}..={max}")
        };
        return Err(fail(format!(
            "{name}: wrong number of args: want {expected}, got {}",
            args.len()
        )));
    }
    Ok(())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::NoValue | Value::Nil => "nil",
        Value::Bool(_) => "bool",
        Value::String(_) => "string",
        Value::Object(_) | Value::Map(_) => "map",
        Value::Array(_) => "slice",
        Value::Number(_) => "number",
        _ => "func",
    }
}

fn text_arg<'a>(args: &'a [Value], i: usize, name: &str) -> Result<&'a str, FuncError> {
    match &args[i] {
        Value::String(text) => Ok(text),
        other => Err(fail(format!(
            "{name}: argument {} must be a string, got {}",
            i + 1,
            type_name(other)
        ))),
    }
}

fn int_arg(args: &[Value], i: usize, name: &str) -> Result<i64, FuncError> {
    match &args[i] {
        Value::Number(n) => n.as_i64().ok_or_else(|| {
            fail(format!("{name}: argument {} must be an int", i + 1))
        }),
        other => Err(fail(format!(
            "{name}: argument {} must be an int, got {}",
            i + 1,
            type_name(other)
        ))),
    }
}

fn split(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "split", 2, 2)?;
    let text = text_arg(args, 0, "split")?;
    let sep = text_arg(args, 1, "split")?;
    let parts: Vec<Value> = if sep.is_empty() {
        text.chars().map(|c| Value::from(c.to_string())).collect()
    } else {
        text.split(sep).map(Value::from).collect()
    };
    Ok(Value::Array(parts))
}

fn join(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "join", 3, 3)?;
    let base = text_arg(args, 0, "join")?;
    let add = text_arg(args, 1, "join")?;
    let sep = text_arg(args, 2, "join")?;
    if base.is_empty() {
        return Ok(Value::from(add));
    }
    Ok(Value::from(format!("{base}{sep}{add}")))
}

fn basename(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "basename", 1, 1)?;
    Ok(Value::from(last_element(text_arg(args, 0, "basename")?)))
}

fn ext(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "ext", 1, 1)?;
    let path = text_arg(args, 0, "ext")?;
    let name = path.rsplit('/').next().unwrap_or_default();
    let extension = name.rfind('.').map_or("", |dot| &name[dot..]);
    Ok(Value::from(extension))
}

/// Final path element; `.` for empty input, `/` for all-slash input.
fn last_element(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return "/";
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn dict(args: &[Value]) -> Result<Value, FuncError> {
    if args.len() % 2 != 0 {
        return Err(fail("dict: invalid dict call, odd number of arguments"));
    }
    let mut map = HashMap::with_capacity(args.len() / 2);
    for pair in args.chunks(2) {
        let Value::String(key) = &pair[0] else {
            return Err(fail(format!(
                "dict: keys must be strings, got {}",
                type_name(&pair[0])
            )));
        };
        map.insert(key.clone(), pair[1].clone());
    }
    Ok(Value::Map(map))
}

fn url_escape(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "urlEscape", 1, 1)?;
    let text = text_arg(args, 0, "urlEscape")?;
    let escaped = utf8_percent_encode(text, QUERY_ESCAPE)
        .to_string()
        .replace("%20", "+");
    Ok(Value::from(escaped))
}

fn html_escape_fn(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "htmlEscape", 1, 1)?;
    let text = text_arg(args, 0, "htmlEscape")?;
    Ok(Value::from(html_escape::encode_quoted_attribute(text).into_owned()))
}

fn base64(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "base64", 1, 1)?;
    Ok(Value::from(BASE64_STANDARD.encode(text_arg(args, 0, "base64")?)))
}

fn rand_int(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "randInt", 2, 2)?;
    let low = int_arg(args, 0, "randInt")?;
    let high = int_arg(args, 1, "randInt")?;
    if low > high {
        return Err(fail(format!("randInt: empty range {low}..={high}")));
    }
    Ok(Value::from(rand::rng().random_range(low..=high)))
}

fn rand_alpha(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "randAlpha", 1, 1)?;
    let length = int_arg(args, 0, "randAlpha")?;
    if !(0..=MAX_RAND_ALPHA).contains(&length) {
        return Err(fail(format!(
            "randAlpha: length must be between 0 and {MAX_RAND_ALPHA}, got {length}"
        )));
    }
    let mut rng = rand::rng();
    let text: String = (0..length)
        .map(|_| char::from(LETTERS[rng.random_range(0..LETTERS.len())]))
        .collect();
    Ok(Value::from(text))
}

fn qr(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "qr", 1, 2)?;
    let text = text_arg(args, 0, "qr")?;
    // A missing, non-integer or non-positive size falls back to the default.
    let dot_size = match args.get(1) {
        Some(Value::Number(size)) => size
            .as_i64()
            .and_then(|size| u32::try_from(size).ok())
            .filter(|size| *size > 0),
        _ => None,
    }
    .unwrap_or(DEFAULT_QR_DOT_SIZE);
    qr::qr_table(text, dot_size).map(Value::from).map_err(fail)
}

fn date(args: &[Value]) -> Result<Value, FuncError> {
    arity(args, "date", 1, 2)?;
    let format = text_arg(args, 0, "date")?;
    let offset = if args.len() == 2 {
        int_arg(args, 1, "date")?
    } else {
        0
    };
    date::format_now(format, offset)
        .map(Value::from)
        .map_err(fail)
}

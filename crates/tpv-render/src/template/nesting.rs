//! Structural limits checked before source reaches the engine.
//!
//! The engine parses and executes nested blocks and parenthesized
//! expressions recursively, so their depth is capped here. `else if` and
//! `else with` count as one more level each, since they nest a block inside
//! the `else` branch. Named templates are rejected outright: they allow
//! unbounded recursion at execution time.

use crate::error::RenderError;

/// Deepest combined block and parenthesis nesting accepted.
pub(crate) const MAX_NESTING: usize = 64;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Scan every action in `source` once and enforce the nesting limits.
///
/// Unterminated actions are left for the engine to report.
pub(crate) fn check(source: &str) -> Result<(), RenderError> {
    // Open blocks, each with the levels it added (1 plus its else-chain).
    let mut blocks: Vec<usize> = Vec::new();
    let mut depth = 0;
    let mut line = 1;
    let mut rest = source;

    while let Some(start) = rest.find(OPEN) {
        line += newlines(&rest[..start]);
        let body_start = start + OPEN.len();
        let Some(len) = rest[body_start..].find(CLOSE) else {
            break;
        };
        let body = &rest[body_start..body_start + len];

        match keyword(body) {
            Keyword::Open => {
                blocks.push(1);
                depth += 1;
            }
            Keyword::ElseChain => {
                if let Some(levels) = blocks.last_mut() {
                    *levels += 1;
                    depth += 1;
                }
            }
            Keyword::End => {
                depth -= blocks.pop().unwrap_or(0);
            }
            Keyword::Named(name) => {
                return Err(RenderError::TemplateParseFailed(format!(
                    "line {line}: `{name}` is not supported"
                )));
            }
            Keyword::Other => {}
        }

        if depth + paren_depth(body) > MAX_NESTING {
            return Err(RenderError::TemplateParseFailed(format!(
                "line {line}: nesting deeper than {MAX_NESTING} levels"
            )));
        }

        line += newlines(body);
        rest = &rest[body_start + len + CLOSE.len()..];
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum Keyword<'a> {
    Open,
    ElseChain,
    End,
    Named(&'a str),
    Other,
}

fn keyword(body: &str) -> Keyword<'_> {
    let body = body.trim_start_matches('-').trim_start();
    let mut words = body
        .split(|c: char| c.is_whitespace() || c == '(')
        .filter(|w| !w.is_empty());
    match words.next() {
        Some("if" | "range" | "with") => Keyword::Open,
        Some("else") => match words.next() {
            Some("if" | "with") => Keyword::ElseChain,
            _ => Keyword::Other,
        },
        Some("end") => Keyword::End,
        Some(name @ ("define" | "template" | "block")) => Keyword::Named(name),
        _ => Keyword::Other,
    }
}

/// Deepest parenthesis nesting outside string and character literals.
fn paren_depth(body: &str) -> usize {
    let mut depth: usize = 0;
    let mut max = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for c in body.chars() {
        match quote {
            Some(_) if escaped => escaped = false,
            Some(q) if c == '\\' && q != '`' => escaped = true,
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '`' | '\'' => quote = Some(c),
                '(' => {
                    depth += 1;
                    max = max.max(depth);
                }
                ')' => depth = depth.saturating_sub(1),
                _ => {}
            },
        }
    }
    max
}

fn newlines(text: &str) -> usize {
    text.bytes().filter(|&b| b == b'\n').count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn nested_ifs(levels: usize) -> String {
        format!("{}x{}", "{{if 1}}".repeat(levels), "{{end}}".repeat(levels))
    }

    #[test]
    fn test_keywords() {
        assert_eq!(keyword(" if .X "), Keyword::Open);
        assert_eq!(keyword("- range $i, $e := .L"), Keyword::Open);
        assert_eq!(keyword("else if .Y"), Keyword::ElseChain);
        assert_eq!(keyword("else"), Keyword::Other);
        assert_eq!(keyword("end -"), Keyword::End);
        assert_eq!(keyword("template \"x\""), Keyword::Named("template"));
        assert_eq!(keyword(".FirstName"), Keyword::Other);
        assert_eq!(keyword("/* end */"), Keyword::Other);
    }

    #[test]
    fn test_blocks_within_limit() {
        assert_eq!(check(&nested_ifs(MAX_NESTING)), Ok(()));
        assert_eq!(
            check("{{if .A}}{{range .B}}{{end}}{{else}}{{with .C}}{{end}}{{end}}"),
            Ok(())
        );
    }

    #[test]
    fn test_deep_blocks_rejected() {
        for levels in [MAX_NESTING + 1, 500, 5000] {
            assert!(
                matches!(check(&nested_ifs(levels)), Err(RenderError::TemplateParseFailed(_))),
                "{levels}"
            );
        }
    }

    #[test]
    fn test_sequential_blocks_do_not_accumulate() {
        let source = "{{if 1}}x{{end}}".repeat(10_000);
        assert_eq!(check(&source), Ok(()));
    }

    #[test]
    fn test_else_if_chain_counts() {
        let chain = format!("{{{{if .A}}}}{}{{{{end}}}}", "{{else if .B}}".repeat(MAX_NESTING));
        assert!(check(&chain).is_err());

        let short = format!("{{{{if .A}}}}{}{{{{end}}}}", "{{else if .B}}".repeat(10));
        assert_eq!(check(&short), Ok(()));
    }

    #[test]
    fn test_deep_parentheses_rejected() {
        let levels = MAX_NESTING + 1;
        let deep = format!("{{{{{}1{}}}}}", "(".repeat(levels), ")".repeat(levels));
        assert!(check(&deep).is_err());
        assert_eq!(check("{{len (print (print \"(((\"))}}"), Ok(()));
    }

    #[test]
    fn test_named_templates_rejected() {
        let err = check("a\nb\n{{define \"t\"}}{{template \"t\"}}{{end}}").unwrap_err();
        assert_eq!(
            err,
            RenderError::TemplateParseFailed("line 3: `define` is not supported".to_owned())
        );
    }

    #[test]
    fn test_line_tracking_spans_actions() {
        let source = "{{/* one\ntwo */}}\n{{\nblock \"x\" .}}";
        let err = check(source).unwrap_err();
        assert_eq!(
            err,
            RenderError::TemplateParseFailed("line 3: `block` is not supported".to_owned())
        );
    }

    #[test]
    fn test_unterminated_action_left_to_engine() {
        assert_eq!(check("{{if .A"), Ok(()));
    }
}

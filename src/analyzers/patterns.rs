//! The lexical pattern set, kept as one versioned table rather than inline
//! literals scattered through the extractor. Patterns operate on
//! comment-stripped text; string masking is the caller's responsibility
//! where a match inside a literal would be wrong.

use once_cell::sync::Lazy;
use regex::Regex;

/// R identifiers may contain dots (`print.myclass`), which is how S3
/// methods are spelled.
pub const IDENT: &str = r"[A-Za-z.][A-Za-z0-9._]*";

/// `name <- function(` / `name = function(`, signature possibly spanning
/// lines (`\s` crosses newlines). The trailing `\(` anchors the parameter
/// list for brace balancing.
pub static FUNCTION_DEF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"({IDENT})\s*(?:<-|=)\s*function\s*\(")).unwrap()
});

/// `Name <- R6Class(`.
pub static R6_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"({IDENT})\s*(?:<-|=)\s*R6Class\s*\(")).unwrap());

/// `setRefClass("Name"` with optional assignment prefix; the quoted
/// argument is the class name.
pub static REFCLASS_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r#"setRefClass\s*\(\s*["']({IDENT})["']"#)).unwrap());

/// Bare `function(` keyword, for inline definition arguments such as
/// `setMethod(..., function(x) ...)`.
pub static FUNCTION_KW: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfunction\s*\(").unwrap());

/// `setClass("Name"`.
pub static S4_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r#"setClass\s*\(\s*["']({IDENT})["']"#)).unwrap());

/// `setMethod("generic", "Name"`.
pub static S4_METHOD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r#"setMethod\s*\(\s*["']({IDENT})["']\s*,\s*["']({IDENT})["']"#
    ))
    .unwrap()
});

/// `public = list(` / `private = list(` / `active = list(` inside an
/// R6Class call. Private and active entries count as methods too.
pub static R6_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:public|private|active)\s*=\s*list\s*\(").unwrap());

/// `methods = list(` inside a setRefClass call.
pub static REFCLASS_SECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bmethods\s*=\s*list\s*\(").unwrap());

/// `library(pkg)` / `require(pkg)`, quoted or bare, extra arguments allowed.
pub static LIBRARY_CALL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)\b(?:library|require)\s*\(\s*["']?([A-Za-z][A-Za-z0-9._]*)["']?\s*[,)]"#)
        .unwrap()
});

/// `pkg::symbol` (also matches the first two colons of `pkg:::symbol`).
pub static NAMESPACE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([A-Za-z][A-Za-z0-9.]*)\s*::").unwrap());

/// Decision-point tokens. `\bif\s*\(` cannot match inside `ifelse(`, and an
/// `else if` contributes exactly one `if` token, so neither double-counts.
pub static KW_IF: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bif\s*\(").unwrap());
pub static KW_FOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bfor\s*\(").unwrap());
pub static KW_WHILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bwhile\s*\(").unwrap());
pub static KW_REPEAT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\brepeat\b").unwrap());
pub static KW_SWITCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bswitch\s*\(").unwrap());
pub static KW_IFELSE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bifelse\s*\(").unwrap());

/// Assignment targets: `x <- ...`, `x <<- ...`, `x = ...` (but not `==`).
pub static ASSIGNED_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b({IDENT})\s*(?:<<-|<-|=[^=])")).unwrap());

/// First parameter list of a function definition.
pub static PARAM_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"function\s*\(([^)]*)\)").unwrap());

/// Call expressions: identifier followed by `(`. Control keywords are
/// filtered by `is_call_keyword`.
pub static CALL_EXPR: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!(r"\b({IDENT})\s*\(")).unwrap());

pub fn is_call_keyword(name: &str) -> bool {
    matches!(name, "if" | "while" | "for" | "repeat" | "switch" | "function")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_def_matches_both_assignment_forms() {
        assert!(FUNCTION_DEF.is_match("f <- function(x)"));
        assert!(FUNCTION_DEF.is_match("f = function(x)"));
        assert!(FUNCTION_DEF.is_match("print.myclass <- function(x)"));
        assert!(!FUNCTION_DEF.is_match("f <- funct(x)"));
    }

    #[test]
    fn function_def_spans_lines() {
        assert!(FUNCTION_DEF.is_match("f <-\n  function (x)"));
    }

    #[test]
    fn if_does_not_match_ifelse() {
        assert!(!KW_IF.is_match("ifelse(x, 1, 2)"));
        assert!(KW_IFELSE.is_match("ifelse(x, 1, 2)"));
        assert_eq!(KW_IF.find_iter("if (a) 1 else if (b) 2 else 3").count(), 2);
    }

    #[test]
    fn library_forms() {
        let grab = |s: &str| LIBRARY_CALL.captures(s).map(|c| c[1].to_string());
        assert_eq!(grab("library(dplyr)"), Some("dplyr".into()));
        assert_eq!(grab("require(\"ggplot2\")"), Some("ggplot2".into()));
        assert_eq!(grab("library(data.table, quietly = TRUE)"), Some("data.table".into()));
        assert_eq!(grab("requireNamespace(\"x\")"), None);
    }

    #[test]
    fn namespace_ref_captures_package() {
        let caps: Vec<_> = NAMESPACE_REF
            .captures_iter("ggplot2::ggplot(stats:::lm)")
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(caps, vec!["ggplot2", "stats"]);
    }

    #[test]
    fn assigned_var_skips_comparison() {
        let names: Vec<_> = ASSIGNED_VAR
            .captures_iter("x <- 1\ny = 2\nz <<- 3\nif (a == b) 1")
            .map(|c| c[1].to_string())
            .collect();
        assert_eq!(names, vec!["x", "y", "z"]);
    }
}

//! Construct extraction: functions, classes across the four R OOP idioms,
//! and namespace references. Operates on comment-stripped text and leans on
//! the normalizer's quote awareness for every balance scan.

use std::collections::HashSet;

use crate::analyzers::normalize::QuoteState;
use crate::analyzers::patterns;
use crate::core::{ClassDef, ClassIdiom, FunctionDef, MethodBinding};

/// Everything the extractor recovers from one file.
#[derive(Debug, Clone, Default)]
pub struct FileInventory {
    pub functions: Vec<FunctionDef>,
    pub classes: Vec<ClassDef>,
    /// Multiset of referenced package names; CBO collapses to a set.
    pub namespace_refs: Vec<String>,
}

pub fn extract(text: &str) -> FileInventory {
    let mut inventory = FileInventory::default();
    // Byte offsets of method definitions already claimed by a class block,
    // so the free-function scan does not record them twice.
    let mut claimed_defs: HashSet<usize> = HashSet::new();

    extract_r6_classes(text, &mut inventory, &mut claimed_defs);
    extract_ref_classes(text, &mut inventory, &mut claimed_defs);
    extract_s4(text, &mut inventory, &mut claimed_defs);
    extract_free_functions(text, &claimed_defs, &mut inventory);

    inventory.namespace_refs = extract_namespace_refs(text);
    inventory
}

/// 1-based line number of a byte offset.
fn line_of(text: &str, offset: usize) -> usize {
    text[..offset].bytes().filter(|&b| b == b'\n').count() + 1
}

/// Offset just past the `)` matching the `(` at `open`. Quote-aware; an
/// unclosed call truncates at end-of-file.
fn balanced_paren_end(text: &str, open: usize) -> usize {
    balanced_end(text, open, '(', ')')
}

/// Offset just past the `}` matching the `{` at `open`.
fn balanced_brace_end(text: &str, open: usize) -> usize {
    balanced_end(text, open, '{', '}')
}

fn balanced_end(text: &str, open: usize, open_ch: char, close_ch: char) -> usize {
    let mut depth = 0i32;
    let mut state = QuoteState::new();
    for (i, c) in text[open..].char_indices() {
        if !state.advance(c) {
            continue;
        }
        if c == open_ch {
            depth += 1;
        } else if c == close_ch {
            depth -= 1;
            if depth <= 0 {
                return open + i + c.len_utf8();
            }
        }
    }
    text.len()
}

/// End offset of a function body whose parameter list opens at
/// `params_open`. A braced body runs to its balancing `}`; a braceless body
/// runs to the first newline at paren/brace depth zero.
fn function_body_end(text: &str, params_open: usize) -> usize {
    let params_end = balanced_paren_end(text, params_open);

    let mut body_start = params_end;
    for (i, c) in text[params_end..].char_indices() {
        if c.is_whitespace() {
            continue;
        }
        body_start = params_end + i;
        if c == '{' {
            return balanced_brace_end(text, body_start);
        }
        break;
    }

    // Single-expression body: spans to the end of its logical statement.
    let mut state = QuoteState::new();
    let mut paren_depth = 0i32;
    let mut brace_depth = 0i32;
    for (i, c) in text[body_start..].char_indices() {
        if !state.advance(c) {
            continue;
        }
        match c {
            '(' => paren_depth += 1,
            ')' => paren_depth -= 1,
            '{' => brace_depth += 1,
            '}' => brace_depth -= 1,
            '\n' if paren_depth <= 0 && brace_depth <= 0 => return body_start + i,
            _ => {}
        }
    }
    text.len()
}

/// Paren/brace depth of `pos` relative to the start of `text`.
fn depth_at(text: &str, pos: usize) -> (i32, i32) {
    let mut state = QuoteState::new();
    let mut paren = 0i32;
    let mut brace = 0i32;
    for (i, c) in text.char_indices() {
        if i >= pos {
            break;
        }
        if !state.advance(c) {
            continue;
        }
        match c {
            '(' => paren += 1,
            ')' => paren -= 1,
            '{' => brace += 1,
            '}' => brace -= 1,
            _ => {}
        }
    }
    (paren, brace)
}

fn class_entry<'a>(
    classes: &'a mut Vec<ClassDef>,
    name: &str,
    idiom: ClassIdiom,
) -> &'a mut ClassDef {
    if let Some(idx) = classes.iter().position(|c| c.name == name) {
        return &mut classes[idx];
    }
    classes.push(ClassDef::new(name, idiom));
    classes.last_mut().expect("just pushed")
}

/// Named `function` entries at the top nesting level of a `list(...)` whose
/// content starts at `list_content` (just past the open paren) and ends at
/// `list_end`. Nested helper definitions inside method bodies stay out.
fn top_level_fn_entries(text: &str, list_content: usize, list_end: usize) -> Vec<(String, usize)> {
    let span = &text[list_content..list_end];
    let mut entries = Vec::new();
    for caps in patterns::FUNCTION_DEF.captures_iter(span) {
        let m = caps.get(0).expect("match");
        if depth_at(span, m.start()) == (0, 0) {
            entries.push((caps[1].to_string(), list_content + m.start()));
        }
    }
    entries
}

/// Record one method definition: a FunctionDef bound to its class plus the
/// name in the class's method list.
fn record_method(
    text: &str,
    def_start: usize,
    name: &str,
    class_name: &str,
    inventory: &mut FileInventory,
    claimed_defs: &mut HashSet<usize>,
) {
    claimed_defs.insert(def_start);
    // The FUNCTION_DEF pattern ends at the parameter list's open paren.
    if let Some(m) = patterns::FUNCTION_DEF.find_at(text, def_start) {
        if m.start() == def_start {
            let params_open = m.end() - 1;
            let end = function_body_end(text, params_open);
            inventory.functions.push(FunctionDef {
                name: name.to_string(),
                start_line: line_of(text, def_start),
                end_line: line_of(text, end.saturating_sub(1).max(def_start)),
                body: text[def_start..end].to_string(),
                binding: MethodBinding::BoundTo(class_name.to_string()),
            });
        }
    }
}

fn extract_class_like(
    text: &str,
    decl: &regex::Regex,
    section: &regex::Regex,
    idiom: ClassIdiom,
    inventory: &mut FileInventory,
    claimed_defs: &mut HashSet<usize>,
) {
    for caps in decl.captures_iter(text) {
        let m = caps.get(0).expect("match");
        let class_name = caps[1].to_string();
        // Balance the constructor call itself so sections inside a later,
        // unrelated call cannot bleed in.
        let Some(call_open_rel) = text[m.start()..].find('(') else {
            continue;
        };
        let call_open = m.start() + call_open_rel;
        let call_end = balanced_paren_end(text, call_open);

        let mut methods: Vec<(String, usize)> = Vec::new();
        let block = &text[call_open..call_end];
        for sec in section.find_iter(block) {
            let list_open = call_open + sec.end() - 1;
            let list_end = balanced_paren_end(text, list_open);
            methods.extend(top_level_fn_entries(text, list_open + 1, list_end));
        }

        let class = class_entry(&mut inventory.classes, &class_name, idiom);
        for (name, _) in &methods {
            class.add_method(name);
        }
        for (name, def_start) in methods {
            record_method(text, def_start, &name, &class_name, inventory, claimed_defs);
        }
    }
}

fn extract_r6_classes(text: &str, inventory: &mut FileInventory, claimed_defs: &mut HashSet<usize>) {
    extract_class_like(
        text,
        &patterns::R6_DECL,
        &patterns::R6_SECTION,
        ClassIdiom::R6,
        inventory,
        claimed_defs,
    );
}

fn extract_ref_classes(
    text: &str,
    inventory: &mut FileInventory,
    claimed_defs: &mut HashSet<usize>,
) {
    extract_class_like(
        text,
        &patterns::REFCLASS_DECL,
        &patterns::REFCLASS_SECTION,
        ClassIdiom::RefClass,
        inventory,
        claimed_defs,
    );
}

fn extract_s4(text: &str, inventory: &mut FileInventory, claimed_defs: &mut HashSet<usize>) {
    for caps in patterns::S4_CLASS.captures_iter(text) {
        class_entry(&mut inventory.classes, &caps[1], ClassIdiom::S4);
    }

    for caps in patterns::S4_METHOD.captures_iter(text) {
        let m = caps.get(0).expect("match");
        let generic = caps[1].to_string();
        let class_name = caps[2].to_string();

        // setMethod may target a class that was declared in another file.
        let class = class_entry(&mut inventory.classes, &class_name, ClassIdiom::S4);
        class.add_method(&generic);

        // Synthesize a scoreable definition from the inline function
        // argument when one is present; without it the method stays a
        // name-only registration.
        let Some(call_open_rel) = text[m.start()..].find('(') else {
            continue;
        };
        let call_open = m.start() + call_open_rel;
        let call_end = balanced_paren_end(text, call_open);
        let search = &text[m.end()..call_end];
        if let Some(fn_m) = patterns::FUNCTION_KW.find(search) {
            let fn_start = m.end() + fn_m.start();
            let params_open = m.end() + fn_m.end() - 1;
            let end = function_body_end(text, params_open);
            inventory.functions.push(FunctionDef {
                name: format!("{generic}.{class_name}"),
                start_line: line_of(text, m.start()),
                end_line: line_of(text, end.saturating_sub(1).max(fn_start)),
                body: text[fn_start..end].to_string(),
                binding: MethodBinding::BoundTo(class_name.clone()),
            });
            // `definition = function(...)` argument style would also match
            // the free-function pattern; claim it so it is not re-recorded.
            for arg in patterns::FUNCTION_DEF.find_iter(&text[m.start()..call_end]) {
                if m.start() + arg.end() - 1 == params_open {
                    claimed_defs.insert(m.start() + arg.start());
                }
            }
        }
    }
}

/// Dotted names with exactly one interior dot are S3 methods: `print.foo`
/// binds to class `foo`. Leading-dot names are hidden objects, not methods.
fn s3_binding(name: &str) -> MethodBinding {
    if name.starts_with('.') || !name.contains('.') {
        return MethodBinding::Unbound;
    }
    let parts: Vec<&str> = name.split('.').collect();
    if parts.len() == 2 && !parts[1].is_empty() {
        MethodBinding::BoundTo(parts[1].to_string())
    } else {
        MethodBinding::Unbound
    }
}

fn extract_free_functions(
    text: &str,
    claimed_defs: &HashSet<usize>,
    inventory: &mut FileInventory,
) {
    for caps in patterns::FUNCTION_DEF.captures_iter(text) {
        let m = caps.get(0).expect("match");
        if claimed_defs.contains(&m.start()) {
            continue;
        }
        let name = caps[1].to_string();
        let params_open = m.end() - 1;
        let end = function_body_end(text, params_open);
        let binding = s3_binding(&name);

        if let MethodBinding::BoundTo(class_name) = &binding {
            let class = class_entry(&mut inventory.classes, class_name, ClassIdiom::S3);
            class.add_method(&name);
        }

        inventory.functions.push(FunctionDef {
            name,
            start_line: line_of(text, m.start()),
            end_line: line_of(text, end.saturating_sub(1).max(m.start())),
            body: text[m.start()..end].to_string(),
            binding,
        });
    }
    inventory.functions.sort_by_key(|f| f.start_line);
}

fn extract_namespace_refs(text: &str) -> Vec<String> {
    let mut refs = Vec::new();
    for caps in patterns::LIBRARY_CALL.captures_iter(text) {
        refs.push(caps[1].to_string());
    }
    for caps in patterns::NAMESPACE_REF.captures_iter(text) {
        refs.push(caps[1].to_string());
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn names(inv: &FileInventory) -> Vec<&str> {
        inv.functions.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn extracts_simple_function_with_braced_body() {
        let src = indoc! {r#"
            calculate_mean <- function(x) {
              if (length(x) == 0) {
                return(0)
              }
              sum(x) / length(x)
            }
        "#};
        let inv = extract(src);
        assert_eq!(names(&inv), vec!["calculate_mean"]);
        let f = &inv.functions[0];
        assert_eq!(f.start_line, 1);
        assert_eq!(f.end_line, 6);
        assert!(f.body.ends_with('}'));
        assert_eq!(f.binding, MethodBinding::Unbound);
        assert!(inv.classes.is_empty());
    }

    #[test]
    fn braceless_body_spans_to_statement_end() {
        let src = "double <- function(x) x * 2\nother <- 1\n";
        let inv = extract(src);
        assert_eq!(names(&inv), vec!["double"]);
        assert_eq!(inv.functions[0].body.trim_end(), "double <- function(x) x * 2");
    }

    #[test]
    fn braceless_body_with_open_parens_crosses_lines() {
        let src = "wrap <- function(x) paste(x,\n  'suffix')\nnext_thing <- 2\n";
        let inv = extract(src);
        assert!(inv.functions[0].body.contains("suffix"));
        assert!(!inv.functions[0].body.contains("next_thing"));
    }

    #[test]
    fn multiline_signature() {
        let src = "f <-\n  function (a,\n            b) {\n  a + b\n}\n";
        let inv = extract(src);
        assert_eq!(names(&inv), vec!["f"]);
        assert_eq!(inv.functions[0].start_line, 1);
    }

    #[test]
    fn unclosed_brace_truncates_at_eof() {
        let src = "broken <- function(x) {\n  if (x) {\n    1\n";
        let inv = extract(src);
        assert_eq!(names(&inv), vec!["broken"]);
        assert_eq!(inv.functions[0].body, src);
    }

    #[test]
    fn s3_method_binds_to_class() {
        let src = "print.myclass <- function(x) {\n  cat(x)\n}\n";
        let inv = extract(src);
        assert_eq!(
            inv.functions[0].binding,
            MethodBinding::BoundTo("myclass".to_string())
        );
        assert_eq!(inv.classes.len(), 1);
        assert_eq!(inv.classes[0].idiom, ClassIdiom::S3);
        assert_eq!(inv.classes[0].methods, vec!["print.myclass"]);
    }

    #[test]
    fn leading_dot_name_is_not_s3() {
        let src = ".hidden_helper <- function(x) x\n";
        let inv = extract(src);
        // leading-dot identifiers start at a non-word boundary; either way
        // nothing may bind to a class here
        assert!(inv.classes.is_empty());
    }

    #[test]
    fn r6_class_with_public_methods() {
        let src = indoc! {r#"
            MyClass <- R6Class("MyClass",
              public = list(
                greet = function() {
                  "hi"
                },
                bye = function() {
                  "bye"
                }
              )
            )
        "#};
        let inv = extract(src);
        assert_eq!(inv.classes.len(), 1);
        assert_eq!(inv.classes[0].idiom, ClassIdiom::R6);
        assert_eq!(inv.classes[0].methods, vec!["greet", "bye"]);
        assert_eq!(names(&inv), vec!["greet", "bye"]);
        assert!(inv
            .functions
            .iter()
            .all(|f| f.binding == MethodBinding::BoundTo("MyClass".to_string())));
    }

    #[test]
    fn r6_private_and_active_count_as_methods() {
        let src = indoc! {r#"
            Counter <- R6Class("Counter",
              public = list(
                increment = function() invisible(self)
              ),
              private = list(
                bump = function(n) n + 1
              ),
              active = list(
                value = function() private$count
              )
            )
        "#};
        let inv = extract(src);
        assert_eq!(inv.classes[0].methods, vec!["increment", "bump", "value"]);
    }

    #[test]
    fn r6_nested_helper_is_not_a_method() {
        let src = indoc! {r#"
            Outer <- R6Class("Outer",
              public = list(
                run = function() {
                  helper <- function(y) y + 1
                  helper(2)
                }
              )
            )
        "#};
        let inv = extract(src);
        assert_eq!(inv.classes[0].methods, vec!["run"]);
        // the nested helper is still its own scoreable definition
        assert!(names(&inv).contains(&"helper"));
    }

    #[test]
    fn ref_class_methods_list() {
        let src = indoc! {r#"
            Account <- setRefClass("Account",
              fields = list(balance = "numeric"),
              methods = list(
                deposit = function(amount) {
                  balance <<- balance + amount
                },
                show_balance = function() {
                  print(balance)
                }
              )
            )
        "#};
        let inv = extract(src);
        assert_eq!(inv.classes.len(), 1);
        assert_eq!(inv.classes[0].idiom, ClassIdiom::RefClass);
        assert_eq!(inv.classes[0].methods, vec!["deposit", "show_balance"]);
    }

    #[test]
    fn s4_class_and_method() {
        let src = indoc! {r#"
            setClass("Person", representation(name = "character"))
            setMethod("show", "Person", function(object) {
              cat(object@name)
            })
        "#};
        let inv = extract(src);
        assert_eq!(inv.classes.len(), 1);
        assert_eq!(inv.classes[0].idiom, ClassIdiom::S4);
        assert_eq!(inv.classes[0].methods, vec!["show"]);
        assert_eq!(names(&inv), vec!["show.Person"]);
        assert_eq!(
            inv.functions[0].binding,
            MethodBinding::BoundTo("Person".to_string())
        );
    }

    #[test]
    fn s4_method_without_setclass_registers_class() {
        let src = "setMethod(\"area\", \"Shape\", function(obj) obj@w * obj@h)\n";
        let inv = extract(src);
        assert_eq!(inv.classes[0].name, "Shape");
        assert_eq!(names(&inv), vec!["area.Shape"]);
    }

    #[test]
    fn namespace_refs_keep_duplicates() {
        let src = "library(dplyr)\nlibrary(ggplot2)\np <- ggplot2::ggplot(df)\n";
        let inv = extract(src);
        assert_eq!(inv.namespace_refs, vec!["dplyr", "ggplot2", "ggplot2"]);
    }

    #[test]
    fn nested_function_gets_its_own_def() {
        let src = indoc! {r#"
            outer <- function(x) {
              inner <- function(y) {
                if (y > 0) y else -y
              }
              inner(x)
            }
        "#};
        let inv = extract(src);
        assert_eq!(names(&inv), vec!["outer", "inner"]);
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_balancing() {
        let src = "f <- function(x) {\n  msg <- \"unbalanced { brace\"\n  x\n}\ng <- function(y) y\n";
        let inv = extract(src);
        assert_eq!(names(&inv), vec!["f", "g"]);
        assert!(inv.functions[0].body.trim_end().ends_with('}'));
    }
}

//! Cyclomatic complexity: 1 + decision points, counted lexically within a
//! function's own span. Decision points are `if` (an `else if` contributes
//! its own single `if` token), `for`, `while`, `repeat`, each `switch` case,
//! `&&`/`||` outside string literals, and `ifelse(...)` calls.

use crate::analyzers::normalize::{mask_strings, QuoteState};
use crate::analyzers::patterns;
use crate::core::{FunctionComplexity, FunctionDef};

pub fn cyclomatic(body: &str) -> u32 {
    let own = mask_nested_definitions(body);
    let masked = mask_strings(&own);

    let mut cc = 1u32;
    cc += patterns::KW_IF.find_iter(&masked).count() as u32;
    cc += patterns::KW_FOR.find_iter(&masked).count() as u32;
    cc += patterns::KW_WHILE.find_iter(&masked).count() as u32;
    cc += patterns::KW_REPEAT.find_iter(&masked).count() as u32;
    cc += patterns::KW_IFELSE.find_iter(&masked).count() as u32;
    cc += count_logical_operators(&masked);
    cc += count_switch_cases(&masked);
    cc
}

/// Per-function detail records in source order.
pub fn score_functions(functions: &[FunctionDef]) -> Vec<FunctionComplexity> {
    functions
        .iter()
        .map(|f| FunctionComplexity {
            function: f.name.clone(),
            start_line: f.start_line,
            cc: cyclomatic(&f.body),
        })
        .collect()
}

/// Blank out nested function definitions so their decision points are
/// attributed to their own records, not the enclosing function's. The
/// function's own header (a match at offset 0) is kept.
fn mask_nested_definitions(body: &str) -> String {
    let mut spans: Vec<(usize, usize)> = Vec::new();
    for m in patterns::FUNCTION_DEF.find_iter(body) {
        if m.start() == 0 {
            continue;
        }
        let params_open = m.end() - 1;
        let end = nested_body_end(body, params_open);
        spans.push((m.start(), end));
    }
    if spans.is_empty() {
        return body.to_string();
    }

    let mut bytes: Vec<u8> = body.bytes().collect();
    for (start, end) in spans {
        let len = bytes.len();
        for b in &mut bytes[start..end.min(len)] {
            if *b != b'\n' {
                *b = b' ';
            }
        }
    }
    String::from_utf8(bytes).unwrap_or_else(|_| body.to_string())
}

// Same span rule the extractor uses; duplicated at this seam on purpose so
// the scorer works on any body text, including truncated ones.
fn nested_body_end(text: &str, params_open: usize) -> usize {
    let mut depth = 0i32;
    let mut state = QuoteState::new();
    let mut params_end = text.len();
    for (i, c) in text[params_open..].char_indices() {
        if !state.advance(c) {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth <= 0 {
                    params_end = params_open + i + 1;
                    break;
                }
            }
            _ => {}
        }
    }

    let mut body_start = params_end;
    for (i, c) in text[params_end..].char_indices() {
        if c.is_whitespace() {
            continue;
        }
        body_start = params_end + i;
        if c != '{' {
            // braceless nested body: to end of line at depth zero
            let mut st = QuoteState::new();
            let mut pd = 0i32;
            for (j, c2) in text[body_start..].char_indices() {
                if !st.advance(c2) {
                    continue;
                }
                match c2 {
                    '(' => pd += 1,
                    ')' => pd -= 1,
                    '\n' if pd <= 0 => return body_start + j,
                    _ => {}
                }
            }
            return text.len();
        }
        let mut st = QuoteState::new();
        let mut bd = 0i32;
        for (j, c2) in text[body_start..].char_indices() {
            if !st.advance(c2) {
                continue;
            }
            match c2 {
                '{' => bd += 1,
                '}' => {
                    bd -= 1;
                    if bd <= 0 {
                        return body_start + j + 1;
                    }
                }
                _ => {}
            }
        }
        return text.len();
    }
    text.len()
}

/// `&&` and `||`, counted on string-masked text. `&` and `|` alone are
/// vectorized operators, not short-circuit decisions.
fn count_logical_operators(masked: &str) -> u32 {
    let bytes = masked.as_bytes();
    let mut count = 0u32;
    let mut i = 0;
    while i + 1 < bytes.len() {
        if (bytes[i] == b'&' && bytes[i + 1] == b'&') || (bytes[i] == b'|' && bytes[i + 1] == b'|')
        {
            count += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

/// One decision point per `case` of `switch(selector, case, ...)`: the
/// top-level commas of the balanced argument list.
fn count_switch_cases(masked: &str) -> u32 {
    let mut cases = 0u32;
    for m in patterns::KW_SWITCH.find_iter(masked) {
        let open = m.end() - 1;
        let mut depth = 0i32;
        let mut state = QuoteState::new();
        for c in masked[open..].chars() {
            if !state.advance(c) {
                continue;
            }
            match c {
                '(' | '[' => depth += 1,
                ')' | ']' => {
                    depth -= 1;
                    if depth <= 0 {
                        break;
                    }
                }
                '{' => depth += 1,
                '}' => depth -= 1,
                ',' if depth == 1 => cases += 1,
                _ => {}
            }
        }
    }
    cases
}

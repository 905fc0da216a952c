//! Source normalization: comment stripping and logical line counting.
//!
//! R is whitespace-insensitive and `#` starts a comment only outside string
//! literals, so everything here runs through a small quote state machine.
//! Backtick-quoted identifiers are treated like string literals: a `#`, brace
//! or quote inside backticks is content, not syntax.

/// Tracks whether the scan position is inside a string literal or a
/// backtick-quoted identifier. Shared by the normalizer, the brace balancer
/// and the complexity scorer.
#[derive(Debug, Default, Clone)]
pub struct QuoteState {
    in_single: bool,
    in_double: bool,
    in_backtick: bool,
    escaped: bool,
}

impl QuoteState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_literal(&self) -> bool {
        self.in_single || self.in_double || self.in_backtick
    }

    /// Advance over one character. Returns true when the character is plain
    /// code: outside any literal and not itself a quote delimiter.
    pub fn advance(&mut self, c: char) -> bool {
        if self.escaped {
            self.escaped = false;
            return false;
        }
        if c == '\\' {
            if self.in_literal() {
                self.escaped = true;
            }
            return !self.in_literal();
        }
        match c {
            '\'' if !self.in_double && !self.in_backtick => {
                self.in_single = !self.in_single;
                false
            }
            '"' if !self.in_single && !self.in_backtick => {
                self.in_double = !self.in_double;
                false
            }
            '`' if !self.in_single && !self.in_double => {
                self.in_backtick = !self.in_backtick;
                false
            }
            _ => !self.in_literal(),
        }
    }
}

/// Normalizer output: physical line count, logical line count and the
/// comment-stripped text (line structure preserved, strings verbatim).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub total_lines: usize,
    pub loc: usize,
    pub stripped: String,
}

/// Pure transform; never fails. An unterminated string literal leaves the
/// remainder of its line as literal content.
pub fn normalize(text: &str) -> Normalized {
    let mut total_lines = 0;
    let mut loc = 0;
    let mut stripped_lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        total_lines += 1;
        let code = strip_comment(line);
        if !code.trim().is_empty() {
            loc += 1;
        }
        stripped_lines.push(code);
    }

    Normalized {
        total_lines,
        loc,
        stripped: stripped_lines.join("\n"),
    }
}

/// Cut a line at the first `#` that sits outside any string literal.
/// Quote state is per line: R strings rarely span lines, and an unterminated
/// quote must not poison the rest of the file.
pub fn strip_comment(line: &str) -> &str {
    let mut state = QuoteState::new();
    for (idx, c) in line.char_indices() {
        let code = state.advance(c);
        if c == '#' && code {
            return &line[..idx];
        }
    }
    line
}

/// Replace string-literal contents (and their delimiters) with spaces so
/// downstream token counting cannot match inside strings. Newlines survive
/// to keep line arithmetic intact.
pub fn mask_strings(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = QuoteState::new();
    for c in text.chars() {
        if state.advance(c) || c == '\n' {
            out.push(c);
        } else {
            out.push(' ');
        }
    }
    out
}

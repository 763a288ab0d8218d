//! Noise-tolerant scanner for the Spanish schema language.
//!
//! Input is split on whitespace and `. , : ; [ ]`; a double-quoted run is a
//! single string token (an unterminated quote ends at the end of the line).
//! Each word is dropped if it is a noise word, otherwise classified by the
//! first rule that matches, in the order of [`classify`].

use tracing::trace;

use crate::deontic::{ComplianceType, DeonticOperator};
use crate::text::{eq_fold, starts_with_fold};
use crate::token::Token;

/// Filler words discarded before classification (case-insensitive).
pub const NOISE_WORDS: &[&str] = &[
    "comienza", "como", "un", "una", "que", "en", "personas", "establecen", "dentro", "del",
    "dadas", "condiciones", "legales", "forma", "requerida", "la", "norma", "si", "hay", "de",
    "please", "hello", "maybe", "a", "al", "por", "con", "esta", "incluye", "para", "su", "los",
    "las", "es", "son", "está", "están", "ha", "han", "fue", "fueron", "será", "serán", "&", "$",
    "el", "pero", "siguiente", "resolución", "lo", "proteger", "sus", "derechos", "e",
    "intereses",
];

/// Closed vocabulary of role nouns recognised without an article prefix.
pub const ROLE_NOUNS: &[&str] = &[
    "comprador",
    "vendedor",
    "arrendador",
    "arrendatario",
    "acreedor",
    "deudor",
    "juez",
    "quejoso",
    "autoridad",
    "trabajador",
    "empleador",
    "parte1",
    "parte2",
];

const INSTITUTION_TYPES: &[&str] = &[
    "contrato",
    "procedimiento",
    "acto-juridico",
    "hecho-juridico",
    "acto",
    "hecho",
];

const MULTIPLICITIES: &[&str] = &["múltiples", "multiples", "multiple", "una", "single"];

pub fn is_noise_word(word: &str) -> bool {
    NOISE_WORDS.iter().any(|noise| eq_fold(word, noise))
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '.' | ',' | ':' | ';' | '[' | ']')
}

fn any_fold(word: &str, list: &[&str]) -> bool {
    list.iter().any(|kw| eq_fold(word, kw))
}

/// Parse an integer literal, tolerating one trailing period.
fn parse_number(word: &str) -> Option<u32> {
    let digits = word.strip_suffix('.').unwrap_or(word);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Classify a single non-noise word. First matching rule wins.
pub fn classify(word: &str) -> Token {
    if eq_fold(word, "institution") || eq_fold(word, "[institution]") {
        return Token::Institution;
    }
    if let Some(n) = parse_number(word) {
        return Token::Number(n);
    }
    if eq_fold(word, "regla") {
        return Token::NormReference;
    }
    if let Some(op) = DeonticOperator::parse_keyword(word) {
        return Token::Deontic(op);
    }
    if eq_fold(word, "en-caso-que") {
        return Token::Conditional;
    }
    if eq_fold(word, "y") {
        return Token::Conjunction;
    }
    if eq_fold(word, "violación") || starts_with_fold(word, "violacion") {
        return Token::Violation;
    }
    if eq_fold(word, "entonces") {
        return Token::Consequence;
    }
    if eq_fold(word, "hecho") || starts_with_fold(word, "hecho-juridico") {
        return Token::Fact;
    }
    if eq_fold(word, "evidencia") {
        return Token::Evidence;
    }

    // ── Agenda markers ──
    if eq_fold(word, "busca") {
        return Token::Seek;
    }
    if eq_fold(word, "establezca") {
        return Token::Establish;
    }
    if eq_fold(word, "cumplimiento") || eq_fold(word, "incumplimiento") {
        return Token::Compliance(ComplianceType::from_keyword(word));
    }
    if eq_fold(word, "adjudique") {
        return Token::Adjudicate;
    }
    if starts_with_fold(word, "lo-esencial") || eq_fold(word, "esencial") {
        return Token::Essential;
    }
    if starts_with_fold(word, "lo-siguiente") || eq_fold(word, "siguiente") {
        return Token::Following;
    }

    if starts_with_fold(word, "actua") {
        return Token::Scope;
    }
    if any_fold(word, INSTITUTION_TYPES) {
        return Token::InstitutionType(word.to_string());
    }
    if any_fold(word, MULTIPLICITIES) {
        return Token::Multiplicity(word.to_string());
    }
    if starts_with_fold(word, "derecho-") {
        return Token::LegalDomain(word.to_string());
    }
    if starts_with_fold(word, "el-") || starts_with_fold(word, "la-") || any_fold(word, ROLE_NOUNS)
    {
        return Token::Role(word.to_string());
    }
    if word.chars().next().is_some_and(char::is_uppercase) {
        return Token::InstitutionName(word.to_string());
    }
    Token::Word(word.to_string())
}

/// Lazy token stream over a borrowed input.
///
/// [`Lexer::next_token`] returns [`Token::End`] once input is exhausted (and
/// on every call after that). The `Iterator` impl stops before the sentinel.
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    token_line: usize,
    token_column: usize,
    text: &'a str,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            token_line: 1,
            token_column: 1,
            text: "",
            done: false,
        }
    }

    /// Line of the most recent token (1-based).
    pub fn line(&self) -> usize {
        self.token_line
    }

    /// Column of the most recent token (1-based, in characters).
    pub fn column(&self) -> usize {
        self.token_column
    }

    /// Raw text of the most recent token; quotes are not included.
    pub fn text(&self) -> &'a str {
        self.text
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_separators(&mut self) {
        while self.peek().is_some_and(is_separator) {
            self.bump();
        }
    }

    fn quoted(&mut self) -> &'a str {
        self.bump();
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c == '"' || c == '\n' {
                break;
            }
            self.bump();
        }
        let input = self.input;
        let content = &input[start..self.pos];
        if self.peek() == Some('"') {
            self.bump();
        }
        content
    }

    fn word(&mut self) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(|c| !is_separator(c)) {
            self.bump();
        }
        let input = self.input;
        &input[start..self.pos]
    }

    /// Scan the next token, skipping separators and noise words.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_separators();
            self.token_line = self.line;
            self.token_column = self.column;

            match self.peek() {
                None => {
                    self.text = "";
                    return Token::End;
                }
                Some('"') => {
                    let content = self.quoted();
                    self.text = content;
                    trace!(line = self.token_line, column = self.token_column, content, "string");
                    return Token::String(content.to_string());
                }
                Some(_) => {
                    let word = self.word();
                    if is_noise_word(word) {
                        trace!(word, "skipping noise word");
                        continue;
                    }
                    self.text = word;
                    let token = classify(word);
                    trace!(
                        line = self.token_line,
                        column = self.token_column,
                        token = %token,
                        "classified"
                    );
                    return token;
                }
            }
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Token::End => {
                self.done = true;
                None
            }
            token => Some(token),
        }
    }
}

/// Tokenize a whole input, without the end sentinel.
pub fn tokenize(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

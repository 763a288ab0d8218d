//! Recursive-descent grammar that turns the token stream into a [`Schema`].
//!
//! ```text
//! schema      := institution item*
//! institution := INSTITUTION name TYPE? MULTIPLICITY? DOMAIN?
//! item        := norm | violation | fact | agenda
//! norm        := NUMBER ROLE DEONTIC phrase scope? condition?
//! scope       := SCOPE phrase
//! condition   := CONDITIONAL cond (CONJUNCTION cond)*
//! cond        := NORM_REF NUMBER | phrase
//! violation   := VIOLATION NORM_REF? NUMBER (CONJUNCTION NUMBER)?
//!                CONSEQUENCE ROLE DEONTIC? phrase
//! fact        := FACT phrase EVIDENCE phrase
//! agenda      := ROLE SEEK ESTABLISH? COMPLIANCE name? ADJUDICATE? ROLE?
//!                (ESSENTIAL | FOLLOWING remedy (CONJUNCTION remedy)*)
//! ```
//!
//! Only the public construction API of [`Schema`] is used, so another
//! grammar can replace this one.

use tracing::debug;

use crate::deontic::{DeonticOperator, Multiplicity};
use crate::error::ParseError;
use crate::lexer::Lexer;
use crate::schema::{
    Agenda, Condition, Institution, LegalFact, Norm, Relief, Schema, ViolatedNorms, Violation,
};
use crate::text::starts_with_fold;
use crate::token::Token;

/// Parse a complete schema document.
pub fn parse_schema(input: &str) -> Result<Schema, ParseError> {
    let schema = Parser::new(input).schema()?;
    debug!(
        norms = schema.norms().len(),
        violations = schema.violations().len(),
        facts = schema.facts().len(),
        agendas = schema.agendas().len(),
        "parsed schema"
    );
    Ok(schema)
}

/// Drop a leading `el-` / `la-` article from a role word.
pub fn normalize_role(raw: &str) -> String {
    let stripped = if starts_with_fold(raw, "el-") || starts_with_fold(raw, "la-") {
        raw.get(3..).unwrap_or(raw)
    } else {
        raw
    };
    stripped.to_string()
}

struct Spanned {
    token: Token,
    line: usize,
    column: usize,
    text: String,
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let end = token == Token::End;
            tokens.push(Spanned {
                token,
                line: lexer.line(),
                column: lexer.column(),
                text: lexer.text().to_string(),
            });
            if end {
                break;
            }
        }
        Self { tokens, pos: 0 }
    }

    // ── Cursor ──

    fn peek_at(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)].token
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn error(&self, expected: &str) -> ParseError {
        let last = self.tokens.len() - 1;
        let at = &self.tokens[self.pos.min(last)];
        let found = if at.token == Token::End {
            at.token.kind().to_string()
        } else {
            format!("{} '{}'", at.token.kind(), at.text)
        };
        ParseError {
            line: at.line,
            column: at.column,
            message: format!("expected {expected}, found {found}"),
        }
    }

    fn expect_number(&mut self) -> Result<u32, ParseError> {
        match self.peek() {
            Token::Number(n) => {
                let n = *n;
                self.advance();
                Ok(n)
            }
            _ => Err(self.error("norm number")),
        }
    }

    fn expect_role(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Token::Role(raw) => {
                let role = normalize_role(raw);
                self.advance();
                Ok(role)
            }
            _ => Err(self.error("role")),
        }
    }

    /// A role token that opens an agenda, so it cannot continue a phrase.
    fn at_agenda_start(&self) -> bool {
        matches!(self.peek(), Token::Role(_)) && *self.peek_at(1) == Token::Seek
    }

    /// One or more text-bearing tokens joined by spaces. With
    /// `allow_conjunction`, `y` is read as a plain word.
    fn phrase(&mut self, what: &str, allow_conjunction: bool) -> Result<String, ParseError> {
        let mut words: Vec<String> = Vec::new();
        loop {
            if self.at_agenda_start() {
                break;
            }
            match self.peek() {
                Token::Conjunction if allow_conjunction && !words.is_empty() => {
                    words.push(self.tokens[self.pos].text.clone());
                }
                token => match token.text() {
                    Some(text) => words.push(text.to_string()),
                    None => break,
                },
            }
            self.advance();
        }
        if words.is_empty() {
            return Err(self.error(what));
        }
        Ok(words.join(" "))
    }

    // ── Productions ──

    fn schema(mut self) -> Result<Schema, ParseError> {
        let mut schema = Schema::new();
        schema.set_institution(self.institution()?);
        loop {
            match self.peek() {
                Token::End => break,
                Token::Number(_) => self.norm(&mut schema)?,
                Token::Violation => self.violation(&mut schema)?,
                Token::Fact => self.fact(&mut schema)?,
                Token::Role(_) => self.agenda(&mut schema)?,
                _ => return Err(self.error("norm, violation, fact or agenda")),
            }
        }
        Ok(schema)
    }

    fn institution(&mut self) -> Result<Institution, ParseError> {
        if *self.peek() != Token::Institution {
            return Err(self.error("institution marker"));
        }
        self.advance();

        let name = match self.peek() {
            Token::InstitutionName(s) | Token::Word(s) | Token::String(s) => s.clone(),
            _ => return Err(self.error("institution name")),
        };
        self.advance();

        let mut type_name = String::from("contrato");
        if let Token::InstitutionType(s) = self.peek() {
            type_name = s.clone();
            self.advance();
        }
        let mut multiplicity = Multiplicity::Multiple;
        if let Token::Multiplicity(s) = self.peek() {
            multiplicity = Multiplicity::from_keyword(s);
            self.advance();
        }
        let mut domain = String::new();
        if let Token::LegalDomain(s) = self.peek() {
            domain = s.clone();
            self.advance();
        }
        Ok(Institution::new(name, type_name, multiplicity, domain))
    }

    fn norm(&mut self, schema: &mut Schema) -> Result<(), ParseError> {
        let id_at = self.pos;
        let id = self.expect_number()?;
        let role = self.expect_role()?;
        let deontic = match self.peek() {
            Token::Deontic(op) => *op,
            _ => return Err(self.error("deontic operator")),
        };
        self.advance();
        let action = self.phrase("action", true)?;

        let mut norm = Norm::new(id, role, deontic, action);
        if *self.peek() == Token::Scope {
            self.advance();
            norm.scope = Some(self.phrase("scope", true)?);
        }
        if *self.peek() == Token::Conditional {
            self.advance();
            norm.conditions.push(self.condition()?);
            while *self.peek() == Token::Conjunction {
                self.advance();
                norm.conditions.push(self.condition()?);
            }
        }

        schema.add_norm(norm).map_err(|e| {
            let at = &self.tokens[id_at];
            ParseError {
                line: at.line,
                column: at.column,
                message: e.to_string(),
            }
        })?;
        Ok(())
    }

    fn condition(&mut self) -> Result<Condition, ParseError> {
        if *self.peek() == Token::NormReference {
            self.advance();
            return Ok(Condition::NormReference(self.expect_number()?));
        }
        Ok(Condition::Text(self.phrase("condition", false)?))
    }

    fn violation(&mut self, schema: &mut Schema) -> Result<(), ParseError> {
        self.advance();
        if *self.peek() == Token::NormReference {
            self.advance();
        }
        let first = self.expect_number()?;
        let norms = if *self.peek() == Token::Conjunction {
            self.advance();
            if *self.peek() == Token::NormReference {
                self.advance();
            }
            ViolatedNorms::Compound(first, self.expect_number()?)
        } else {
            ViolatedNorms::Single(first)
        };

        if *self.peek() != Token::Consequence {
            return Err(self.error("'entonces'"));
        }
        self.advance();
        let role = self.expect_role()?;
        let deontic = match self.peek() {
            Token::Deontic(op) => {
                let op = *op;
                self.advance();
                op
            }
            _ => DeonticOperator::ClaimRight,
        };
        let consequence = self.phrase("consequence", true)?;
        schema.add_violation(Violation {
            norms,
            role,
            deontic,
            consequence,
        });
        Ok(())
    }

    fn fact(&mut self, schema: &mut Schema) -> Result<(), ParseError> {
        self.advance();
        let description = self.phrase("fact description", true)?;
        if *self.peek() != Token::Evidence {
            return Err(self.error("'evidencia'"));
        }
        self.advance();
        let evidence = self.phrase("evidence", true)?;
        schema.add_fact(LegalFact {
            description,
            evidence,
        });
        Ok(())
    }

    fn agenda(&mut self, schema: &mut Schema) -> Result<(), ParseError> {
        let requesting_role = self.expect_role()?;
        if *self.peek() != Token::Seek {
            return Err(self.error("'busca'"));
        }
        self.advance();
        if *self.peek() == Token::Establish {
            self.advance();
        }
        let compliance = match self.peek() {
            Token::Compliance(c) => *c,
            _ => return Err(self.error("'cumplimiento' or 'incumplimiento'")),
        };
        self.advance();

        let institution = match self.peek() {
            Token::InstitutionName(s) | Token::String(s) => {
                let s = s.clone();
                self.advance();
                s
            }
            _ => schema
                .institution()
                .map(|i| i.name.clone())
                .unwrap_or_default(),
        };
        if *self.peek() == Token::Adjudicate {
            self.advance();
        }
        let beneficiary_role = match self.peek() {
            Token::Role(_) => self.expect_role()?,
            _ => requesting_role.clone(),
        };

        let relief = match self.peek() {
            Token::Essential => {
                self.advance();
                Relief::Essential
            }
            Token::Following => {
                self.advance();
                let mut remedies = vec![self.phrase("remedy", false)?];
                while *self.peek() == Token::Conjunction {
                    self.advance();
                    remedies.push(self.phrase("remedy", false)?);
                }
                Relief::Remedies(remedies)
            }
            _ => return Err(self.error("'lo-esencial' or 'lo-siguiente'")),
        };

        schema.add_agenda(Agenda {
            requesting_role,
            compliance,
            institution,
            beneficiary_role,
            relief,
        });
        Ok(())
    }
}

//! Parser for the netlist format.

use std::collections::HashMap;

use super::ast::*;
use super::lexer::{parse_value, Lexer, Token, TokenKind};
use crate::components::ComponentKind;
use crate::error::{OhmlabError, Result};

/// Parser for netlists.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a new parser with the given lexer.
    pub fn new(mut lexer: Lexer<'a>) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the entire netlist.
    pub fn parse(&mut self) -> Result<SchematicAst> {
        let mut ast = SchematicAst::new();

        while self.current.kind != TokenKind::Eof {
            // Skip empty lines
            if self.current.kind == TokenKind::Newline {
                self.advance()?;
                continue;
            }

            match self.current.kind {
                TokenKind::Directive => self.parse_directive(&mut ast)?,
                TokenKind::Identifier => {
                    let component = self.parse_component()?;
                    ast.components.push(component);
                }
                _ => {
                    return Err(OhmlabError::parse(
                        self.current.line,
                        format!("unexpected token: {:?}", self.current.text),
                    ));
                }
            }

            self.end_of_line()?;
        }

        Ok(ast)
    }

    fn advance(&mut self) -> Result<()> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn at_line_end(&self) -> bool {
        matches!(self.current.kind, TokenKind::Newline | TokenKind::Eof)
    }

    fn end_of_line(&mut self) -> Result<()> {
        match self.current.kind {
            TokenKind::Newline => self.advance(),
            TokenKind::Eof => Ok(()),
            _ => Err(OhmlabError::parse(
                self.current.line,
                format!("unexpected trailing token: {:?}", self.current.text),
            )),
        }
    }

    /// Consume a net name; nets may look like numbers ("0", "12").
    fn expect_net(&mut self, what: &str) -> Result<String> {
        match self.current.kind {
            TokenKind::Identifier | TokenKind::Number => {
                let text = self.current.text.clone();
                self.advance()?;
                Ok(text)
            }
            _ => Err(OhmlabError::parse(self.current.line, format!("expected {}", what))),
        }
    }

    fn expect_value(&mut self) -> Result<f64> {
        let tok = self.current.clone();
        match tok.kind {
            TokenKind::Number | TokenKind::Identifier => {
                self.advance()?;
                parse_value(&tok.text)
                    .ok_or_else(|| OhmlabError::parse(tok.line, format!("invalid number: {}", tok.text)))
            }
            _ => Err(OhmlabError::parse(tok.line, "expected a value")),
        }
    }

    fn parse_directive(&mut self, ast: &mut SchematicAst) -> Result<()> {
        let directive = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        match directive.to_lowercase().as_str() {
            ".ground" | ".gnd" => {
                let net = self.expect_net("a net name after .ground")?;
                if ast.ground_net.is_some() {
                    return Err(OhmlabError::parse(line, "ground net is already set"));
                }
                ast.ground_net = Some(net);
            }
            ".supply" => {
                let volts = self.expect_value()?;
                if !volts.is_finite() {
                    return Err(OhmlabError::parse(line, "supply voltage must be finite"));
                }
                ast.supply = Some(volts);
            }
            _ => {
                return Err(OhmlabError::parse(line, format!("unknown directive: {}", directive)));
            }
        }

        Ok(())
    }

    fn parse_component(&mut self) -> Result<ComponentDef> {
        let first_token = self.current.text.clone();
        let line = self.current.line;
        self.advance()?;

        // Spelled-out kinds ("RESISTOR R1 a b") take the name from the next token
        let (kind, name) = match long_keyword(&first_token) {
            Some(kind) => (kind, self.expect_net("a component name")?),
            None => {
                let kind = kind_from_prefix(&first_token).ok_or_else(|| OhmlabError::UnknownComponentType {
                    component_type: first_token.clone(),
                    line,
                })?;
                (kind, first_token)
            }
        };

        let mut nets = Vec::with_capacity(2);
        let mut values = Vec::new();
        let mut params = HashMap::new();
        let mut state = None;

        while !self.at_line_end() {
            let tok = self.current.clone();
            match tok.kind {
                TokenKind::Identifier | TokenKind::Number if nets.len() < 2 => {
                    self.advance()?;
                    if self.current.kind == TokenKind::Equals {
                        return Err(OhmlabError::invalid_component(
                            &name,
                            line,
                            format!("parameter '{}' given before both nets", tok.text),
                        ));
                    }
                    nets.push(tok.text);
                }
                TokenKind::Identifier => {
                    self.advance()?;
                    if self.current.kind == TokenKind::Equals {
                        self.advance()?;
                        let key = tok.text.to_lowercase();
                        let value_tok = self.current.clone();
                        match (kind, switch_state(&value_tok.text)) {
                            (ComponentKind::Switch, Some(closed)) if key == "state" => {
                                self.advance()?;
                                state = Some(closed);
                            }
                            _ => {
                                let value = self.expect_value()?;
                                params.insert(key, value);
                            }
                        }
                        continue;
                    }

                    match (kind, switch_state(&tok.text)) {
                        (ComponentKind::Switch, Some(closed)) => state = Some(closed),
                        _ => {
                            return Err(OhmlabError::invalid_component(
                                &name,
                                line,
                                format!("unexpected word '{}'", tok.text),
                            ));
                        }
                    }
                }
                TokenKind::Number => {
                    self.advance()?;
                    let value = parse_value(&tok.text)
                        .ok_or_else(|| OhmlabError::parse(line, format!("invalid number: {}", tok.text)))?;
                    values.push(value);
                }
                _ => {
                    return Err(OhmlabError::parse(
                        line,
                        format!("unexpected token: {:?}", tok.text),
                    ));
                }
            }
        }

        if nets.len() < 2 {
            return Err(OhmlabError::invalid_component(
                &name,
                line,
                format!("expected 2 nets, got {}", nets.len()),
            ));
        }

        Ok(ComponentDef {
            kind,
            name,
            nets,
            values,
            params,
            state,
            line,
        })
    }
}

/// Spelled-out kind names used as a leading keyword.
fn long_keyword(word: &str) -> Option<ComponentKind> {
    if word.len() > 3 {
        ComponentKind::from_keyword(word)
    } else {
        None
    }
}

/// Kind from a component name's prefix. Longer prefixes are checked first so
/// `VM1` is a voltmeter and `SW1` a switch. That also makes `VMAIN` a
/// voltmeter; such names need the keyword form (`SOURCE VMAIN ...`).
fn kind_from_prefix(name: &str) -> Option<ComponentKind> {
    let upper = name.to_uppercase();
    let prefixes = [
        ("VM", ComponentKind::Voltmeter),
        ("POT", ComponentKind::Potentiometer),
        ("SW", ComponentKind::Switch),
        ("AM", ComponentKind::Ammeter),
        ("V", ComponentKind::VoltageSource),
        ("R", ComponentKind::Resistor),
        ("W", ComponentKind::Wire),
        ("A", ComponentKind::Ammeter),
    ];
    prefixes
        .iter()
        .find(|(prefix, _)| upper.starts_with(prefix))
        .map(|(_, kind)| *kind)
}

/// Switch state keywords; `Some(true)` means closed.
fn switch_state(word: &str) -> Option<bool> {
    match word.to_lowercase().as_str() {
        "closed" | "on" => Some(true),
        "open" | "off" => Some(false),
        _ => None,
    }
}

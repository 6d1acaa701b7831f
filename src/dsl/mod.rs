//! Netlist parser for bench schematics.
//!
//! This module provides a SPICE-inspired text format for describing the
//! schematics built on the bench. The format is line-oriented and
//! human-editable.
//!
//! # Grammar Overview
//!
//! ```text
//! netlist     = { line }
//! line        = comment | directive | component | empty
//! comment     = ('#' | ';') { any_char }
//! directive   = '.' directive_name argument
//! component   = [keyword] name net net { value | state | param }
//!
//! directive_name = "ground" | "supply"
//! name        = identifier
//! net         = identifier | number
//! value       = number [unit_suffix] [unit]
//! state       = "open" | "closed" | "on" | "off"
//! param       = identifier '=' (value | state)
//!
//! number      = ['-'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'm' | 'k' | 'M' | 'G'
//! unit        = "V" | "A" | "Ohm" | "Ohms" | "Ω"    (any case)
//! identifier  = (letter | '_') { letter | digit | '_' }
//! ```
//!
//! # Component Types
//!
//! | Prefix | Description | Syntax |
//! |--------|-------------|--------|
//! | V | Voltage Source | `V<name> <n+> <n-> [volts]` |
//! | R | Resistor | `R<name> <a> <b> [ohms]` |
//! | POT | Potentiometer | `POT<name> <a> <b> [max] [position]` |
//! | SW | Switch | `SW<name> <a> <b> [open\|closed]` |
//! | W | Wire | `W<name> <a> <b>` |
//! | A, AM | Ammeter | `AM<name> <a> <b>` |
//! | VM | Voltmeter | `VM<name> <a> <b>` |
//!
//! The longest matching prefix wins, so `VMAIN` is a voltmeter and `AMP1` an
//! ammeter. Spell out the kind for such names: `SOURCE VMAIN top 0 9`. The
//! keywords are `SOURCE`, `RESISTOR`, `POTENTIOMETER`, `SWITCH`, `WIRE`,
//! `AMMETER` and `VOLTMETER`.
//!
//! Net names may start with a digit (`1a`, `3v3`). A unit word is only
//! stripped where a value is expected.
//!
//! The nets `0` and `GND` are ground unless `.ground` names another net.
//!
//! # Example
//!
//! ```text
//! # Divider with a meter on the bottom leg
//! .supply 9
//!
//! V1   top  0    9
//! R1   top  mid  1k
//! R2   mid  0    2k
//! VM1  mid  0
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a netlist string into an AST.
pub fn parse(input: &str) -> Result<SchematicAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<SchematicAst> {
    let content = std::fs::read_to_string(path).map_err(|e| crate::error::OhmlabError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;
    parse(&content)
}

//! Netlist readers.
//!
//! Two formats are understood: a SPICE-like netlist with analysis commands,
//! and the bare legacy format handled by [`parse_legacy`].
//!
//! # SPICE-like grammar
//!
//! ```text
//! netlist   = title { line }
//! line      = comment | command | element | empty
//! comment   = '*' { any_char }            (first non-blank character only)
//!           | ('#' | ';') { any_char }    (anywhere)
//! command   = ".ac" ("lin" | "dec" | "oct") points fstart fstop
//!           | ".print" { probe | word }
//!           | ".end"
//! probe     = ('V' | 'I' | 'P') [view] '(' arg [',' arg] ')'
//! view      = "re" | "im" | "mag" | "ph"
//! value     = number [si_suffix]
//! si_suffix = 'f' | 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | "meg" | 'g' | 't'
//! ```
//!
//! Node `0` is ground; `GND` in any case is an alias for it.
//!
//! # Element types
//!
//! | Prefix | Element | Syntax |
//! |--------|---------|--------|
//! | R | Resistor | `R<name> <a> <b> <value>` |
//! | C | Capacitor | `C<name> <a> <b> <value>` |
//! | L | Inductor | `L<name> <a> <b> <value>` |
//! | V, E | Voltage source | `V<name> <pos> <neg> [DC] <value> [AC <value>]` |
//! | I | Current source | `I<name> <pos> <neg> [DC] <value> [AC <value>]` |
//! | OPA | Ideal op-amp | `OPA<name> <in+> <in-> <out>` |
//!
//! # Example
//!
//! ```text
//! RC low-pass
//! V1   in   0    DC 0 AC 1
//! R1   in   out  1k
//! C1   out  0    100n
//! .ac dec 10 10 100k
//! .print Vmag(out) Vph(out)
//! .end
//! ```

mod ast;
mod legacy;
mod lexer;
mod parser;

pub use ast::Netlist;
pub use legacy::{parse_legacy, LEGACY_GROUND};
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a SPICE-like netlist string.
pub fn parse(input: &str) -> Result<Netlist> {
    Parser::new(input).parse()
}

/// Read a netlist file into a string.
#[cfg(feature = "cli")]
pub fn read_file(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| crate::error::SpiceError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Parse a SPICE-like netlist file.
#[cfg(feature = "cli")]
pub fn parse_file(path: &std::path::Path) -> Result<Netlist> {
    parse(&read_file(path)?)
}

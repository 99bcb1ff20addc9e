//! Values of the runtime whose failed calls are being explained.
//!
//! The analyzers only ever *inspect* terms, so the model favours cheap
//! structural queries (`as_binary`, `proper_list`, `map_get`, ...) over a
//! faithful memory layout.

pub mod lexer;
pub mod parser;

pub use parser::{parse_term, parse_terms, ParseError};

use std::fmt;

/// Byte range within term source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub const UNKNOWN: Span = Span { start: 0, end: 0 };
}

/// A sequence of bits. Byte-aligned when `trailing_bits == 0`, in which case
/// it is a binary. Otherwise the last byte holds `trailing_bits` low bits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bitstring {
    pub bytes: Vec<u8>,
    pub trailing_bits: u8,
}

impl Bitstring {
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Bitstring { bytes: bytes.into(), trailing_bits: 0 }
    }

    pub fn is_binary(&self) -> bool {
        self.trailing_bits == 0
    }
}

/// Process identifier, printed as `<node.id.serial>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pid {
    pub node: u32,
    pub id: u32,
    pub serial: u32,
}

impl Pid {
    pub fn local(id: u32) -> Self {
        Pid { node: 0, id, serial: 0 }
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}.{}.{}>", self.node, self.id, self.serial)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Atom(String),
    Integer(i64),
    Float(f64),
    Bitstring(Bitstring),
    /// Proper list, possibly empty.
    List(Vec<Term>),
    /// Non-empty list whose tail is not a list.
    Improper(Vec<Term>, Box<Term>),
    Tuple(Vec<Term>),
    /// Association list; keys compare exactly (`1` and `1.0` differ).
    Map(Vec<(Term, Term)>),
    Pid(Pid),
    Port(u32, u32),
    Reference(Vec<u32>),
    Fun { module: Option<String>, name: String, arity: u32 },
}

// ---- Constructors ----

impl Term {
    pub fn atom(name: impl Into<String>) -> Term {
        Term::Atom(name.into())
    }

    pub fn int(n: i64) -> Term {
        Term::Integer(n)
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Term {
        Term::Bitstring(Bitstring::binary(bytes))
    }

    pub fn nil() -> Term {
        Term::List(Vec::new())
    }

    pub fn list(items: Vec<Term>) -> Term {
        Term::List(items)
    }

    /// A character list, the way string literals are represented.
    pub fn string(s: &str) -> Term {
        Term::List(s.chars().map(|c| Term::Integer(c as i64)).collect())
    }

    pub fn tuple(items: Vec<Term>) -> Term {
        Term::Tuple(items)
    }

    pub fn map(pairs: Vec<(Term, Term)>) -> Term {
        Term::Map(pairs)
    }

    pub fn fun(arity: u32) -> Term {
        Term::Fun { module: None, name: "anonymous".to_string(), arity }
    }

    /// Build `[items | tail]`, flattening list tails so the result is
    /// always in normal form.
    pub fn cons(mut items: Vec<Term>, tail: Term) -> Term {
        match tail {
            Term::List(rest) => {
                items.extend(rest);
                Term::List(items)
            }
            Term::Improper(rest, inner) => {
                items.extend(rest);
                Term::Improper(items, inner)
            }
            other if items.is_empty() => other,
            other => Term::Improper(items, Box::new(other)),
        }
    }
}

// ---- Structural queries ----

impl Term {
    pub fn as_atom(&self) -> Option<&str> {
        match self {
            Term::Atom(a) => Some(a),
            _ => None,
        }
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Term::Atom(_))
    }

    pub fn is_atom_named(&self, name: &str) -> bool {
        self.as_atom() == Some(name)
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Term::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Term::Integer(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Term::Integer(_) | Term::Float(_))
    }

    /// Numeric value for comparisons; `None` for non-numbers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Term::Integer(n) => Some(*n as f64),
            Term::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            Term::Bitstring(b) if b.is_binary() => Some(&b.bytes),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        self.as_binary().is_some()
    }

    /// Elements of a proper list. Improper lists have no length.
    pub fn proper_list(&self) -> Option<&[Term]> {
        match self {
            Term::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Term]> {
        match self {
            Term::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, Term::Tuple(_))
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Term::Map(_))
    }

    pub fn map_get(&self, key: &Term) -> Option<&Term> {
        match self {
            Term::Map(pairs) => pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn is_pid(&self) -> bool {
        matches!(self, Term::Pid(_))
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, Term::Reference(_))
    }

    pub fn fun_arity(&self) -> Option<u32> {
        match self {
            Term::Fun { arity, .. } => Some(*arity),
            _ => None,
        }
    }

    /// Short type name used in log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Term::Atom(_) => "atom",
            Term::Integer(_) => "integer",
            Term::Float(_) => "float",
            Term::Bitstring(b) if b.is_binary() => "binary",
            Term::Bitstring(_) => "bitstring",
            Term::List(_) => "list",
            Term::Improper(..) => "improper_list",
            Term::Tuple(_) => "tuple",
            Term::Map(_) => "map",
            Term::Pid(_) => "pid",
            Term::Port(..) => "port",
            Term::Reference(_) => "reference",
            Term::Fun { .. } => "fun",
        }
    }
}

// ---- Display (literal syntax) ----

fn atom_needs_quotes(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() => {
            !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '@')
        }
        _ => true,
    }
}

fn write_seq(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

impl fmt::Display for Bitstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let printable = self.is_binary()
            && !self.bytes.is_empty()
            && self.bytes.iter().all(|b| (0x20..0x7f).contains(b) && *b != b'"' && *b != b'\\');
        if printable {
            // Printable bytes are ASCII, so this cannot fail.
            return write!(f, "<<\"{}\">>", String::from_utf8_lossy(&self.bytes));
        }
        write!(f, "<<")?;
        let last = self.bytes.len().saturating_sub(1);
        for (i, byte) in self.bytes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            if i == last && self.trailing_bits != 0 {
                write!(f, "{}:{}", byte, self.trailing_bits)?;
            } else {
                write!(f, "{}", byte)?;
            }
        }
        write!(f, ">>")
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(a) if atom_needs_quotes(a) => write!(f, "'{}'", a.replace('\'', "\\'")),
            Term::Atom(a) => write!(f, "{}", a),
            Term::Integer(n) => write!(f, "{}", n),
            Term::Float(x) => {
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Term::Bitstring(b) => write!(f, "{}", b),
            Term::List(items) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "]")
            }
            Term::Improper(items, tail) => {
                write!(f, "[")?;
                write_seq(f, items)?;
                write!(f, "|{}]", tail)
            }
            Term::Tuple(items) => {
                write!(f, "{{")?;
                write_seq(f, items)?;
                write!(f, "}}")
            }
            Term::Map(pairs) => {
                write!(f, "#{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{} => {}", k, v)?;
                }
                write!(f, "}}")
            }
            Term::Pid(pid) => write!(f, "{}", pid),
            Term::Port(node, id) => write!(f, "#Port<{}.{}>", node, id),
            Term::Reference(parts) => {
                let parts: Vec<String> = parts.iter().map(|p| p.to_string()).collect();
                write!(f, "#Ref<{}>", parts.join("."))
            }
            Term::Fun { module: Some(m), name, arity } => write!(f, "fun {}:{}/{}", m, name, arity),
            Term::Fun { module: None, name, arity } => write!(f, "fun {}/{}", name, arity),
        }
    }
}

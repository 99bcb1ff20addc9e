//! Black-box validity probes.
//!
//! Some argument rules only exist inside the operation that enforces them
//! (regular-expression syntax, match specifications, character data). For
//! those, the validators ask a [`Probe`] to attempt the real operation on
//! the isolated value and classify any refusal. Every call goes through
//! [`contained`], so a probe that panics is reported as a refusal instead of
//! unwinding into the caller.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use crate::term::{Pid, Term};

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("bad argument")]
    Badarg,
    #[error("invalid regular expression: {0}")]
    Regex(#[from] fancy_regex::Error),
    #[error("invalid {encoding} data")]
    Encoding { encoding: &'static str },
    #[error("probe panicked")]
    Panicked,
}

type Result<T> = std::result::Result<T, ProbeError>;

/// The operations' own validity entry points, as seen from the explainer.
///
/// Implementations must be free of side effects: they are called on values
/// that already made a real call fail.
pub trait Probe {
    /// `iolist_size/1`.
    fn iolist_size(&self, term: &Term) -> Result<usize>;

    /// Whether `pattern` is accepted by `binary:compile_pattern/1`.
    fn compile_binary_pattern(&self, pattern: &Term) -> Result<()>;

    /// Compile an iodata regular expression (`re:compile/1`).
    fn compile_regex(&self, source: &Term) -> Result<()>;

    /// Whether `term` is a compiled regular expression (`re:inspect/2`).
    fn inspect_regex(&self, term: &Term) -> Result<()>;

    /// `unicode:characters_to_binary/3`.
    fn characters_to_binary(&self, chars: &Term, input: &Term, output: &Term) -> Result<Vec<u8>>;

    /// `ets:match_spec_compile/1`.
    fn compile_match_spec(&self, spec: &Term) -> Result<()>;

    /// `maps:next/1`.
    fn map_next(&self, iterator: &Term) -> Result<()>;

    fn is_process_alive(&self, pid: Pid) -> bool;

    /// `re:run("", Re)`: accepts iodata sources and compiled expressions.
    fn run_regex(&self, re: &Term) -> Result<()> {
        self.inspect_regex(re).or_else(|_| self.compile_regex(re))
    }
}

/// Run a probe with fault containment.
pub fn contained<T>(probe: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            tracing::trace!(probe, error = %e, "probe refused input");
            Err(e)
        }
        Err(_) => {
            tracing::trace!(probe, "probe panicked; contained");
            Err(ProbeError::Panicked)
        }
    }
}

// ---- Encodings ----

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endian {
    Big,
    Little,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Latin1,
    Utf8,
    Utf16(Endian),
    Utf32(Endian),
}

impl Encoding {
    pub fn from_term(term: &Term) -> Option<Encoding> {
        match term {
            Term::Atom(a) => match a.as_str() {
                "latin1" => Some(Encoding::Latin1),
                "unicode" | "utf8" => Some(Encoding::Utf8),
                "utf16" => Some(Encoding::Utf16(Endian::Big)),
                "utf32" => Some(Encoding::Utf32(Endian::Big)),
                _ => None,
            },
            Term::Tuple(items) if items.len() == 2 => {
                let endian = match items[1].as_atom()? {
                    "big" => Endian::Big,
                    "little" => Endian::Little,
                    _ => return None,
                };
                match items[0].as_atom()? {
                    "utf16" => Some(Encoding::Utf16(endian)),
                    "utf32" => Some(Encoding::Utf32(endian)),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn name(self) -> &'static str {
        match self {
            Encoding::Latin1 => "latin1",
            Encoding::Utf8 => "utf8",
            Encoding::Utf16(_) => "utf16",
            Encoding::Utf32(_) => "utf32",
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<Vec<char>> {
        let bad = || ProbeError::Encoding { encoding: self.name() };
        match self {
            Encoding::Latin1 => Ok(bytes.iter().map(|b| *b as char).collect()),
            Encoding::Utf8 => std::str::from_utf8(bytes).map(|s| s.chars().collect()).map_err(|_| bad()),
            Encoding::Utf16(endian) => {
                if bytes.len() % 2 != 0 {
                    return Err(bad());
                }
                let units = bytes.chunks_exact(2).map(|c| match endian {
                    Endian::Big => u16::from_be_bytes([c[0], c[1]]),
                    Endian::Little => u16::from_le_bytes([c[0], c[1]]),
                });
                char::decode_utf16(units).collect::<std::result::Result<Vec<_>, _>>().map_err(|_| bad())
            }
            Encoding::Utf32(endian) => {
                if bytes.len() % 4 != 0 {
                    return Err(bad());
                }
                bytes
                    .chunks_exact(4)
                    .map(|c| {
                        let raw = [c[0], c[1], c[2], c[3]];
                        let code = match endian {
                            Endian::Big => u32::from_be_bytes(raw),
                            Endian::Little => u32::from_le_bytes(raw),
                        };
                        char::from_u32(code).ok_or_else(bad)
                    })
                    .collect()
            }
        }
    }

    fn encode(self, chars: &[char]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(chars.len());
        for &c in chars {
            match self {
                Encoding::Latin1 => {
                    let code = u8::try_from(c as u32).map_err(|_| ProbeError::Encoding { encoding: "latin1" })?;
                    out.push(code);
                }
                Encoding::Utf8 => {
                    let mut buf = [0u8; 4];
                    out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                }
                Encoding::Utf16(endian) => {
                    let mut buf = [0u16; 2];
                    for unit in c.encode_utf16(&mut buf) {
                        match endian {
                            Endian::Big => out.extend_from_slice(&unit.to_be_bytes()),
                            Endian::Little => out.extend_from_slice(&unit.to_le_bytes()),
                        }
                    }
                }
                Encoding::Utf32(endian) => match endian {
                    Endian::Big => out.extend_from_slice(&(c as u32).to_be_bytes()),
                    Endian::Little => out.extend_from_slice(&(c as u32).to_le_bytes()),
                },
            }
        }
        Ok(out)
    }
}

// ---- Default implementation ----

/// Stand-alone probe implementing the collaborator rules directly.
///
/// Regular expressions are compiled with `fancy-regex`, which covers the
/// lookaround and backreference syntax of PCRE patterns. A compiled
/// expression is modelled as `{re_pattern, Groups, Unicode, Ncrlf, Source}`
/// with `Source` the pattern binary. Every pid is alive unless registered
/// with [`StdProbe::with_dead_process`].
#[derive(Debug, Clone, Default)]
pub struct StdProbe {
    dead: HashSet<Pid>,
}

impl StdProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dead_process(mut self, pid: Pid) -> Self {
        self.dead.insert(pid);
        self
    }
}

fn iolist_size_acc(term: &Term, acc: &mut usize) -> Result<()> {
    match term {
        Term::Bitstring(b) if b.is_binary() => {
            *acc += b.bytes.len();
            Ok(())
        }
        Term::List(items) => items.iter().try_for_each(|item| iolist_item(item, acc)),
        Term::Improper(items, tail) => {
            items.iter().try_for_each(|item| iolist_item(item, acc))?;
            match tail.as_binary() {
                Some(bytes) => {
                    *acc += bytes.len();
                    Ok(())
                }
                None => Err(ProbeError::Badarg),
            }
        }
        _ => Err(ProbeError::Badarg),
    }
}

fn iolist_item(item: &Term, acc: &mut usize) -> Result<()> {
    match item {
        Term::Integer(0..=255) => {
            *acc += 1;
            Ok(())
        }
        Term::Integer(_) => Err(ProbeError::Badarg),
        other => iolist_size_acc(other, acc),
    }
}

fn collect_chars(term: &Term, input: Encoding, out: &mut Vec<char>) -> Result<()> {
    match term {
        Term::Bitstring(b) if b.is_binary() => {
            out.extend(input.decode(&b.bytes)?);
            Ok(())
        }
        Term::List(items) => items.iter().try_for_each(|item| chardata_item(item, input, out)),
        Term::Improper(items, tail) => {
            items.iter().try_for_each(|item| chardata_item(item, input, out))?;
            match tail.as_binary() {
                Some(bytes) => {
                    out.extend(input.decode(bytes)?);
                    Ok(())
                }
                None => Err(ProbeError::Badarg),
            }
        }
        _ => Err(ProbeError::Badarg),
    }
}

fn chardata_item(item: &Term, input: Encoding, out: &mut Vec<char>) -> Result<()> {
    match item {
        Term::Integer(code) => {
            let limit = if input == Encoding::Latin1 { 0xff } else { 0x10ffff };
            let c = u32::try_from(*code)
                .ok()
                .filter(|code| *code <= limit)
                .and_then(char::from_u32)
                .ok_or(ProbeError::Badarg)?;
            out.push(c);
            Ok(())
        }
        other => collect_chars(other, input, out),
    }
}

fn iodata_bytes(term: &Term) -> Result<Vec<u8>> {
    let mut chars = Vec::new();
    collect_chars(term, Encoding::Latin1, &mut chars)?;
    Ok(chars.into_iter().map(|c| c as u8).collect())
}

/// Pattern source as text: Unicode character data when it decodes as such,
/// otherwise its bytes read as latin1.
fn pattern_text(source: &Term) -> Result<String> {
    let mut chars = Vec::new();
    if collect_chars(source, Encoding::Utf8, &mut chars).is_ok() {
        return Ok(chars.into_iter().collect());
    }
    Ok(iodata_bytes(source)?.into_iter().map(char::from).collect())
}

fn is_match_variable(term: &Term) -> bool {
    match term.as_atom() {
        Some("_") => true,
        Some(a) => a.strip_prefix('$').is_some_and(|n| !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())),
        None => false,
    }
}

impl Probe for StdProbe {
    fn iolist_size(&self, term: &Term) -> Result<usize> {
        let mut size = 0;
        iolist_size_acc(term, &mut size)?;
        Ok(size)
    }

    fn compile_binary_pattern(&self, pattern: &Term) -> Result<()> {
        let non_empty_binary = |t: &Term| t.as_binary().is_some_and(|b| !b.is_empty());
        let ok = match pattern {
            Term::Bitstring(_) => non_empty_binary(pattern),
            Term::List(items) => !items.is_empty() && items.iter().all(non_empty_binary),
            Term::Tuple(items) => {
                items.len() == 2
                    && (items[0].is_atom_named("bm") || items[0].is_atom_named("ac"))
                    && items[1].is_reference()
            }
            _ => false,
        };
        if ok { Ok(()) } else { Err(ProbeError::Badarg) }
    }

    fn compile_regex(&self, source: &Term) -> Result<()> {
        fancy_regex::Regex::new(&pattern_text(source)?)?;
        Ok(())
    }

    fn inspect_regex(&self, term: &Term) -> Result<()> {
        match term.as_tuple() {
            Some([tag, groups, _, _, source]) if tag.is_atom_named("re_pattern") && groups.is_integer() => {
                if !source.is_binary() {
                    return Err(ProbeError::Badarg);
                }
                fancy_regex::Regex::new(&pattern_text(source)?)?;
                Ok(())
            }
            _ => Err(ProbeError::Badarg),
        }
    }

    fn characters_to_binary(&self, chars: &Term, input: &Term, output: &Term) -> Result<Vec<u8>> {
        let input = Encoding::from_term(input).ok_or(ProbeError::Badarg)?;
        let output = Encoding::from_term(output).ok_or(ProbeError::Badarg)?;
        let mut decoded = Vec::new();
        collect_chars(chars, input, &mut decoded)?;
        output.encode(&decoded)
    }

    fn compile_match_spec(&self, spec: &Term) -> Result<()> {
        let clauses = spec.proper_list().ok_or(ProbeError::Badarg)?;
        for clause in clauses {
            let ok = match clause.as_tuple() {
                Some([head, guards, body]) => {
                    (head.is_tuple() || is_match_variable(head))
                        && guards.proper_list().is_some()
                        && body.proper_list().is_some_and(|b| !b.is_empty())
                }
                _ => false,
            };
            if !ok {
                return Err(ProbeError::Badarg);
            }
        }
        Ok(())
    }

    fn map_next(&self, iterator: &Term) -> Result<()> {
        let ok = match iterator {
            Term::Atom(a) => a == "none",
            Term::Tuple(items) => items.len() == 3,
            Term::Improper(path, tail) => tail.is_map() && path.iter().all(Term::is_integer),
            _ => false,
        };
        if ok { Ok(()) } else { Err(ProbeError::Badarg) }
    }

    fn is_process_alive(&self, pid: Pid) -> bool {
        !self.dead.contains(&pid)
    }
}

//! Single-argument checks shared by the analyzers.
//!
//! Each check returns `None` when the argument satisfies the constraint and
//! the most specific [`Reason`] otherwise. Checks that take a [`Probe`]
//! attempt the real operation on the value alone, contained.

use crate::diagnostic::{Outcome, Reason};
use crate::probe::{contained, Probe};
use crate::term::Term;

pub fn binary(term: &Term) -> Outcome {
    match term {
        Term::Bitstring(b) if b.is_binary() => None,
        Term::Bitstring(_) => Some(Reason::Bitstring),
        _ => Some(Reason::NotBinary),
    }
}

pub fn integer(term: &Term) -> Outcome {
    if term.is_integer() { None } else { Some(Reason::NotInteger) }
}

pub fn bounded_integer(term: &Term, min: i64, max: i64) -> Outcome {
    match term.as_integer() {
        Some(n) if (min..=max).contains(&n) => None,
        Some(_) => Some(Reason::Range),
        None => Some(Reason::NotInteger),
    }
}

pub fn non_neg_integer(term: &Term) -> Outcome {
    bounded_integer(term, 0, i64::MAX)
}

/// 1-based position within a tuple or list.
pub fn position(term: &Term) -> Outcome {
    bounded_integer(term, 1, i64::MAX)
}

pub fn positive_integer(term: &Term) -> Outcome {
    match term.as_integer() {
        Some(n) if n > 0 => None,
        _ => Some(Reason::NotPositiveInteger),
    }
}

/// A proper list; taking the length of an improper one faults.
pub fn list(term: &Term) -> Outcome {
    match term {
        Term::List(_) => None,
        Term::Improper(..) => Some(Reason::NotProperList),
        _ => Some(Reason::NotList),
    }
}

pub fn map(term: &Term) -> Outcome {
    if term.is_map() { None } else { Some(Reason::NotMap) }
}

pub fn map_or_iterator(probe: &dyn Probe, term: &Term) -> Outcome {
    if term.is_map() {
        return None;
    }
    match contained("map_next", || probe.map_next(term)) {
        Ok(()) => None,
        Err(_) => Some(Reason::NotMapOrIterator),
    }
}

pub fn fun_of_arity(term: &Term, arity: u32) -> Outcome {
    match term.fun_arity() {
        Some(a) if a == arity => None,
        _ => Some(Reason::NotFun(arity)),
    }
}

pub fn number(term: &Term) -> Outcome {
    if term.is_number() { None } else { Some(Reason::NotNumber) }
}

pub fn endianness(term: &Term) -> Outcome {
    match term.as_atom() {
        Some("big" | "little") => None,
        _ => Some(Reason::BadEndianness),
    }
}

pub fn atom(term: &Term) -> Outcome {
    if term.is_atom() { None } else { Some(Reason::NotAtom) }
}

pub fn tuple(term: &Term) -> Outcome {
    if term.is_tuple() { None } else { Some(Reason::NotTuple) }
}

pub fn boolean(term: &Term) -> Outcome {
    match term.as_atom() {
        Some("true" | "false") => None,
        _ => Some(Reason::BadBoolean),
    }
}

pub fn binary_pattern(probe: &dyn Probe, term: &Term) -> Outcome {
    contained("compile_pattern", || probe.compile_binary_pattern(term))
        .err()
        .map(|_| Reason::BadBinaryPattern)
}

/// Replacement for `binary:replace`: a binary or a fun of one argument.
pub fn binary_replacement(term: &Term) -> Outcome {
    if term.is_binary() || term.fun_arity() == Some(1) {
        None
    } else {
        Some(Reason::BadReplacement)
    }
}

pub fn iodata(probe: &dyn Probe, term: &Term) -> Outcome {
    contained("iolist_size", || probe.iolist_size(term))
        .err()
        .map(|_| Reason::NotIodata)
}

/// Anything `re:run/2` accepts as its regular expression.
pub fn regexp(probe: &dyn Probe, term: &Term) -> Outcome {
    contained("re_run", || probe.run_regex(term))
        .err()
        .map(|_| Reason::NotRegexp)
}

pub fn compiled_regexp(probe: &dyn Probe, term: &Term) -> Outcome {
    contained("re_inspect", || probe.inspect_regex(term))
        .err()
        .map(|_| Reason::NotCompiledRegexp)
}

/// Replacement for `re:replace`: iodata or a fun of two arguments.
pub fn re_replacement(probe: &dyn Probe, term: &Term) -> Outcome {
    if term.fun_arity() == Some(2) {
        return None;
    }
    iodata(probe, term).map(|_| Reason::BadReplacement)
}

pub fn char_data(probe: &dyn Probe, term: &Term) -> Outcome {
    let unicode = Term::atom("unicode");
    contained("characters_to_binary", || probe.characters_to_binary(term, &unicode, &unicode))
        .err()
        .map(|_| Reason::BadCharData)
}

/// An encoding, checked by converting an empty binary so that only the
/// encoding term itself can be at fault.
pub fn encoding(probe: &dyn Probe, term: &Term) -> Outcome {
    let sample = Term::binary(Vec::new());
    let unicode = Term::atom("unicode");
    contained("characters_to_binary", || probe.characters_to_binary(&sample, term, &unicode))
        .err()
        .map(|_| Reason::BadEncoding)
}

pub fn map_iterator_order(term: &Term) -> Outcome {
    match term {
        Term::Atom(a) if a == "ordered" || a == "reversed" || a == "undefined" => None,
        Term::Fun { arity: 2, .. } => None,
        _ => Some(Reason::BadIteratorOrder),
    }
}

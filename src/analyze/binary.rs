use super::Call;
use crate::diagnostic::{Outcome, Reason};
use crate::operation::Cause;
use crate::term::Term;
use crate::validate::{self, binary};

pub fn analyze(call: &Call) -> Vec<Outcome> {
    let probe = call.probe;
    match (call.name, call.args) {
        ("at", [subject, pos]) => at(subject, pos),
        ("bin_to_list", [subject]) => vec![binary(subject)],
        ("bin_to_list" | "part", [subject, pos_len]) => part_pair(subject, pos_len),
        ("bin_to_list" | "part", [subject, pos, len]) => part(subject, pos, len),
        ("compile_pattern", [pattern]) => vec![validate::binary_pattern(probe, pattern)],
        ("copy", [subject]) => vec![binary(subject)],
        ("copy", [subject, n]) => vec![binary(subject), validate::non_neg_integer(n)],
        ("decode_hex", [subject]) => vec![decode_hex(subject)],
        ("decode_unsigned", [subject]) => vec![binary(subject)],
        ("decode_unsigned", [subject, endianness]) => {
            vec![binary(subject), validate::endianness(endianness)]
        }
        ("encode_hex", [subject]) => vec![binary(subject)],
        ("encode_hex", [subject, case]) => vec![binary(subject), hex_case(case)],
        ("encode_unsigned", [n]) => vec![validate::non_neg_integer(n)],
        ("encode_unsigned", [n, endianness]) => {
            vec![validate::non_neg_integer(n), validate::endianness(endianness)]
        }
        ("first" | "last", [subject]) => vec![non_empty(subject)],
        ("list_to_bin", [list]) => vec![validate::iodata(probe, list)],
        ("longest_common_prefix" | "longest_common_suffix", [list]) => vec![binary_list(list)],
        ("match" | "matches" | "split", [subject, pattern]) => {
            vec![binary(subject), validate::binary_pattern(probe, pattern)]
        }
        ("match" | "matches", [subject, pattern, options]) => {
            with_options(call, subject, pattern, options, OptionSet::Match)
        }
        ("split", [subject, pattern, options]) => {
            with_options(call, subject, pattern, options, OptionSet::Split)
        }
        ("referenced_byte_size", [subject]) => vec![binary(subject)],
        ("replace", [subject, pattern, replacement]) => vec![
            binary(subject),
            validate::binary_pattern(probe, pattern),
            validate::binary_replacement(replacement),
        ],
        ("replace", [subject, pattern, replacement, options]) => {
            replace(call, subject, pattern, replacement, options)
        }
        _ => Vec::new(),
    }
}

fn at(subject: &Term, pos: &Term) -> Vec<Outcome> {
    let pos_check = validate::non_neg_integer(pos).or_else(|| {
        let size = subject.as_binary()?.len() as i64;
        let pos = pos.as_integer()?;
        (pos >= size).then_some(Reason::Range)
    });
    vec![binary(subject), pos_check]
}

/// `Start..Start+Len` (with `Len` possibly negative) lies inside `0..=size`.
fn part_in_range(size: usize, start: i64, len: i64) -> bool {
    let size = size as i128;
    let (start, len) = (start as i128, len as i128);
    let end = start + len;
    (0..=size).contains(&start) && (0..=size).contains(&end)
}

fn part(subject: &Term, pos: &Term, len: &Term) -> Vec<Outcome> {
    let outcomes = vec![binary(subject), validate::non_neg_integer(pos), validate::integer(len)];
    if outcomes.iter().any(Option::is_some) {
        return outcomes;
    }
    let (Some(bytes), Some(start), Some(count)) = (subject.as_binary(), pos.as_integer(), len.as_integer()) else {
        return outcomes;
    };
    if start > bytes.len() as i64 {
        vec![None, Some(Reason::Range)]
    } else if part_in_range(bytes.len(), start, count) {
        Vec::new()
    } else {
        vec![None, None, Some(Reason::Range)]
    }
}

/// `part/2` and `bin_to_list/2` take `{Pos, Len}`; any problem with either
/// half is reported against the tuple as a whole.
fn part_pair(subject: &Term, pos_len: &Term) -> Vec<Outcome> {
    match pos_len.as_tuple() {
        Some([pos @ Term::Integer(_), len @ Term::Integer(_)]) => {
            let inner = part(subject, pos, len);
            let first = inner.first().cloned().flatten();
            if inner.iter().skip(1).any(Option::is_some) {
                vec![first, Some(Reason::Range)]
            } else {
                vec![first]
            }
        }
        _ => vec![binary(subject), Some(Reason::BadPosLen)],
    }
}

fn decode_hex(subject: &Term) -> Outcome {
    match subject.as_binary() {
        Some(bytes) if bytes.len() % 2 == 1 => Some(Reason::HexOddSize),
        Some(bytes) if !bytes.iter().all(u8::is_ascii_hexdigit) => Some(Reason::HexDigits),
        Some(_) => None,
        None => binary(subject),
    }
}

fn hex_case(case: &Term) -> Outcome {
    match case.as_atom() {
        Some("uppercase" | "lowercase") => None,
        _ => Some(Reason::BadEncodeOption),
    }
}

fn non_empty(subject: &Term) -> Outcome {
    match subject.as_binary() {
        Some([]) => Some(Reason::EmptyBinary),
        _ => binary(subject),
    }
}

fn binary_list(list: &Term) -> Outcome {
    match list.proper_list() {
        Some(items) if items.iter().all(Term::is_binary) => None,
        _ => Some(Reason::BadBinaryList),
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum OptionSet {
    Match,
    Split,
    Replace,
}

impl OptionSet {
    fn allows_flag(self, flag: &str) -> bool {
        match self {
            OptionSet::Match => false,
            OptionSet::Split => matches!(flag, "global" | "trim" | "trim_all"),
            OptionSet::Replace => flag == "global",
        }
    }
}

/// Options are only examined once subject and pattern are known good. A
/// well-formed option list can still fail by scoping outside the subject.
fn options_outcome(subject: &[u8], options: &Term, set: OptionSet) -> Outcome {
    let Some(items) = options.proper_list() else {
        return Some(Reason::BadOptions);
    };
    let mut outside = false;
    for option in items {
        match option {
            Term::Atom(flag) if set.allows_flag(flag) => {}
            Term::Tuple(pair) => match pair.as_slice() {
                [tag, Term::Tuple(range)] if tag.is_atom_named("scope") => match range.as_slice() {
                    [Term::Integer(start), Term::Integer(len)] => {
                        outside |= !part_in_range(subject.len(), *start, *len);
                    }
                    _ => return Some(Reason::BadOptions),
                },
                [tag, positions] if set == OptionSet::Replace && tag.is_atom_named("insert_replaced") => {
                    let valid = match positions {
                        Term::Integer(n) => *n >= 0,
                        Term::List(ns) => ns.iter().all(|n| n.as_integer().is_some_and(|n| n >= 0)),
                        _ => false,
                    };
                    if !valid {
                        return Some(Reason::BadOptions);
                    }
                }
                _ => return Some(Reason::BadOptions),
            },
            _ => return Some(Reason::BadOptions),
        }
    }
    outside.then_some(Reason::ScopeOutsideBinary)
}

fn with_options(call: &Call, subject: &Term, pattern: &Term, options: &Term, set: OptionSet) -> Vec<Outcome> {
    let outcomes = vec![binary(subject), validate::binary_pattern(call.probe, pattern)];
    match subject.as_binary() {
        Some(bytes) if outcomes.iter().all(Option::is_none) => {
            vec![None, None, options_outcome(bytes, options, set)]
        }
        _ => outcomes,
    }
}

fn replace(call: &Call, subject: &Term, pattern: &Term, replacement: &Term, options: &Term) -> Vec<Outcome> {
    let mut outcomes = vec![
        binary(subject),
        validate::binary_pattern(call.probe, pattern),
        validate::binary_replacement(replacement),
    ];
    if *call.cause == Cause::BadOpt {
        outcomes.push(Some(Reason::BadOptions));
    } else if outcomes.iter().all(Option::is_none) {
        if let Some(bytes) = subject.as_binary() {
            outcomes.push(options_outcome(bytes, options, OptionSet::Replace));
        }
    }
    outcomes
}

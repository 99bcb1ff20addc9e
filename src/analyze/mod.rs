//! Per-family analyzers.
//!
//! Each family module exposes `analyze(&Call) -> Vec<Outcome>`, a match on
//! `(name, args)` where the slice pattern fixes the arity. The returned
//! vector is positional: index `i` explains argument `i + 1`. It may be
//! shorter than the argument list (trailing arguments have no problem) but
//! never longer.

pub mod binary;
pub mod lists;
pub mod maps;
pub mod math;
pub mod table;
pub mod text;

use crate::diagnostic::Outcome;
use crate::operation::{Cause, Family};
use crate::probe::Probe;
use crate::term::Term;

/// Everything an analyzer may consult about one failed call.
pub struct Call<'a> {
    pub name: &'a str,
    pub args: &'a [Term],
    pub cause: &'a Cause,
    pub probe: &'a dyn Probe,
}

pub fn analyze(family: Family, call: &Call) -> Vec<Outcome> {
    let mut outcomes = match family {
        Family::Binary => binary::analyze(call),
        Family::Ets => table::analyze(call),
        Family::Lists => lists::analyze(call),
        Family::Maps => maps::analyze(call),
        Family::Math => math::analyze(call),
        Family::Re | Family::Unicode => text::analyze(family, call),
    };
    outcomes.truncate(call.args.len());
    outcomes
}

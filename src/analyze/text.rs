//! `re` and `unicode`.

use super::Call;
use crate::diagnostic::{Outcome, Reason};
use crate::operation::{Cause, Family};
use crate::probe::contained;
use crate::term::Term;
use crate::validate;

pub fn analyze(family: Family, call: &Call) -> Vec<Outcome> {
    match family {
        Family::Re => regex(call),
        _ => unicode(call),
    }
}

fn regex(call: &Call) -> Vec<Outcome> {
    let probe = call.probe;
    let mut outcomes = match (call.name, call.args) {
        ("compile", [source] | [source, _]) => vec![regex_source(call, source)],
        ("inspect", [compiled, item]) => vec![validate::compiled_regexp(probe, compiled), inspect_item(item)],
        ("replace", [subject, re, replacement] | [subject, re, replacement, _]) => vec![
            subject_check(call, subject),
            validate::regexp(probe, re),
            validate::re_replacement(probe, replacement),
        ],
        ("run" | "split", [subject, re] | [subject, re, _]) => {
            vec![subject_check(call, subject), validate::regexp(probe, re)]
        }
        _ => return Vec::new(),
    };
    // The option list is opaque here; only the cause says it was at fault.
    let has_options = matches!(
        (call.name, call.args.len()),
        ("compile", 2) | ("run" | "split", 3) | ("replace", 4)
    );
    if has_options && *call.cause == Cause::BadOpt {
        outcomes.resize(call.args.len() - 1, None);
        outcomes.push(Some(Reason::BadOptions));
    }
    outcomes
}

/// Source for `re:compile`: must be character data, then must compile.
fn regex_source(call: &Call, source: &Term) -> Outcome {
    subject_check(call, source).or_else(|| {
        contained("re_compile", || call.probe.compile_regex(source))
            .err()
            .map(|_| Reason::BadRegexp)
    })
}

/// Subjects may be iodata or Unicode character data.
fn subject_check(call: &Call, subject: &Term) -> Outcome {
    validate::iodata(call.probe, subject).filter(|_| validate::char_data(call.probe, subject).is_some())
}

fn inspect_item(item: &Term) -> Outcome {
    if item.is_atom_named("namelist") { None } else { Some(Reason::BadInspectItem) }
}

const NORMAL_FORMS: &[&str] = &[
    "characters_to_nfc_binary",
    "characters_to_nfc_list",
    "characters_to_nfd_binary",
    "characters_to_nfd_list",
    "characters_to_nfkc_binary",
    "characters_to_nfkc_list",
    "characters_to_nfkd_binary",
    "characters_to_nfkd_list",
];

fn unicode(call: &Call) -> Vec<Outcome> {
    let probe = call.probe;
    let chars = |t: &Term| validate::char_data(probe, t);
    let encoding = |t: &Term| validate::encoding(probe, t);
    match (call.name, call.args) {
        ("characters_to_binary" | "characters_to_list", [data]) => vec![chars(data)],
        ("characters_to_binary" | "characters_to_list", [data, input]) => {
            vec![data_in(call, data, input), encoding(input)]
        }
        ("characters_to_binary", [data, input, output]) => {
            vec![data_in(call, data, input), encoding(input), encoding(output)]
        }
        (name, [data]) if NORMAL_FORMS.contains(&name) => vec![chars(data)],
        _ => Vec::new(),
    }
}

/// Character data judged against its declared input encoding, when that
/// encoding is itself valid.
fn data_in(call: &Call, data: &Term, input: &Term) -> Outcome {
    if validate::encoding(call.probe, input).is_some() {
        return validate::char_data(call.probe, data);
    }
    let unicode = Term::atom("unicode");
    contained("characters_to_binary", || call.probe.characters_to_binary(data, input, &unicode))
        .err()
        .map(|_| Reason::BadCharData)
}

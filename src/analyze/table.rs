//! `ets` operations.
//!
//! Most table failures say nothing about the table argument itself; the
//! low-level cause tells whether the identifier was malformed, stale, or
//! lacked access. [`table_cause`] turns that into an explanation for
//! argument 1, and the per-operation checks add the rest.

use super::Call;
use crate::diagnostic::{Outcome, Reason};
use crate::operation::Cause;
use crate::probe::contained;
use crate::term::Term;
use crate::validate;

/// Explanation for the table argument, derived from the cause alone.
pub fn table_cause(table: &Term, cause: &Cause) -> Outcome {
    match cause {
        Cause::Type if table.is_reference() => Some(Reason::BadTableId),
        Cause::Type => Some(Reason::NotTableId),
        Cause::Id => Some(Reason::NoSuchTable),
        Cause::Access => Some(Reason::TableAccess),
        Cause::TableType => Some(Reason::TableType),
        _ => None,
    }
}

pub fn analyze(call: &Call) -> Vec<Outcome> {
    let cause = call.cause;
    let Some(table) = call.args.first() else {
        return Vec::new();
    };
    let tab = table_cause(table, cause);

    match (call.name, call.args) {
        ("give_away", [_, pid, _]) => give_away(call, tab, pid),
        ("info", [_, item]) => table_or(tab, info_item(item)),
        ("insert" | "insert_new", [_, objects]) => vec![tab, objects_check(objects)],
        ("delete_object", [_, object]) => vec![tab, object_check(object)],
        ("lookup_element", [_, _, pos] | [_, _, pos, _]) => lookup_element(cause, tab, pos),
        ("match" | "match_object" | "select" | "select_reverse", [_]) => {
            vec![Some(Reason::BadContinuation)]
        }
        ("match" | "match_object", [_, _, limit]) => vec![tab, None, validate::positive_integer(limit)],
        ("match_spec_compile", [spec]) => vec![match_spec(call, spec)],
        ("new", [name, options]) => new(cause, name, options),
        ("next" | "prev", [_, _]) => table_or(tab, Some(Reason::BadKey)),
        ("rename", [_, name]) => rename(tab, name),
        ("safe_fixtable", [_, flag]) => table_or(tab, validate::boolean(flag)),
        (
            "select" | "select_count" | "select_delete" | "select_replace" | "select_reverse",
            [_, spec],
        ) => table_or(tab, match_spec(call, spec)),
        ("select" | "select_reverse", [_, spec, limit]) => {
            vec![tab, match_spec(call, spec), validate::positive_integer(limit)]
        }
        ("setopts", [_, options]) => table_or(tab, setopts_check(options)),
        ("slot", [_, slot]) => table_or(tab, validate::integer(slot).or(Some(Reason::Range))),
        ("update_counter", [_, _, op]) => update_counter(cause, tab, op),
        ("update_counter", [_, _, op, default]) => update_counter_with_default(cause, tab, op, default),
        ("update_element", [_, _, spec] | [_, _, spec, _]) => update_element(cause, tab, spec),
        ("whereis", [name]) => vec![validate::atom(name).map(|_| Reason::BadTableName)],
        _ => vec![tab],
    }
}

/// A table problem explains the call on its own; otherwise the second
/// argument carries the blame.
fn table_or(tab: Outcome, second: Outcome) -> Vec<Outcome> {
    match tab {
        Some(_) => vec![tab],
        None => vec![None, second],
    }
}

fn give_away(call: &Call, tab: Outcome, pid: &Term) -> Vec<Outcome> {
    match call.cause {
        Cause::Owner => vec![tab, Some(Reason::AlreadyOwner)],
        Cause::NotOwner => vec![tab, Some(Reason::NotOwner)],
        _ => {
            let second = match pid {
                Term::Pid(_) if tab.is_some() => None,
                Term::Pid(pid) => (!call.probe.is_process_alive(*pid)).then_some(Reason::DeadProcess),
                _ => Some(Reason::NotPid),
            };
            vec![tab, second]
        }
    }
}

const INFO_ITEMS: &[&str] = &[
    "binary",
    "compressed",
    "decentralized_counters",
    "fixed",
    "heir",
    "id",
    "keypos",
    "memory",
    "name",
    "named_table",
    "node",
    "owner",
    "protection",
    "read_concurrency",
    "safe_fixed",
    "safe_fixed_monotonic_time",
    "size",
    "stats",
    "type",
    "write_concurrency",
];

fn info_item(item: &Term) -> Outcome {
    match item.as_atom() {
        Some(name) if INFO_ITEMS.contains(&name) => None,
        _ => Some(Reason::BadInfoItem),
    }
}

fn is_object(term: &Term) -> bool {
    term.as_tuple().is_some_and(|items| !items.is_empty())
}

fn object_check(object: &Term) -> Outcome {
    if is_object(object) { None } else { Some(Reason::NotTuple) }
}

/// A single non-empty tuple or a proper list of them.
fn objects_check(objects: &Term) -> Outcome {
    let valid = match objects {
        Term::Tuple(_) => is_object(objects),
        Term::List(items) => items.iter().all(is_object),
        _ => false,
    };
    if valid { None } else { Some(Reason::NotTupleOrList) }
}

fn lookup_element(cause: &Cause, tab: Outcome, pos: &Term) -> Vec<Outcome> {
    let pos_check = validate::position(pos);
    match cause {
        Cause::BadKey => vec![tab, Some(Reason::BadKey), pos_check],
        _ if tab.is_none() && pos_check.is_none() => vec![None, None, Some(Reason::PositionBeyondObject)],
        _ => vec![tab, None, pos_check],
    }
}

fn match_spec(call: &Call, spec: &Term) -> Outcome {
    contained("match_spec_compile", || call.probe.compile_match_spec(spec))
        .err()
        .map(|_| Reason::BadMatchspec)
}

fn table_option(option: &Term) -> bool {
    match option {
        Term::Atom(a) => matches!(
            a.as_str(),
            "set"
                | "ordered_set"
                | "bag"
                | "duplicate_bag"
                | "public"
                | "protected"
                | "private"
                | "named_table"
                | "compressed"
        ),
        Term::Tuple(items) => match items.as_slice() {
            [tag, pos] if tag.is_atom_named("keypos") => pos.as_integer().is_some_and(|p| p >= 1),
            [tag, value] if tag.is_atom_named("heir") => value.is_atom_named("none"),
            [tag, pid, _] if tag.is_atom_named("heir") => pid.is_pid(),
            [tag, value] if tag.is_atom_named("write_concurrency") => {
                matches!(value.as_atom(), Some("true" | "false" | "auto"))
            }
            [tag, value] if tag.is_atom_named("read_concurrency") || tag.is_atom_named("decentralized_counters") => {
                validate::boolean(value).is_none()
            }
            _ => false,
        },
        _ => false,
    }
}

fn new(cause: &Cause, name: &Term, options: &Term) -> Vec<Outcome> {
    match (validate::atom(name), validate::list(options)) {
        (None, None) if *cause == Cause::AlreadyExists => vec![Some(Reason::NameAlreadyExists)],
        (None, None) => {
            let items = options.proper_list().unwrap_or_default();
            let valid = items.iter().all(table_option);
            vec![None, (!valid).then_some(Reason::BadOptions)]
        }
        (name, opts) => vec![name, opts],
    }
}

fn rename(tab: Outcome, name: &Term) -> Vec<Outcome> {
    match (tab, validate::atom(name)) {
        (None, None) => vec![None, Some(Reason::NameAlreadyExists)],
        (tab, name) => vec![tab, name.map(|_| Reason::BadTableName)],
    }
}

fn heir_option(option: &Term) -> bool {
    match option.as_tuple() {
        Some([tag, value]) => tag.is_atom_named("heir") && value.is_atom_named("none"),
        Some([tag, pid, _]) => tag.is_atom_named("heir") && pid.is_pid(),
        _ => false,
    }
}

fn setopts_check(options: &Term) -> Outcome {
    let valid = match options {
        Term::List(items) => items.iter().all(heir_option),
        other => heir_option(other),
    };
    if valid { None } else { Some(Reason::BadOptions) }
}

fn is_update_tuple(term: &Term) -> bool {
    match term.as_tuple() {
        Some(items @ ([_, _] | [_, _, _, _])) => items.iter().all(Term::is_integer),
        _ => false,
    }
}

/// Increment, `{Pos, Incr}`, `{Pos, Incr, Threshold, SetValue}`, or a list
/// of the tuple forms.
fn update_op(op: &Term) -> Outcome {
    let valid = match op {
        Term::Integer(_) => true,
        Term::Tuple(_) => is_update_tuple(op),
        Term::List(items) => items.iter().all(is_update_tuple),
        _ => false,
    };
    if valid { None } else { Some(Reason::BadUpdateOp) }
}

fn update_counter(cause: &Cause, tab: Outcome, op: &Term) -> Vec<Outcome> {
    match cause {
        Cause::BadKey => vec![tab, Some(Reason::BadKey), update_op(op)],
        Cause::KeyPos => vec![tab, None, Some(Reason::SameAsKeypos)],
        Cause::Position => vec![tab, None, Some(Reason::UpdateOpRange)],
        Cause::None => vec![tab, None, update_op(op).or(Some(Reason::CounterNotInteger))],
        _ => vec![tab, None, update_op(op)],
    }
}

fn update_counter_with_default(cause: &Cause, tab: Outcome, op: &Term, default: &Term) -> Vec<Outcome> {
    if tab.is_some() {
        return vec![tab];
    }
    let default_check = validate::tuple(default);
    match cause {
        Cause::BadKey => vec![None, Some(Reason::BadKey), update_op(op), default_check],
        Cause::KeyPos => vec![None, None, Some(Reason::SameAsKeypos), default_check],
        Cause::Position => vec![None, None, Some(Reason::UpdateOpRange)],
        _ => match (update_op(op), default_check) {
            (None, None) => vec![None, None, Some(Reason::CounterNotInteger)],
            (op_check, default_check) => vec![None, None, op_check, default_check],
        },
    }
}

fn is_element_pair(term: &Term) -> bool {
    match term.as_tuple() {
        Some([pos, _]) => pos.as_integer().is_some_and(|p| p >= 1),
        _ => false,
    }
}

fn update_element(cause: &Cause, tab: Outcome, spec: &Term) -> Vec<Outcome> {
    let valid = match spec {
        Term::Tuple(_) => is_element_pair(spec),
        Term::List(items) => items.iter().all(is_element_pair),
        _ => false,
    };
    let third = match cause {
        Cause::KeyPos => Some(Reason::SameAsKeypos),
        _ if !valid => Some(Reason::BadElementSpec),
        _ if tab.is_none() => Some(Reason::Range),
        _ => None,
    };
    vec![tab, None, third]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::StdProbe;
    use crate::term::{Pid, parse_term};

    fn run(name: &str, args: &[&str], cause: Cause) -> Vec<Outcome> {
        let args: Vec<Term> = args.iter().map(|a| parse_term(a).unwrap()).collect();
        let probe = StdProbe::new().with_dead_process(Pid::local(99));
        analyze(&Call { name, args: &args, cause: &cause, probe: &probe })
    }

    #[test]
    fn table_cause_disambiguation() {
        let reference = parse_term("#Ref<0.1.2.3>").unwrap();
        assert_eq!(table_cause(&reference, &Cause::Type), Some(Reason::BadTableId));
        assert_eq!(table_cause(&Term::int(3), &Cause::Type), Some(Reason::NotTableId));
        assert_eq!(table_cause(&Term::atom("t"), &Cause::Id), Some(Reason::NoSuchTable));
        assert_eq!(table_cause(&Term::atom("t"), &Cause::Access), Some(Reason::TableAccess));
        assert_eq!(table_cause(&Term::atom("t"), &Cause::TableType), Some(Reason::TableType));
        assert_eq!(table_cause(&Term::atom("t"), &Cause::BadKey), None);
    }

    #[test]
    fn unlisted_operation_falls_back_to_table() {
        assert_eq!(run("lookup", &["t", "k"], Cause::Id), vec![Some(Reason::NoSuchTable)]);
        assert_eq!(run("delete", &["t"], Cause::None), vec![None]);
    }

    #[test]
    fn rename_to_taken_name() {
        assert_eq!(run("rename", &["t", "other"], Cause::None), vec![None, Some(Reason::NameAlreadyExists)]);
        assert_eq!(
            run("rename", &["t", "\"x\""], Cause::None),
            vec![None, Some(Reason::BadTableName)]
        );
        assert_eq!(
            run("rename", &["t", "other"], Cause::Id),
            vec![Some(Reason::NoSuchTable), None]
        );
    }

    #[test]
    fn update_counter_elimination() {
        assert_eq!(
            run("update_counter", &["t", "k", "1"], Cause::None),
            vec![None, None, Some(Reason::CounterNotInteger)]
        );
        assert_eq!(
            run("update_counter", &["t", "k", "foo"], Cause::None),
            vec![None, None, Some(Reason::BadUpdateOp)]
        );
        assert_eq!(
            run("update_counter", &["t", "k", "{2,1}"], Cause::KeyPos),
            vec![None, None, Some(Reason::SameAsKeypos)]
        );
        assert_eq!(
            run("update_counter", &["t", "k", "[{2,1},{3,1,10,0}]"], Cause::Position),
            vec![None, None, Some(Reason::UpdateOpRange)]
        );
        assert_eq!(
            run("update_counter", &["t", "k", "{2,x}"], Cause::BadKey),
            vec![None, Some(Reason::BadKey), Some(Reason::BadUpdateOp)]
        );
    }

    #[test]
    fn update_counter_with_default() {
        assert_eq!(
            run("update_counter", &["t", "k", "1", "{k,0}"], Cause::Id),
            vec![Some(Reason::NoSuchTable)]
        );
        assert_eq!(
            run("update_counter", &["t", "k", "1", "{k,0}"], Cause::None),
            vec![None, None, Some(Reason::CounterNotInteger)]
        );
        assert_eq!(
            run("update_counter", &["t", "k", "1", "zero"], Cause::None),
            vec![None, None, None, Some(Reason::NotTuple)]
        );
        assert_eq!(
            run("update_counter", &["t", "k", "1", "zero"], Cause::KeyPos),
            vec![None, None, Some(Reason::SameAsKeypos), Some(Reason::NotTuple)]
        );
    }

    #[test]
    fn lookup_element_positions() {
        assert_eq!(
            run("lookup_element", &["t", "k", "5"], Cause::None),
            vec![None, None, Some(Reason::PositionBeyondObject)]
        );
        assert_eq!(
            run("lookup_element", &["t", "k", "0"], Cause::None),
            vec![None, None, Some(Reason::Range)]
        );
        assert_eq!(
            run("lookup_element", &["t", "k", "2"], Cause::BadKey),
            vec![None, Some(Reason::BadKey), None]
        );
        assert_eq!(
            run("lookup_element", &["t", "k", "2", "dflt"], Cause::Id),
            vec![Some(Reason::NoSuchTable), None, None]
        );
    }

    #[test]
    fn give_away_cases() {
        assert_eq!(
            run("give_away", &["t", "<0.5.0>", "gift"], Cause::Owner),
            vec![None, Some(Reason::AlreadyOwner)]
        );
        assert_eq!(
            run("give_away", &["t", "<0.5.0>", "gift"], Cause::NotOwner),
            vec![None, Some(Reason::NotOwner)]
        );
        assert_eq!(
            run("give_away", &["t", "self", "gift"], Cause::None),
            vec![None, Some(Reason::NotPid)]
        );
        assert_eq!(
            run("give_away", &["t", "<0.99.0>", "gift"], Cause::None),
            vec![None, Some(Reason::DeadProcess)]
        );
        assert_eq!(
            run("give_away", &["t", "<0.99.0>", "gift"], Cause::Id),
            vec![Some(Reason::NoSuchTable), None]
        );
        assert_eq!(run("give_away", &["t", "<0.5.0>", "gift"], Cause::None), vec![None, None]);
    }

    #[test]
    fn new_table() {
        assert_eq!(run("new", &["\"t\"", "[]"], Cause::None), vec![Some(Reason::NotAtom), None]);
        assert_eq!(run("new", &["t", "set"], Cause::None), vec![None, Some(Reason::NotList)]);
        assert_eq!(
            run("new", &["t", "[named_table]"], Cause::AlreadyExists),
            vec![Some(Reason::NameAlreadyExists)]
        );
        assert_eq!(
            run("new", &["t", "[named_table, bogus]"], Cause::None),
            vec![None, Some(Reason::BadOptions)]
        );
        assert_eq!(
            run("new", &["t", "[set, {keypos, 2}, {write_concurrency, auto}]"], Cause::None),
            vec![None, None]
        );
    }

    #[test]
    fn second_argument_defaults() {
        assert_eq!(run("info", &["t", "colour"], Cause::None), vec![None, Some(Reason::BadInfoItem)]);
        assert_eq!(run("info", &["t", "size"], Cause::None), vec![None, None]);
        assert_eq!(run("info", &["t", "colour"], Cause::Id), vec![Some(Reason::NoSuchTable)]);
        assert_eq!(run("next", &["t", "k"], Cause::None), vec![None, Some(Reason::BadKey)]);
        assert_eq!(run("slot", &["t", "100"], Cause::None), vec![None, Some(Reason::Range)]);
        assert_eq!(run("slot", &["t", "x"], Cause::None), vec![None, Some(Reason::NotInteger)]);
        assert_eq!(run("safe_fixtable", &["t", "maybe"], Cause::None), vec![None, Some(Reason::BadBoolean)]);
        assert_eq!(run("setopts", &["t", "{heir, none}"], Cause::None), vec![None, None]);
        assert_eq!(run("setopts", &["t", "[{owner, x}]"], Cause::None), vec![None, Some(Reason::BadOptions)]);
    }

    #[test]
    fn select_and_match_specs() {
        assert_eq!(
            run("select", &["t", "[{'_', [], ['$_']}]"], Cause::None),
            vec![None, None]
        );
        assert_eq!(run("select", &["t", "[bogus]"], Cause::None), vec![None, Some(Reason::BadMatchspec)]);
        assert_eq!(
            run("select", &["t", "[bogus]", "0"], Cause::None),
            vec![None, Some(Reason::BadMatchspec), Some(Reason::NotPositiveInteger)]
        );
        assert_eq!(run("match_spec_compile", &["x"], Cause::None), vec![Some(Reason::BadMatchspec)]);
        assert_eq!(run("select", &["cont"], Cause::None), vec![Some(Reason::BadContinuation)]);
        assert_eq!(
            run("match_object", &["t", "{k,'_'}", "-1"], Cause::None),
            vec![None, None, Some(Reason::NotPositiveInteger)]
        );
    }

    #[test]
    fn objects_and_elements() {
        assert_eq!(run("insert", &["t", "[{a,1}, b]"], Cause::None), vec![None, Some(Reason::NotTupleOrList)]);
        assert_eq!(run("insert_new", &["t", "{a,1}"], Cause::None), vec![None, None]);
        assert_eq!(run("delete_object", &["t", "{}"], Cause::None), vec![None, Some(Reason::NotTuple)]);
        assert_eq!(
            run("update_element", &["t", "k", "{0, v}"], Cause::None),
            vec![None, None, Some(Reason::BadElementSpec)]
        );
        assert_eq!(
            run("update_element", &["t", "k", "[{2, v}]"], Cause::None),
            vec![None, None, Some(Reason::Range)]
        );
        assert_eq!(
            run("update_element", &["t", "k", "{1, v}"], Cause::KeyPos),
            vec![None, None, Some(Reason::SameAsKeypos)]
        );
        assert_eq!(
            run("update_element", &["t", "k", "{2, v}", "{k, 0}"], Cause::Id),
            vec![Some(Reason::NoSuchTable), None, None]
        );
    }

    #[test]
    fn whereis_name() {
        assert_eq!(run("whereis", &["t"], Cause::None), vec![None]);
        assert_eq!(run("whereis", &["1"], Cause::None), vec![Some(Reason::BadTableName)]);
    }
}

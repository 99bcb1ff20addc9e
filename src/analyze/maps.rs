use super::Call;
use crate::diagnostic::{Outcome, Reason};
use crate::probe::contained;
use crate::term::Term;
use crate::validate::{self, fun_of_arity, list, map};

pub fn analyze(call: &Call) -> Vec<Outcome> {
    let probe = call.probe;
    let map_or_iter = |t: &Term| validate::map_or_iterator(probe, t);
    match (call.name, call.args) {
        ("filter" | "filtermap" | "foreach" | "map", [fun, m]) => vec![fun_of_arity(fun, 2), map_or_iter(m)],
        ("find" | "is_key" | "remove" | "take", [_, m]) => vec![None, map(m)],
        ("fold", [fun, _, m]) => vec![fun_of_arity(fun, 3), None, map_or_iter(m)],
        ("from_keys", [keys, _]) => vec![list(keys)],
        ("from_list", [pairs]) => vec![list(pairs)],
        ("get", [key, m]) => vec![key_present(key, m), map(m)],
        ("get", [_, m, _]) => vec![None, map(m)],
        ("groups_from_list", [key_fun, items]) => vec![fun_of_arity(key_fun, 1), list(items)],
        ("groups_from_list", [key_fun, value_fun, items]) => {
            vec![fun_of_arity(key_fun, 1), fun_of_arity(value_fun, 1), list(items)]
        }
        ("intersect" | "merge", [a, b]) => vec![map(a), map(b)],
        ("intersect_with" | "merge_with", [combiner, a, b]) => vec![fun_of_arity(combiner, 3), map(a), map(b)],
        ("iterator" | "keys" | "size" | "values", [m]) => vec![map(m)],
        ("iterator", [m, order]) => vec![map(m), validate::map_iterator_order(order)],
        ("next", [iterator]) => vec![next(call, iterator)],
        ("put", [_, _, m]) => vec![None, None, map(m)],
        ("to_list", [m]) => vec![map_or_iter(m)],
        ("update", [key, _, m]) => vec![key_present(key, m), None, map(m)],
        ("update_with", [key, fun, m]) => vec![key_present(key, m), fun_of_arity(fun, 1), map(m)],
        ("update_with", [_, fun, m, _]) => vec![None, fun_of_arity(fun, 1), map(m)],
        ("with" | "without", [keys, m]) => vec![list(keys), map(m)],
        _ => Vec::new(),
    }
}

/// Only meaningful against an actual map; a non-map is reported on its own
/// argument.
fn key_present(key: &Term, m: &Term) -> Outcome {
    match m {
        Term::Map(_) if m.map_get(key).is_none() => Some(Reason::KeyNotPresent),
        _ => None,
    }
}

fn next(call: &Call, iterator: &Term) -> Outcome {
    contained("map_next", || call.probe.map_next(iterator))
        .err()
        .map(|_| Reason::BadIterator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Cause;
    use crate::probe::StdProbe;
    use crate::term::parse_term;

    fn run(name: &str, args: &[&str]) -> Vec<Outcome> {
        let args: Vec<Term> = args.iter().map(|a| parse_term(a).unwrap()).collect();
        let probe = StdProbe::new();
        analyze(&Call { name, args: &args, cause: &Cause::None, probe: &probe })
    }

    #[test]
    fn update_with_checks_fun_then_map() {
        assert_eq!(
            run("update_with", &["a", "fun m:f/2", "not_a_map"]),
            vec![None, Some(Reason::NotFun(1)), Some(Reason::NotMap)]
        );
        assert_eq!(
            run("update_with", &["a", "fun m:f/1", "#{b => 1}"]),
            vec![Some(Reason::KeyNotPresent), None, None]
        );
        assert_eq!(
            run("update_with", &["a", "fun m:f/1", "#{}", "0"]),
            vec![None, None, None]
        );
    }

    #[test]
    fn get_and_update_key_presence() {
        assert_eq!(run("get", &["a", "#{b => 1}"]), vec![Some(Reason::KeyNotPresent), None]);
        assert_eq!(run("get", &["a", "#{a => 1}"]), vec![None, None]);
        assert_eq!(run("get", &["a", "[]"]), vec![None, Some(Reason::NotMap)]);
        assert_eq!(run("get", &["a", "[]", "0"]), vec![None, Some(Reason::NotMap)]);
        assert_eq!(run("update", &["a", "1", "#{}"]), vec![Some(Reason::KeyNotPresent), None, None]);
    }

    #[test]
    fn funs_and_iterators() {
        assert_eq!(
            run("filter", &["fun m:f/1", "#{}"]),
            vec![Some(Reason::NotFun(2)), None]
        );
        assert_eq!(
            run("fold", &["fun m:f/3", "0", "42"]),
            vec![None, None, Some(Reason::NotMapOrIterator)]
        );
        assert_eq!(run("to_list", &["none"]), vec![None]);
        assert_eq!(run("next", &["{a,b}"]), vec![Some(Reason::BadIterator)]);
        assert_eq!(run("next", &["none"]), vec![None]);
        assert_eq!(run("iterator", &["#{}", "sideways"]), vec![None, Some(Reason::BadIteratorOrder)]);
    }

    #[test]
    fn lists_and_pairs_of_maps() {
        assert_eq!(run("from_list", &["x"]), vec![Some(Reason::NotList)]);
        assert_eq!(run("with", &["[a|b]", "#{}"]), vec![Some(Reason::NotProperList), None]);
        assert_eq!(run("merge", &["#{}", "[]"]), vec![None, Some(Reason::NotMap)]);
        assert_eq!(
            run("merge_with", &["fun m:f/2", "#{}", "#{}"]),
            vec![Some(Reason::NotFun(3)), None, None]
        );
        assert_eq!(
            run("groups_from_list", &["fun m:f/1", "x", "[]"]),
            vec![None, Some(Reason::NotFun(1)), None]
        );
    }
}

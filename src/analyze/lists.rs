use super::Call;
use crate::diagnostic::{Outcome, Reason};
use crate::term::Term;
use crate::validate;

pub fn analyze(call: &Call) -> Vec<Outcome> {
    match (call.name, call.args) {
        ("keyfind" | "keymember" | "keysearch", [_, n, list]) => {
            vec![None, validate::position(n), validate::list(list)]
        }
        ("member", [_, list]) => vec![None, validate::list(list)],
        ("reverse", [list, _]) => vec![validate::list(list)],
        ("seq", [from, to]) => seq(from, to),
        ("seq", [from, to, incr]) => seq_with_increment(from, to, incr),
        _ => Vec::new(),
    }
}

fn seq(from: &Term, to: &Term) -> Vec<Outcome> {
    match (from.as_integer(), to.as_integer()) {
        (Some(first), Some(last)) if i128::from(last) < i128::from(first) - 1 => vec![None, Some(Reason::Range)],
        (Some(_), Some(_)) => Vec::new(),
        _ => vec![validate::integer(from), validate::integer(to)],
    }
}

/// Once all three are integers the only failure left is an increment
/// pointing away from `To`.
fn seq_with_increment(from: &Term, to: &Term, incr: &Term) -> Vec<Outcome> {
    let (Some(first), Some(last), Some(step)) = (from.as_integer(), to.as_integer(), incr.as_integer()) else {
        return vec![validate::integer(from), validate::integer(to), validate::integer(incr)];
    };
    let (first, last, step) = (i128::from(first), i128::from(last), i128::from(step));
    let valid = (step > 0 && first - step <= last) || (step < 0 && first - step >= last) || (step == 0 && first == last);
    if valid {
        Vec::new()
    } else if step <= 0 && first - step <= last {
        vec![None, None, Some(Reason::NotPositiveIncrement)]
    } else {
        vec![None, None, Some(Reason::NotNegativeIncrement)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Cause;
    use crate::probe::StdProbe;

    fn run(name: &str, args: Vec<Term>) -> Vec<Outcome> {
        let probe = StdProbe::new();
        analyze(&Call { name, args: &args, cause: &Cause::None, probe: &probe })
    }

    #[test]
    fn key_position_and_list() {
        assert_eq!(
            run("keyfind", vec![Term::atom("k"), Term::int(0), Term::nil()]),
            vec![None, Some(Reason::Range), None]
        );
        assert_eq!(
            run("keymember", vec![Term::atom("k"), Term::atom("one"), Term::atom("l")]),
            vec![None, Some(Reason::NotInteger), Some(Reason::NotList)]
        );
        assert_eq!(
            run("keysearch", vec![Term::atom("k"), Term::int(1), Term::cons(vec![Term::int(1)], Term::int(2))]),
            vec![None, None, Some(Reason::NotProperList)]
        );
    }

    #[test]
    fn member_and_reverse() {
        assert_eq!(run("member", vec![Term::int(1), Term::atom("l")]), vec![None, Some(Reason::NotList)]);
        assert_eq!(run("reverse", vec![Term::int(1), Term::nil()]), vec![Some(Reason::NotList)]);
    }

    #[test]
    fn seq_two() {
        assert!(run("seq", vec![Term::int(1), Term::int(0)]).is_empty());
        assert_eq!(run("seq", vec![Term::int(5), Term::int(1)]), vec![None, Some(Reason::Range)]);
        assert_eq!(
            run("seq", vec![Term::atom("a"), Term::int(1)]),
            vec![Some(Reason::NotInteger), None]
        );
    }

    #[test]
    fn seq_increment_direction() {
        assert_eq!(
            run("seq", vec![Term::int(1), Term::int(10), Term::int(-1)]),
            vec![None, None, Some(Reason::NotPositiveIncrement)]
        );
        assert_eq!(
            run("seq", vec![Term::int(1), Term::int(10), Term::int(0)]),
            vec![None, None, Some(Reason::NotPositiveIncrement)]
        );
        assert_eq!(
            run("seq", vec![Term::int(10), Term::int(1), Term::int(1)]),
            vec![None, None, Some(Reason::NotNegativeIncrement)]
        );
        assert!(run("seq", vec![Term::int(10), Term::int(1), Term::int(-3)]).is_empty());
        assert!(run("seq", vec![Term::int(4), Term::int(4), Term::int(0)]).is_empty());
        assert_eq!(
            run("seq", vec![Term::int(1), Term::Float(2.0), Term::int(1)]),
            vec![None, Some(Reason::NotInteger), None]
        );
    }
}

use super::Call;
use crate::diagnostic::{Outcome, Reason};
use crate::term::Term;
use crate::validate::number;

/// Functions with a restricted domain, and whether `x` lies inside it.
fn in_domain(name: &str, x: f64) -> Option<bool> {
    let inside = match name {
        "acos" | "asin" => (-1.0..=1.0).contains(&x),
        "acosh" => x >= 1.0,
        "atanh" => x > -1.0 && x < 1.0,
        "log" | "log2" | "log10" => x > 0.0,
        "sqrt" => x >= 0.0,
        _ => return None,
    };
    Some(inside)
}

pub fn analyze(call: &Call) -> Vec<Outcome> {
    match (call.name, call.args) {
        (name, [x]) => vec![one(name, x)],
        ("fmod", [x, y]) => match (number(x), number(y)) {
            (None, None) if y.as_f64() == Some(0.0) => vec![None, Some(Reason::DomainError)],
            (x, y) => vec![x, y],
        },
        (_, [x, y]) => vec![number(x), number(y)],
        _ => Vec::new(),
    }
}

fn one(name: &str, x: &Term) -> Outcome {
    number(x).or_else(|| {
        let value = x.as_f64()?;
        match in_domain(name, value) {
            Some(false) => Some(Reason::DomainError),
            _ => None,
        }
    })
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
    fn domain_functions() {
        assert_eq!(run("sqrt", vec![Term::int(-4)]), vec![Some(Reason::DomainError)]);
        assert_eq!(run("log", vec![Term::int(0)]), vec![Some(Reason::DomainError)]);
        assert_eq!(run("acos", vec![Term::Float(1.5)]), vec![Some(Reason::DomainError)]);
        assert_eq!(run("atanh", vec![Term::int(1)]), vec![Some(Reason::DomainError)]);
        assert_eq!(run("sqrt", vec![Term::int(4)]), vec![None]);
    }

    #[test]
    fn non_numbers() {
        assert_eq!(run("sqrt", vec![Term::atom("four")]), vec![Some(Reason::NotNumber)]);
        assert_eq!(run("sin", vec![Term::nil()]), vec![Some(Reason::NotNumber)]);
        assert_eq!(
            run("pow", vec![Term::atom("a"), Term::int(2)]),
            vec![Some(Reason::NotNumber), None]
        );
    }

    #[test]
    fn fmod_by_zero() {
        assert_eq!(run("fmod", vec![Term::int(1), Term::int(0)]), vec![None, Some(Reason::DomainError)]);
        assert_eq!(run("fmod", vec![Term::int(1), Term::Float(0.0)]), vec![None, Some(Reason::DomainError)]);
        assert_eq!(run("fmod", vec![Term::int(1), Term::int(2)]), vec![None, None]);
        assert_eq!(
            run("fmod", vec![Term::atom("x"), Term::int(0)]),
            vec![Some(Reason::NotNumber), None]
        );
    }

    #[test]
    fn nullary_is_empty() {
        assert!(run("pi", Vec::new()).is_empty());
    }
}

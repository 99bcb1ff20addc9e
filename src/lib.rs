//! Explains why a call into the standard library failed, one message per
//! offending argument.
//!
//! ```
//! use errinfo::{describe_failure, Cause, Operation, parse_terms};
//!
//! let op = Operation::parse("binary", "part", 3).unwrap();
//! let args = parse_terms("[<<1,2,3>>, 2, 5]").unwrap();
//! let errors = describe_failure(&op, &args, &Cause::None);
//! assert_eq!(errors.get(3), Some("out of range"));
//! ```

pub mod analyze;
pub mod diagnostic;
pub mod operation;
pub mod probe;
pub mod term;
pub mod validate;

pub use diagnostic::{ErrorMap, Outcome, Reason};
pub use operation::{Cause, Family, Operation};
pub use probe::{Probe, StdProbe};
pub use term::{parse_term, parse_terms, Term};

/// Explain a failed call using the built-in probe.
pub fn describe_failure(op: &Operation, args: &[Term], cause: &Cause) -> ErrorMap {
    describe_failure_with(&StdProbe::default(), op, args, cause)
}

/// Explain a failed call, consulting `probe` for checks that need the real
/// operation. Never fails: unsupported calls yield an empty map.
pub fn describe_failure_with(probe: &dyn Probe, op: &Operation, args: &[Term], cause: &Cause) -> ErrorMap {
    if op.arity != args.len() {
        tracing::debug!(operation = %op, given = args.len(), "arity does not match argument count");
        return ErrorMap::default();
    }
    let call = analyze::Call { name: &op.name, args, cause, probe };
    let outcomes = analyze::analyze(op.family, &call);
    let errors = ErrorMap::assemble(outcomes);
    if errors.is_empty() {
        tracing::debug!(operation = %op, ?cause, "no argument-specific explanation");
    } else {
        tracing::debug!(operation = %op, ?cause, explained = errors.len(), "explained failed call");
    }
    errors
}

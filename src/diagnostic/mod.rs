pub mod ansi;
pub mod catalog;
pub mod json;

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};

/// One explanatory category for a single argument.
///
/// Tags (see [`Reason::tag`]) are the catalog keys. `NotFun` carries the
/// arity the argument should have accepted; `Unlisted` is a raw tag the
/// catalog does not know and is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    // ── Table identity (cause disambiguation) ────────────────────────────
    BadTableId,
    NotTableId,
    NoSuchTable,
    TableAccess,
    TableType,

    // ── Types ────────────────────────────────────────────────────────────
    Bitstring,
    NotAtom,
    NotBinary,
    NotInteger,
    NotList,
    NotMap,
    NotMapOrIterator,
    NotNumber,
    NotPid,
    NotPositiveInteger,
    NotProperList,
    NotTuple,
    NotTupleOrList,
    NotFun(u32),
    BadBoolean,

    // ── Binary ───────────────────────────────────────────────────────────
    BadBinaryList,
    BadBinaryPattern,
    BadEncodeOption,
    BadEndianness,
    BadPosLen,
    BadReplacement,
    EmptyBinary,
    HexDigits,
    HexOddSize,
    NotIodata,
    ScopeOutsideBinary,

    // ── Table ────────────────────────────────────────────────────────────
    AlreadyOwner,
    BadContinuation,
    BadElementSpec,
    BadInfoItem,
    BadKey,
    BadMatchspec,
    BadTableName,
    BadUpdateOp,
    CounterNotInteger,
    DeadProcess,
    NameAlreadyExists,
    NotOwner,
    PositionBeyondObject,
    SameAsKeypos,
    UpdateOpRange,

    // ── Lists / maps ─────────────────────────────────────────────────────
    BadIterator,
    BadIteratorOrder,
    KeyNotPresent,
    NotNegativeIncrement,
    NotPositiveIncrement,

    // ── Math ─────────────────────────────────────────────────────────────
    DomainError,

    // ── Regex / unicode ──────────────────────────────────────────────────
    BadCharData,
    BadEncoding,
    BadInspectItem,
    BadRegexp,
    NotCompiledRegexp,
    NotRegexp,

    // ── Shared ───────────────────────────────────────────────────────────
    BadOptions,
    Range,

    Unlisted(String),
}

impl Reason {
    pub fn tag(&self) -> &str {
        match self {
            Reason::BadTableId => "bad_table_id",
            Reason::NotTableId => "not_table_id",
            Reason::NoSuchTable => "no_such_table",
            Reason::TableAccess => "table_access",
            Reason::TableType => "table_type",
            Reason::Bitstring => "bitstring",
            Reason::NotAtom => "not_atom",
            Reason::NotBinary => "not_binary",
            Reason::NotInteger => "not_integer",
            Reason::NotList => "not_list",
            Reason::NotMap => "not_map",
            Reason::NotMapOrIterator => "not_map_or_iterator",
            Reason::NotNumber => "not_number",
            Reason::NotPid => "not_pid",
            Reason::NotPositiveInteger => "not_positive_integer",
            Reason::NotProperList => "not_proper_list",
            Reason::NotTuple => "not_tuple",
            Reason::NotTupleOrList => "not_tuple_or_list",
            Reason::NotFun(_) => "not_fun",
            Reason::BadBoolean => "bad_boolean",
            Reason::BadBinaryList => "bad_binary_list",
            Reason::BadBinaryPattern => "bad_binary_pattern",
            Reason::BadEncodeOption => "bad_encode_option",
            Reason::BadEndianness => "bad_endianness",
            Reason::BadPosLen => "bad_pos_len",
            Reason::BadReplacement => "bad_replacement",
            Reason::EmptyBinary => "empty_binary",
            Reason::HexDigits => "hex_digits",
            Reason::HexOddSize => "hex_odd_size",
            Reason::NotIodata => "not_iodata",
            Reason::ScopeOutsideBinary => "scope_outside_binary",
            Reason::AlreadyOwner => "already_owner",
            Reason::BadContinuation => "bad_continuation",
            Reason::BadElementSpec => "bad_element_spec",
            Reason::BadInfoItem => "bad_info_item",
            Reason::BadKey => "bad_key",
            Reason::BadMatchspec => "bad_matchspec",
            Reason::BadTableName => "bad_table_name",
            Reason::BadUpdateOp => "bad_update_op",
            Reason::CounterNotInteger => "counter_not_an_integer",
            Reason::DeadProcess => "dead_process",
            Reason::NameAlreadyExists => "name_already_exists",
            Reason::NotOwner => "not_owner",
            Reason::PositionBeyondObject => "position_beyond_object",
            Reason::SameAsKeypos => "same_as_keypos",
            Reason::UpdateOpRange => "update_op_range",
            Reason::BadIterator => "bad_iterator",
            Reason::BadIteratorOrder => "bad_iterator_order",
            Reason::KeyNotPresent => "key_not_present",
            Reason::NotNegativeIncrement => "not_negative_increment",
            Reason::NotPositiveIncrement => "not_positive_increment",
            Reason::DomainError => "domain_error",
            Reason::BadCharData => "bad_char_data",
            Reason::BadEncoding => "bad_encoding",
            Reason::BadInspectItem => "bad_inspect_item",
            Reason::BadRegexp => "bad_regexp",
            Reason::NotCompiledRegexp => "not_compiled_regexp",
            Reason::NotRegexp => "not_regexp",
            Reason::BadOptions => "bad_options",
            Reason::Range => "range",
            Reason::Unlisted(tag) => tag,
        }
    }
}

/// "No problem" is `None`.
pub type Outcome = Option<Reason>;

/// Sparse mapping from 1-based argument position to explanation text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMap(BTreeMap<usize, String>);

impl ErrorMap {
    /// Expand an outcome vector. Position `i` (0-based) in `outcomes`
    /// becomes key `i + 1`; `None` entries are skipped.
    pub fn assemble(outcomes: Vec<Outcome>) -> Self {
        let mut map = BTreeMap::new();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            if let Some(reason) = outcome {
                map.insert(index + 1, catalog::expand(&reason));
            }
        }
        ErrorMap(map)
    }

    pub fn get(&self, position: usize) -> Option<&str> {
        self.0.get(&position).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

impl Serialize for ErrorMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

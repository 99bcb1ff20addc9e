use super::Reason;

/// An entry in the message catalog.
pub struct CatalogEntry {
    pub tag: &'static str,
    pub text: &'static str,
}

/// Canonical text for every reason tag the analyzers produce.
pub static CATALOG: &[CatalogEntry] = &[
    // ── Table identity ───────────────────────────────────────────────────────
    CatalogEntry { tag: "bad_table_id", text: "not a valid table identifier" },
    CatalogEntry { tag: "not_table_id", text: "not an atom or a table identifier" },
    CatalogEntry {
        tag: "no_such_table",
        text: "the table identifier does not refer to an existing ETS table",
    },
    CatalogEntry {
        tag: "table_access",
        text: "the table identifier refers to an ETS table with insufficient access rights",
    },
    CatalogEntry {
        tag: "table_type",
        text: "the table identifier refers to an ETS table of a type not supported by this operation",
    },

    // ── Types ────────────────────────────────────────────────────────────────
    CatalogEntry { tag: "bitstring", text: "is a bitstring (expected a binary)" },
    CatalogEntry { tag: "not_atom", text: "not an atom" },
    CatalogEntry { tag: "not_binary", text: "not a binary" },
    CatalogEntry { tag: "not_integer", text: "not an integer" },
    CatalogEntry { tag: "not_list", text: "not a list" },
    CatalogEntry { tag: "not_map", text: "not a map" },
    CatalogEntry { tag: "not_map_or_iterator", text: "not a map or an iterator" },
    CatalogEntry { tag: "not_number", text: "not a number" },
    CatalogEntry { tag: "not_pid", text: "not a pid" },
    CatalogEntry { tag: "not_positive_integer", text: "not a positive integer" },
    CatalogEntry { tag: "not_proper_list", text: "not a proper list" },
    CatalogEntry { tag: "not_tuple", text: "not a tuple" },
    CatalogEntry {
        tag: "not_tuple_or_list",
        text: "not a non-empty tuple or a list of non-empty tuples",
    },
    CatalogEntry { tag: "not_fun", text: "not a fun" },
    CatalogEntry { tag: "bad_boolean", text: "not a boolean value" },

    // ── Binary ───────────────────────────────────────────────────────────────
    CatalogEntry { tag: "bad_binary_list", text: "not a flat list of binaries" },
    CatalogEntry { tag: "bad_binary_pattern", text: "not a valid pattern" },
    CatalogEntry { tag: "bad_encode_option", text: "not one of the atoms uppercase or lowercase" },
    CatalogEntry { tag: "bad_endianness", text: "must be 'big' or 'little'" },
    CatalogEntry { tag: "bad_pos_len", text: "not a valid {Pos,Length} tuple" },
    CatalogEntry { tag: "bad_replacement", text: "not a valid replacement" },
    CatalogEntry { tag: "empty_binary", text: "a zero-sized binary is not allowed" },
    CatalogEntry { tag: "hex_digits", text: "must only contain hex digits 0-9, A-F, and a-f" },
    CatalogEntry { tag: "hex_odd_size", text: "must contain an even number of bytes" },
    CatalogEntry { tag: "not_iodata", text: "not an iodata term" },
    CatalogEntry { tag: "scope_outside_binary", text: "specified part is not wholly inside binary" },

    // ── Table ────────────────────────────────────────────────────────────────
    CatalogEntry { tag: "already_owner", text: "the process is already the owner of the table" },
    CatalogEntry { tag: "bad_continuation", text: "invalid continuation" },
    CatalogEntry { tag: "bad_element_spec", text: "is not a valid element specification" },
    CatalogEntry { tag: "bad_info_item", text: "not a valid info item" },
    CatalogEntry { tag: "bad_key", text: "not a key that exists in the table" },
    CatalogEntry { tag: "bad_matchspec", text: "not a valid match specification" },
    CatalogEntry { tag: "bad_table_name", text: "invalid table name (must be an atom)" },
    CatalogEntry { tag: "bad_update_op", text: "not a valid update operation" },
    CatalogEntry {
        tag: "counter_not_an_integer",
        text: "the value in the given position, in the object, is not an integer",
    },
    CatalogEntry { tag: "dead_process", text: "the pid refers to a terminated process" },
    CatalogEntry { tag: "name_already_exists", text: "table name already exists" },
    CatalogEntry { tag: "not_owner", text: "the current process is not the owner" },
    CatalogEntry {
        tag: "position_beyond_object",
        text: "position is greater than the size of the object",
    },
    CatalogEntry { tag: "same_as_keypos", text: "the position is the same as the key position" },
    CatalogEntry {
        tag: "update_op_range",
        text: "the position in the update operation is out of range",
    },

    // ── Lists / maps ─────────────────────────────────────────────────────────
    CatalogEntry { tag: "bad_iterator", text: "not a valid iterator" },
    CatalogEntry {
        tag: "bad_iterator_order",
        text: "not 'ordered', 'reversed', or a fun that takes two arguments",
    },
    CatalogEntry { tag: "key_not_present", text: "not present in map" },
    CatalogEntry { tag: "not_negative_increment", text: "not a negative increment" },
    CatalogEntry { tag: "not_positive_increment", text: "not a positive increment" },

    // ── Math ─────────────────────────────────────────────────────────────────
    CatalogEntry { tag: "domain_error", text: "is outside the domain for this function" },

    // ── Regex / unicode ──────────────────────────────────────────────────────
    CatalogEntry { tag: "bad_char_data", text: "not valid character data (an iodata term)" },
    CatalogEntry { tag: "bad_encoding", text: "not a valid encoding" },
    CatalogEntry { tag: "bad_inspect_item", text: "not a valid item" },
    CatalogEntry { tag: "bad_regexp", text: "not a valid regular expression" },
    CatalogEntry { tag: "not_compiled_regexp", text: "not a compiled regular expression" },
    CatalogEntry {
        tag: "not_regexp",
        text: "neither an iodata term nor a compiled regular expression",
    },

    // ── Shared ───────────────────────────────────────────────────────────────
    CatalogEntry { tag: "bad_options", text: "invalid options" },
    CatalogEntry { tag: "range", text: "out of range" },
];

/// Look up catalog text by tag (e.g. `"not_binary"`).
pub fn lookup(tag: &str) -> Option<&'static str> {
    CATALOG.iter().find(|e| e.tag == tag).map(|e| e.text)
}

/// Text for a reason. Tags missing from the catalog are returned as-is.
pub fn expand(reason: &Reason) -> String {
    match reason {
        Reason::NotFun(1) => "not a fun that takes one argument".to_string(),
        Reason::NotFun(n) => format!("not a fun that takes {n} arguments"),
        other => {
            let tag = other.tag();
            lookup(tag).unwrap_or(tag).to_string()
        }
    }
}

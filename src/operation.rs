use std::fmt;

/// Standard-library module whose calls can be explained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    Binary,
    Ets,
    Lists,
    Maps,
    Math,
    Re,
    Unicode,
}

impl Family {
    pub fn from_module(module: &str) -> Option<Family> {
        match module {
            "binary" => Some(Family::Binary),
            "ets" => Some(Family::Ets),
            "lists" => Some(Family::Lists),
            "maps" => Some(Family::Maps),
            "math" => Some(Family::Math),
            "re" => Some(Family::Re),
            "unicode" => Some(Family::Unicode),
            _ => None,
        }
    }

    pub fn module(self) -> &'static str {
        match self {
            Family::Binary => "binary",
            Family::Ets => "ets",
            Family::Lists => "lists",
            Family::Maps => "maps",
            Family::Math => "math",
            Family::Re => "re",
            Family::Unicode => "unicode",
        }
    }
}

/// Identity of the failed call: `module:name/arity`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    pub family: Family,
    pub name: String,
    pub arity: usize,
}

impl Operation {
    pub fn new(family: Family, name: impl Into<String>, arity: usize) -> Self {
        Operation { family, name: name.into(), arity }
    }

    /// Resolve from a module name; unknown modules yield `None`.
    pub fn parse(module: &str, name: &str, arity: usize) -> Option<Self> {
        Family::from_module(module).map(|family| Operation::new(family, name, arity))
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.family.module(), self.name, self.arity)
    }
}

/// Low-level hint attached by the failing operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Cause {
    #[default]
    None,
    Type,
    Id,
    Access,
    TableType,
    BadKey,
    KeyPos,
    Position,
    Owner,
    NotOwner,
    BadOpt,
    AlreadyExists,
    Other(String),
}

impl Cause {
    pub fn from_atom(atom: &str) -> Cause {
        match atom {
            "none" => Cause::None,
            "type" => Cause::Type,
            "id" => Cause::Id,
            "access" => Cause::Access,
            "table_type" => Cause::TableType,
            "badkey" => Cause::BadKey,
            "keypos" => Cause::KeyPos,
            "position" => Cause::Position,
            "owner" => Cause::Owner,
            "not_owner" => Cause::NotOwner,
            "badopt" => Cause::BadOpt,
            "already_exists" => Cause::AlreadyExists,
            other => Cause::Other(other.to_string()),
        }
    }
}

//! Interaction option decoding
//!
//! Received options form a shallow tree (command → sub-command group →
//! sub-command → leaf). [`decode`] flattens one level of that tree into a
//! name-keyed map; descend by decoding a node's children.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.1.0: Typed option values replace raw JSON values
//! - 1.0.0: Initial name-keyed option collection

use std::collections::HashMap;

use super::descriptor::OptionKind;

/// Value carried by a received option, tagged with its kind
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    SubCommandGroup(Vec<IncomingOption>),
    SubCommand(Vec<IncomingOption>),
    String(String),
    Integer(i64),
    Boolean(bool),
    Number(f64),
    User(u64),
    Channel(u64),
    Role(u64),
    Mentionable(u64),
    Attachment(u64),
}

impl OptionValue {
    pub fn kind(&self) -> OptionKind {
        match self {
            OptionValue::SubCommandGroup(_) => OptionKind::SubCommandGroup,
            OptionValue::SubCommand(_) => OptionKind::SubCommand,
            OptionValue::String(_) => OptionKind::String,
            OptionValue::Integer(_) => OptionKind::Integer,
            OptionValue::Boolean(_) => OptionKind::Boolean,
            OptionValue::Number(_) => OptionKind::Number,
            OptionValue::User(_) => OptionKind::User,
            OptionValue::Channel(_) => OptionKind::Channel,
            OptionValue::Role(_) => OptionKind::Role,
            OptionValue::Mentionable(_) => OptionKind::Mentionable,
            OptionValue::Attachment(_) => OptionKind::Attachment,
        }
    }
}

/// One node of a received interaction's option tree
#[derive(Debug, Clone, PartialEq)]
pub struct IncomingOption {
    pub name: String,
    pub value: OptionValue,
}

impl IncomingOption {
    pub fn new(name: impl Into<String>, value: OptionValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    pub fn kind(&self) -> OptionKind {
        self.value.kind()
    }

    /// Nested options of a group or sub-command; empty for leaves
    pub fn children(&self) -> &[IncomingOption] {
        match &self.value {
            OptionValue::SubCommandGroup(children) | OptionValue::SubCommand(children) => children,
            _ => &[],
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            OptionValue::Integer(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            OptionValue::Boolean(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            OptionValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Snowflake of a user, channel, role, mentionable or attachment option
    pub fn as_id(&self) -> Option<u64> {
        match self.value {
            OptionValue::User(id)
            | OptionValue::Channel(id)
            | OptionValue::Role(id)
            | OptionValue::Mentionable(id)
            | OptionValue::Attachment(id) => Some(id),
            _ => None,
        }
    }
}

/// One level of an option tree, keyed by option name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedOptions<'a> {
    options: HashMap<&'a str, &'a IncomingOption>,
}

impl<'a> DecodedOptions<'a> {
    pub fn get(&self, name: &str) -> Option<&'a IncomingOption> {
        self.options.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// String value of a leaf, `None` if absent or not a string
    pub fn string(&self, name: &str) -> Option<&'a str> {
        self.get(name).and_then(IncomingOption::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(IncomingOption::as_i64)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(IncomingOption::as_bool)
    }

    /// Decode the children of the named group or sub-command
    pub fn children_of(&self, name: &str) -> Option<DecodedOptions<'a>> {
        self.get(name).map(|option| decode(option.children()))
    }
}

/// Collect sibling options into a name-keyed map
///
/// Later siblings overwrite earlier ones with the same name.
pub fn decode(children: &[IncomingOption]) -> DecodedOptions<'_> {
    let mut options = HashMap::with_capacity(children.len());
    for option in children {
        options.insert(option.name.as_str(), option);
    }
    DecodedOptions { options }
}

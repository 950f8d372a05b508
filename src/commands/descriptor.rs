//! Command descriptors
//!
//! Declared shape of a slash command, pushed verbatim to the gateway when the
//! session starts.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0
//!
//! ## Changelog
//! - 1.0.0: Descriptor and option schema types with builder-style constructors

use std::fmt;

/// Kind of a declared or received command option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    SubCommandGroup,
    SubCommand,
    String,
    Integer,
    Boolean,
    User,
    Channel,
    Role,
    Mentionable,
    Number,
    Attachment,
}

impl OptionKind {
    /// Whether options of this kind carry nested options instead of a value
    pub fn is_branch(self) -> bool {
        matches!(self, OptionKind::SubCommandGroup | OptionKind::SubCommand)
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OptionKind::SubCommandGroup => "sub-command-group",
            OptionKind::SubCommand => "sub-command",
            OptionKind::String => "string",
            OptionKind::Integer => "integer",
            OptionKind::Boolean => "boolean",
            OptionKind::User => "user",
            OptionKind::Channel => "channel",
            OptionKind::Role => "role",
            OptionKind::Mentionable => "mentionable",
            OptionKind::Number => "number",
            OptionKind::Attachment => "attachment",
        };
        f.write_str(name)
    }
}

/// One node of a command's declared option tree
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSchema {
    pub name: String,
    pub description: String,
    pub kind: OptionKind,
    pub required: bool,
    /// Only meaningful for group and sub-command kinds
    pub children: Vec<OptionSchema>,
}

impl OptionSchema {
    pub fn new(kind: OptionKind, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            required: false,
            children: Vec::new(),
        }
    }

    pub fn sub_command_group(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::SubCommandGroup, name, description)
    }

    pub fn sub_command(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::SubCommand, name, description)
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(OptionKind::String, name, description)
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Append a nested option (group or sub-command children)
    pub fn child(mut self, child: OptionSchema) -> Self {
        self.children.push(child);
        self
    }
}

/// Declared schema for one slash command
///
/// `name` is the dispatch key and must be unique within a session.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandDescriptor {
    pub name: String,
    pub description: String,
    pub options: Vec<OptionSchema>,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            options: Vec::new(),
        }
    }

    pub fn option(mut self, option: OptionSchema) -> Self {
        self.options.push(option);
        self
    }
}

//! Domain value objects: Language, Reach, CrudTag, SerializationStrategy, RoleTag.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity.
//! They hold NO type-mapping logic. All per-language type knowledge lives in
//! `type_mapping.rs`. This file's only job is to define the types, their
//! string representations, and their `FromStr` parsers.
//!
//! # Adding a New Target Language
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. Add its rows to the builtin table in `type_mapping.rs`
//! 4. Done. Treadles opt in by declaring outputs in that language.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Language ─────────────────────────────────────────────────────────────────

/// A target language a ring can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Front-end domain layer.
    TypeScript,
    /// Mobile binding layer.
    Kotlin,
    /// Native binding layer.
    Rust,
    /// Inter-process-call descriptors.
    Json,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::TypeScript,
        Language::Kotlin,
        Language::Rust,
        Language::Json,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TypeScript => "typescript",
            Self::Kotlin => "kotlin",
            Self::Rust => "rust",
            Self::Json => "json",
        }
    }

    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::TypeScript => "ts",
            Self::Kotlin => "kt",
            Self::Rust => "rs",
            Self::Json => "json",
        }
    }

    /// Whether values in this language cross a native/managed boundary
    /// (JNI on both sides), so non-primitive values need explicit conversion.
    pub const fn crosses_native_boundary(&self) -> bool {
        matches!(self, Self::Kotlin | Self::Rust)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "typescript" | "ts" => Ok(Self::TypeScript),
            "kotlin" | "kt" => Ok(Self::Kotlin),
            "rust" | "rs" => Ok(Self::Rust),
            "json" | "ipc" => Ok(Self::Json),
            other => Err(DomainError::InvalidValue {
                kind: "language",
                value: other.to_string(),
            }),
        }
    }
}

// ── Reach ────────────────────────────────────────────────────────────────────

/// Visibility level of a management specification.
///
/// Ordered: `Private < Internal < Public`, so "at least internal" is a plain
/// comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reach {
    Private,
    Internal,
    Public,
}

impl Reach {
    pub const ALL: [Reach; 3] = [Reach::Private, Reach::Internal, Reach::Public];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Internal => "internal",
            Self::Public => "public",
        }
    }
}

impl fmt::Display for Reach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Reach {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "private" => Ok(Self::Private),
            "internal" => Ok(Self::Internal),
            "public" => Ok(Self::Public),
            other => Err(DomainError::InvalidValue {
                kind: "reach",
                value: other.to_string(),
            }),
        }
    }
}

// ── CrudTag ──────────────────────────────────────────────────────────────────

/// CRUD intent of a management method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrudTag {
    Create,
    Read,
    Update,
    Delete,
    List,
    #[default]
    None,
}

impl CrudTag {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::List => "list",
            Self::None => "none",
        }
    }

    /// Guess the CRUD intent from a conventional method name prefix.
    pub fn infer_from_name(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        let starts = |prefixes: &[&str]| prefixes.iter().any(|p| lower.starts_with(p));

        if starts(&["create", "add", "insert", "new"]) {
            Self::Create
        } else if starts(&["list", "all", "search", "find_all"]) {
            Self::List
        } else if starts(&["get", "read", "find", "load", "fetch"]) {
            Self::Read
        } else if starts(&["update", "edit", "set", "patch", "rename"]) {
            Self::Update
        } else if starts(&["delete", "remove", "drop"]) {
            Self::Delete
        } else {
            Self::None
        }
    }
}

impl fmt::Display for CrudTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrudTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "read" | "get" => Ok(Self::Read),
            "update" => Ok(Self::Update),
            "delete" => Ok(Self::Delete),
            "list" => Ok(Self::List),
            "none" | "" => Ok(Self::None),
            other => Err(DomainError::InvalidValue {
                kind: "crud tag",
                value: other.to_string(),
            }),
        }
    }
}

// ── SerializationStrategy ────────────────────────────────────────────────────

/// How a value is marshalled across a binding boundary.
///
/// This classification, not the type name, selects the conversion fragment a
/// template emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SerializationStrategy {
    Primitive,
    String,
    StructByValue,
    Reference,
}

impl SerializationStrategy {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::String => "string",
            Self::StructByValue => "struct-by-value",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for SerializationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SerializationStrategy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "primitive" => Ok(Self::Primitive),
            "string" => Ok(Self::String),
            "struct" | "struct-by-value" => Ok(Self::StructByValue),
            "opaque" | "reference" => Ok(Self::Reference),
            other => Err(DomainError::InvalidValue {
                kind: "serialization strategy",
                value: other.to_string(),
            }),
        }
    }
}

// ── RoleTag ──────────────────────────────────────────────────────────────────

/// The role a ring plays in a spiral (`core`, `front-domain`, ...).
///
/// Role tags are what treadles match on. They are open-ended strings because
/// workspaces declare their own spiralers; the well-known ones are constants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleTag(String);

impl RoleTag {
    pub const CORE: &'static str = "core";
    pub const FRONT_DOMAIN: &'static str = "front-domain";
    pub const MOBILE_BINDING: &'static str = "mobile-binding";
    pub const NATIVE_BINDING: &'static str = "native-binding";
    pub const IPC_DESCRIPTOR: &'static str = "ipc-descriptor";

    /// Create a role tag.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` for empty tags or tags with whitespace.
    pub fn new(tag: impl Into<String>) -> Result<Self, DomainError> {
        let tag = tag.into();
        if tag.is_empty() || tag.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidValue {
                kind: "role tag",
                value: tag,
            });
        }
        Ok(Self(tag.to_ascii_lowercase()))
    }

    pub fn core() -> Self {
        Self(Self::CORE.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoleTag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl PartialEq<str> for RoleTag {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RoleTag {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

//! Type-mapping registry.
//!
//! # Design Rationale
//!
//! Every abstract type a spec can mention is described exactly once per target
//! language by a [`TypeMappingEntry`]. Builtin primitives come from the static
//! [`BUILTIN_TYPES`] table; workspace entities are appended at collection time
//! via [`TypeMappingTable::register_entity`]. List types (`T[]`) are derived
//! from their element type and never stored.
//!
//! Lookups are total: an abstract type with no row for the requested language
//! is an [`DomainError::UnmappedType`], never a silent default. A wrong
//! signature in generated code is worse than a failed run.
//!
//! # Adding a New Builtin Type
//!
//! 1. Add one [`BuiltinType`] entry to [`BUILTIN_TYPES`]
//! 2. That's it. Discovery and rendering derive from the table.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{
    entities::management::EntityDecl,
    error::DomainError,
    value_objects::{Language, SerializationStrategy},
};

/// Suffix marking a list type in spec sources (`Bookmark[]`).
pub const LIST_SUFFIX: &str = "[]";

/// The abstract type meaning "returns nothing".
pub const VOID: &str = "void";

// ── Entries ──────────────────────────────────────────────────────────────────

/// One row of the mapping table: how an abstract type looks in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeMappingEntry {
    pub abstract_type: String,
    pub language: Language,
    pub target_type: String,
    pub strategy: SerializationStrategy,
    /// Value returned when an error crosses the binding boundary.
    pub error_sentinel: String,
    pub is_primitive: bool,
}

/// Marshalling fragments a template calls at a native boundary crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConversionHelper {
    pub decode: &'static str,
    pub encode: &'static str,
}

// ── Builtin table ────────────────────────────────────────────────────────────

/// Static description of a builtin abstract type across all languages.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinType {
    pub name: &'static str,
    pub strategy: SerializationStrategy,
    pub is_primitive: bool,
    /// `(language, target type, error sentinel)` for every supported language.
    pub targets: &'static [(Language, &'static str, &'static str)],
}

const NULL_PTR: &str = "std::ptr::null_mut()";

/// Single source of truth for builtin types.
pub static BUILTIN_TYPES: &[BuiltinType] = &[
    BuiltinType {
        name: "string",
        strategy: SerializationStrategy::String,
        is_primitive: false,
        targets: &[
            (Language::TypeScript, "string", "null"),
            (Language::Kotlin, "String", "null"),
            (Language::Rust, "jstring", NULL_PTR),
            (Language::Json, "string", "null"),
        ],
    },
    BuiltinType {
        name: "url",
        strategy: SerializationStrategy::String,
        is_primitive: false,
        targets: &[
            (Language::TypeScript, "string", "null"),
            (Language::Kotlin, "String", "null"),
            (Language::Rust, "jstring", NULL_PTR),
            (Language::Json, "string", "null"),
        ],
    },
    BuiltinType {
        name: "bool",
        strategy: SerializationStrategy::Primitive,
        is_primitive: true,
        targets: &[
            (Language::TypeScript, "boolean", "null"),
            (Language::Kotlin, "Boolean", "null"),
            (Language::Rust, "jboolean", "0"),
            (Language::Json, "boolean", "null"),
        ],
    },
    BuiltinType {
        name: "i32",
        strategy: SerializationStrategy::Primitive,
        is_primitive: true,
        targets: &[
            (Language::TypeScript, "number", "null"),
            (Language::Kotlin, "Int", "null"),
            (Language::Rust, "jint", "-1"),
            (Language::Json, "integer", "null"),
        ],
    },
    BuiltinType {
        name: "i64",
        strategy: SerializationStrategy::Primitive,
        is_primitive: true,
        targets: &[
            (Language::TypeScript, "number", "null"),
            (Language::Kotlin, "Long", "null"),
            (Language::Rust, "jlong", "-1"),
            (Language::Json, "integer", "null"),
        ],
    },
    BuiltinType {
        name: "id",
        strategy: SerializationStrategy::Primitive,
        is_primitive: true,
        targets: &[
            (Language::TypeScript, "number", "null"),
            (Language::Kotlin, "Long", "null"),
            (Language::Rust, "jlong", "-1"),
            (Language::Json, "integer", "null"),
        ],
    },
    BuiltinType {
        name: "timestamp",
        strategy: SerializationStrategy::Primitive,
        is_primitive: true,
        targets: &[
            (Language::TypeScript, "number", "null"),
            (Language::Kotlin, "Long", "null"),
            (Language::Rust, "jlong", "-1"),
            (Language::Json, "integer", "null"),
        ],
    },
    BuiltinType {
        name: "f64",
        strategy: SerializationStrategy::Primitive,
        is_primitive: true,
        targets: &[
            (Language::TypeScript, "number", "null"),
            (Language::Kotlin, "Double", "null"),
            (Language::Rust, "jdouble", "f64::NAN"),
            (Language::Json, "number", "null"),
        ],
    },
    BuiltinType {
        name: "bytes",
        strategy: SerializationStrategy::Reference,
        is_primitive: false,
        targets: &[
            (Language::TypeScript, "Uint8Array", "null"),
            (Language::Kotlin, "ByteArray", "null"),
            (Language::Rust, "jbyteArray", NULL_PTR),
            (Language::Json, "string", "null"),
        ],
    },
    BuiltinType {
        name: VOID,
        strategy: SerializationStrategy::Primitive,
        is_primitive: true,
        targets: &[
            (Language::TypeScript, "void", "undefined"),
            (Language::Kotlin, "Unit", "Unit"),
            (Language::Rust, "()", "()"),
            (Language::Json, "null", "null"),
        ],
    },
];

/// Look up a builtin by abstract name.
pub fn find_builtin(name: &str) -> Option<&'static BuiltinType> {
    BUILTIN_TYPES.iter().find(|b| b.name == name)
}

/// Marshalling helper selected by classification.
///
/// Returns `None` when the value crosses the boundary as-is. Kotlin hands
/// primitives and strings to JNI directly; Rust must convert everything that
/// is not a JNI primitive.
pub fn conversion_helper(
    language: Language,
    strategy: SerializationStrategy,
) -> Option<ConversionHelper> {
    use SerializationStrategy as S;

    if !language.crosses_native_boundary() {
        return None;
    }

    match (language, strategy) {
        (_, S::Primitive) => None,
        (Language::Kotlin, S::String) => None,
        (Language::Kotlin, S::StructByValue) => Some(ConversionHelper {
            decode: "WeftCodec.decode",
            encode: "WeftCodec.encode",
        }),
        (Language::Kotlin, S::Reference) => Some(ConversionHelper {
            decode: "WeftHandles.resolve",
            encode: "WeftHandles.register",
        }),
        (Language::Rust, S::String) => Some(ConversionHelper {
            decode: "decode_string",
            encode: "encode_string",
        }),
        (Language::Rust, S::StructByValue) => Some(ConversionHelper {
            decode: "decode_struct",
            encode: "encode_struct",
        }),
        (Language::Rust, S::Reference) => Some(ConversionHelper {
            decode: "decode_handle",
            encode: "encode_handle",
        }),
        _ => None,
    }
}

/// Target type name and sentinel for a workspace entity.
fn entity_target(
    name: &str,
    language: Language,
    strategy: SerializationStrategy,
) -> (String, String) {
    match (language, strategy) {
        (Language::TypeScript, _) => (name.to_string(), "null".into()),
        (Language::Kotlin, _) => (name.to_string(), "null".into()),
        (Language::Rust, SerializationStrategy::Reference) => ("jlong".into(), "0".into()),
        (Language::Rust, _) => ("jbyteArray".into(), NULL_PTR.into()),
        (Language::Json, _) => (format!("#/definitions/{name}"), "null".into()),
    }
}

/// List type name derived from the element's target name.
fn list_target(element: &str, language: Language) -> (String, String) {
    match language {
        Language::TypeScript => (format!("{element}[]"), "null".into()),
        Language::Kotlin => (format!("List<{element}>"), "null".into()),
        Language::Rust => ("jbyteArray".into(), NULL_PTR.into()),
        Language::Json => ("array".into(), "null".into()),
    }
}

// ── Table ────────────────────────────────────────────────────────────────────

/// Append-only mapping table: builtins plus registered entities.
///
/// Read-only once generation starts, so it is shared across render workers.
#[derive(Debug, Clone, Default)]
pub struct TypeMappingTable {
    entries: BTreeMap<(String, Language), TypeMappingEntry>,
}

impl TypeMappingTable {
    /// An empty table. Most callers want [`TypeMappingTable::with_builtins`].
    pub fn new() -> Self {
        Self::default()
    }

    /// A table preloaded with every [`BUILTIN_TYPES`] row.
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for builtin in BUILTIN_TYPES {
            for (language, target, sentinel) in builtin.targets {
                table.entries.insert(
                    (builtin.name.to_string(), *language),
                    TypeMappingEntry {
                        abstract_type: builtin.name.to_string(),
                        language: *language,
                        target_type: (*target).to_string(),
                        strategy: builtin.strategy,
                        error_sentinel: (*sentinel).to_string(),
                        is_primitive: builtin.is_primitive,
                    },
                );
            }
        }
        table
    }

    /// Append one entry.
    ///
    /// # Errors
    ///
    /// `DuplicateTypeMapping` if the `(type, language)` key already exists.
    pub fn register(&mut self, entry: TypeMappingEntry) -> Result<(), DomainError> {
        let key = (entry.abstract_type.clone(), entry.language);
        if self.entries.contains_key(&key) {
            return Err(DomainError::DuplicateTypeMapping {
                type_name: entry.abstract_type,
                language: entry.language.to_string(),
            });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Register a workspace entity for each language it allows.
    pub fn register_entity(&mut self, entity: &EntityDecl) -> Result<(), DomainError> {
        for language in entity.languages() {
            let (target_type, error_sentinel) =
                entity_target(entity.name(), language, entity.strategy());
            self.register(TypeMappingEntry {
                abstract_type: entity.name().to_string(),
                language,
                target_type,
                strategy: entity.strategy(),
                error_sentinel,
                is_primitive: false,
            })?;
        }
        Ok(())
    }

    /// Resolve an abstract type for a language.
    ///
    /// # Errors
    ///
    /// `UnmappedType` naming the type and language when no row exists.
    pub fn resolve(
        &self,
        abstract_type: &str,
        language: Language,
    ) -> Result<TypeMappingEntry, DomainError> {
        if let Some(element) = abstract_type.strip_suffix(LIST_SUFFIX) {
            if element == VOID {
                return Err(self.unmapped(abstract_type, language));
            }
            let inner = self.resolve(element, language)?;
            let (target_type, error_sentinel) = list_target(&inner.target_type, language);
            return Ok(TypeMappingEntry {
                abstract_type: abstract_type.to_string(),
                language,
                target_type,
                strategy: SerializationStrategy::Reference,
                error_sentinel,
                is_primitive: false,
            });
        }

        self.entries
            .get(&(abstract_type.to_string(), language))
            .cloned()
            .ok_or_else(|| self.unmapped(abstract_type, language))
    }

    /// Declared type name, wrapped for optionality where the language
    /// distinguishes it. Rust JNI references are already nullable pointers.
    pub fn declared_type(
        &self,
        abstract_type: &str,
        language: Language,
        optional: bool,
    ) -> Result<String, DomainError> {
        let entry = self.resolve(abstract_type, language)?;
        if !optional {
            return Ok(entry.target_type);
        }
        Ok(match language {
            Language::TypeScript => format!("{} | null", entry.target_type),
            Language::Kotlin => format!("{}?", entry.target_type),
            Language::Rust | Language::Json => entry.target_type,
        })
    }

    /// Whether a value of this type needs a conversion call at the boundary.
    pub fn needs_conversion(
        &self,
        abstract_type: &str,
        language: Language,
    ) -> Result<bool, DomainError> {
        let entry = self.resolve(abstract_type, language)?;
        Ok(conversion_helper(language, entry.strategy).is_some())
    }

    /// Value to return when an error crosses the boundary.
    pub fn error_sentinel(
        &self,
        abstract_type: &str,
        language: Language,
    ) -> Result<String, DomainError> {
        Ok(self.resolve(abstract_type, language)?.error_sentinel)
    }

    /// Language-independent marshalling class of a type.
    pub fn serialization_strategy(
        &self,
        abstract_type: &str,
    ) -> Result<SerializationStrategy, DomainError> {
        if let Some(element) = abstract_type.strip_suffix(LIST_SUFFIX) {
            // Validates the element exists.
            self.serialization_strategy(element)?;
            return Ok(SerializationStrategy::Reference);
        }
        self.entries
            .values()
            .find(|e| e.abstract_type == abstract_type)
            .map(|e| e.strategy)
            .ok_or_else(|| DomainError::UnmappedType {
                type_name: abstract_type.to_string(),
                language: "any".into(),
            })
    }

    /// Whether the type exists in the universe for at least one language.
    pub fn is_declared(&self, abstract_type: &str) -> bool {
        match abstract_type.strip_suffix(LIST_SUFFIX) {
            Some(VOID) => false,
            Some(element) => self.is_declared(element),
            None => self.entries.keys().any(|(name, _)| name == abstract_type),
        }
    }

    /// All rows for one language, ordered by abstract type.
    pub fn entries_for(&self, language: Language) -> Vec<&TypeMappingEntry> {
        self.entries
            .values()
            .filter(|e| e.language == language)
            .collect()
    }

    /// Every distinct abstract type name in the table.
    pub fn abstract_types(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(|(n, _)| n.as_str()).collect();
        names.dedup();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn unmapped(&self, abstract_type: &str, language: Language) -> DomainError {
        DomainError::UnmappedType {
            type_name: abstract_type.to_string(),
            language: language.to_string(),
        }
    }
}

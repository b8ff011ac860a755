//! Management specifications and the collected catalog.
//!
//! A [`ManagementSpec`] is immutable once collected. The [`ManagementCatalog`]
//! owns every spec of a workspace in collection order and offers pure
//! projections over them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use crate::domain::{
    error::DomainError,
    type_mapping::TypeMappingTable,
    value_objects::{CrudTag, Language, Reach, SerializationStrategy},
};

/// One method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParamSpec {
    pub name: String,
    pub abstract_type: String,
    pub optional: bool,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, abstract_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abstract_type: abstract_type.into(),
            optional: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// One operation of a management.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSpec {
    pub name: String,
    pub params: Vec<ParamSpec>,
    pub return_type: String,
    pub crud: CrudTag,
    /// Free-form labels used by method filters (`front-facing`, `internal`).
    pub tags: Vec<String>,
    pub doc: Option<String>,
}

impl MethodSpec {
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: return_type.into(),
            crud: CrudTag::None,
            tags: Vec::new(),
            doc: None,
        }
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn crud(mut self, crud: CrudTag) -> Self {
        self.crud = crud;
        self
    }

    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Parameter types followed by the return type.
    pub fn referenced_types(&self) -> impl Iterator<Item = &str> {
        self.params
            .iter()
            .map(|p| p.abstract_type.as_str())
            .chain(std::iter::once(self.return_type.as_str()))
    }
}

/// A named capability set with a visibility level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagementSpec {
    name: String,
    reach: Reach,
    methods: Vec<MethodSpec>,
}

impl ManagementSpec {
    /// Create a spec.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` for an empty name, `MalformedSpec` for no
    /// methods, an empty method name, two methods sharing a name or a
    /// method repeating a parameter name.
    pub fn new(
        name: impl Into<String>,
        reach: Reach,
        methods: Vec<MethodSpec>,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::MissingRequiredField { field: "name" });
        }

        if methods.is_empty() {
            return Err(DomainError::MalformedSpec {
                source_name: name,
                reason: "declares no methods".into(),
            });
        }

        let mut seen = HashSet::new();
        for method in &methods {
            if method.name.trim().is_empty() {
                return Err(DomainError::MalformedSpec {
                    source_name: name,
                    reason: "method with empty name".into(),
                });
            }
            if !seen.insert(method.name.as_str()) {
                return Err(DomainError::MalformedSpec {
                    source_name: name.clone(),
                    reason: format!("method '{}' declared twice", method.name),
                });
            }
            let mut params = HashSet::new();
            if let Some(param) = method.params.iter().find(|p| !params.insert(p.name.as_str())) {
                return Err(DomainError::MalformedSpec {
                    source_name: name.clone(),
                    reason: format!(
                        "parameter '{}' repeated in method '{}'",
                        param.name, method.name
                    ),
                });
            }
        }

        Ok(Self {
            name,
            reach,
            methods,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn reach(&self) -> Reach {
        self.reach
    }

    pub fn methods(&self) -> &[MethodSpec] {
        &self.methods
    }

    pub fn has_crud(&self, tag: CrudTag) -> bool {
        self.methods.iter().any(|m| m.crud == tag)
    }
}

/// A domain type declared by the workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityDecl {
    name: String,
    strategy: SerializationStrategy,
    languages: Option<Vec<Language>>,
}

impl EntityDecl {
    pub fn new(name: impl Into<String>, strategy: SerializationStrategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            languages: None,
        }
    }

    /// Limit the entity to a subset of target languages.
    pub fn restricted_to(mut self, languages: Vec<Language>) -> Self {
        self.languages = Some(languages);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strategy(&self) -> SerializationStrategy {
        self.strategy
    }

    /// Languages the entity can be expressed in; all of them when unrestricted.
    pub fn languages(&self) -> Vec<Language> {
        match &self.languages {
            Some(langs) => langs.clone(),
            None => Language::ALL.to_vec(),
        }
    }
}

/// Every collected spec of a workspace, in collection order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManagementCatalog {
    specs: Vec<ManagementSpec>,
}

impl ManagementCatalog {
    /// Build the catalog, enforcing discovery invariants.
    ///
    /// # Errors
    ///
    /// - `DuplicateManagement` when two specs share a name within one reach
    /// - `UndeclaredType` when a method names a type outside the universe
    pub fn new(
        specs: Vec<ManagementSpec>,
        types: &TypeMappingTable,
    ) -> Result<Self, DomainError> {
        let mut seen = HashSet::new();
        for spec in &specs {
            if !seen.insert((spec.name(), spec.reach())) {
                return Err(DomainError::DuplicateManagement {
                    name: spec.name().to_string(),
                    reach: spec.reach().to_string(),
                });
            }

            for method in spec.methods() {
                if let Some(missing) = method.referenced_types().find(|t| !types.is_declared(t)) {
                    return Err(DomainError::UndeclaredType {
                        spec: spec.name().to_string(),
                        method: method.name.clone(),
                        type_name: missing.to_string(),
                    });
                }
            }
        }

        Ok(Self { specs })
    }

    pub fn specs(&self) -> &[ManagementSpec] {
        &self.specs
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// First spec with the given name.
    pub fn get(&self, name: &str) -> Option<&ManagementSpec> {
        self.specs.iter().find(|s| s.name() == name)
    }

    pub fn filter_by_reach(&self, reach: Reach) -> Vec<&ManagementSpec> {
        self.specs.iter().filter(|s| s.reach() == reach).collect()
    }

    /// Specs visible at `reach` or wider.
    pub fn filter_by_min_reach(&self, reach: Reach) -> Vec<&ManagementSpec> {
        self.specs.iter().filter(|s| s.reach() >= reach).collect()
    }

    /// Specs declaring at least one method with the tag.
    pub fn filter_by_crud(&self, tag: CrudTag) -> Vec<&ManagementSpec> {
        self.specs.iter().filter(|s| s.has_crud(tag)).collect()
    }

    pub fn group_by_reach(&self) -> BTreeMap<Reach, Vec<&ManagementSpec>> {
        let mut groups: BTreeMap<Reach, Vec<&ManagementSpec>> = BTreeMap::new();
        for spec in &self.specs {
            groups.entry(spec.reach()).or_default().push(spec);
        }
        groups
    }

    /// Every abstract type mentioned by any method.
    pub fn referenced_types(&self) -> BTreeSet<&str> {
        self.specs
            .iter()
            .flat_map(|s| s.methods())
            .flat_map(|m| m.referenced_types())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn types() -> TypeMappingTable {
        let mut table = TypeMappingTable::with_builtins();
        table
            .register_entity(&EntityDecl::new("Bookmark", SerializationStrategy::StructByValue))
            .unwrap();
        table
    }

    fn bookmark(reach: Reach) -> ManagementSpec {
        ManagementSpec::new(
            "Bookmark",
            reach,
            vec![
                MethodSpec::new("create", "Bookmark")
                    .param(ParamSpec::new("url", "url"))
                    .crud(CrudTag::Create),
                MethodSpec::new("list", "Bookmark[]").crud(CrudTag::List),
                MethodSpec::new("delete", "bool")
                    .param(ParamSpec::new("id", "id"))
                    .crud(CrudTag::Delete),
            ],
        )
        .unwrap()
    }

    fn person() -> ManagementSpec {
        ManagementSpec::new(
            "Person",
            Reach::Internal,
            vec![MethodSpec::new("get", "string")
                .param(ParamSpec::new("id", "id"))
                .crud(CrudTag::Read)],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_name_in_same_reach() {
        let err = ManagementCatalog::new(
            vec![bookmark(Reach::Public), bookmark(Reach::Public)],
            &types(),
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateManagement { .. }));
    }

    #[test]
    fn allows_same_name_in_different_reach() {
        let catalog = ManagementCatalog::new(
            vec![bookmark(Reach::Public), bookmark(Reach::Private)],
            &types(),
        )
        .unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn rejects_undeclared_type() {
        let spec = ManagementSpec::new(
            "Geo",
            Reach::Public,
            vec![MethodSpec::new("locate", "Coordinates")],
        )
        .unwrap();
        let err = ManagementCatalog::new(vec![spec], &types()).unwrap_err();
        assert_eq!(
            err,
            DomainError::UndeclaredType {
                spec: "Geo".into(),
                method: "locate".into(),
                type_name: "Coordinates".into(),
            }
        );
    }

    #[test]
    fn rejects_duplicate_method() {
        let err = ManagementSpec::new(
            "Bookmark",
            Reach::Public,
            vec![MethodSpec::new("get", "void"), MethodSpec::new("get", "void")],
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::MalformedSpec { .. }));
    }

    #[test]
    fn rejects_spec_without_methods() {
        let err = ManagementSpec::new("Hollow", Reach::Public, vec![]).unwrap_err();
        assert_eq!(
            err,
            DomainError::MalformedSpec {
                source_name: "Hollow".into(),
                reason: "declares no methods".into(),
            }
        );
    }

    #[test]
    fn rejects_repeated_parameter_name() {
        let err = ManagementSpec::new(
            "Bookmark",
            Reach::Public,
            vec![
                MethodSpec::new("rename", "void")
                    .param(ParamSpec::new("id", "id"))
                    .param(ParamSpec::new("id", "string")),
            ],
        )
        .unwrap_err();
        match err {
            DomainError::MalformedSpec { source_name, reason } => {
                assert_eq!(source_name, "Bookmark");
                assert!(reason.contains("'id'"));
                assert!(reason.contains("'rename'"));
            }
            other => panic!("expected malformed spec, got {other:?}"),
        }
    }

    #[test]
    fn same_parameter_name_across_methods_is_fine() {
        let spec = ManagementSpec::new(
            "Bookmark",
            Reach::Public,
            vec![
                MethodSpec::new("get", "Bookmark").param(ParamSpec::new("id", "id")),
                MethodSpec::new("delete", "bool").param(ParamSpec::new("id", "id")),
            ],
        );
        assert!(spec.is_ok());
    }

    #[test]
    fn projections_do_not_mutate() {
        let catalog =
            ManagementCatalog::new(vec![bookmark(Reach::Public), person()], &types()).unwrap();

        assert_eq!(catalog.filter_by_reach(Reach::Internal).len(), 1);
        assert_eq!(catalog.filter_by_min_reach(Reach::Internal).len(), 2);
        assert_eq!(catalog.filter_by_crud(CrudTag::Delete).len(), 1);
        assert_eq!(catalog.filter_by_crud(CrudTag::Update).len(), 0);

        let groups = catalog.group_by_reach();
        assert_eq!(groups[&Reach::Public][0].name(), "Bookmark");
        assert_eq!(groups[&Reach::Internal][0].name(), "Person");

        // Repeated calls see the same data.
        assert_eq!(catalog.filter_by_reach(Reach::Internal).len(), 1);
        assert_eq!(catalog.specs()[0].name(), "Bookmark");
    }

    #[test]
    fn referenced_types_are_collected() {
        let catalog = ManagementCatalog::new(vec![bookmark(Reach::Public)], &types()).unwrap();
        let refs = catalog.referenced_types();
        assert!(refs.contains("url"));
        assert!(refs.contains("Bookmark[]"));
        assert!(refs.contains("bool"));
    }
}

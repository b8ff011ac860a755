//! Property tests: type mapping is total over the registered universe.

use proptest::prelude::*;
use weft_core::domain::{
    EntityDecl, Language, ManagementCatalog, ManagementSpec, MethodSpec, ParamSpec, Reach,
    SerializationStrategy, TypeMappingTable, type_mapping::BUILTIN_TYPES,
};

// ---------------------------------------------------------------------------
// Helpers / Strategies
// ---------------------------------------------------------------------------

const ENTITIES: [&str; 3] = ["Bookmark", "Person", "Media"];

fn table() -> TypeMappingTable {
    let mut table = TypeMappingTable::with_builtins();
    table
        .register_entity(&EntityDecl::new("Bookmark", SerializationStrategy::StructByValue))
        .unwrap();
    table
        .register_entity(&EntityDecl::new("Person", SerializationStrategy::StructByValue))
        .unwrap();
    table
        .register_entity(&EntityDecl::new("Media", SerializationStrategy::Reference))
        .unwrap();
    table
}

/// A non-void type from the universe, optionally as a list.
fn arb_value_type() -> impl Strategy<Value = String> {
    let names: Vec<String> = BUILTIN_TYPES
        .iter()
        .map(|b| b.name.to_string())
        .filter(|n| n != "void")
        .chain(ENTITIES.iter().map(|e| e.to_string()))
        .collect();

    (prop::sample::select(names), any::<bool>()).prop_map(|(name, list)| {
        if list { format!("{name}[]") } else { name }
    })
}

fn arb_return_type() -> impl Strategy<Value = String> {
    prop_oneof![Just("void".to_string()), arb_value_type()]
}

fn arb_method(index: usize) -> impl Strategy<Value = MethodSpec> {
    (
        prop::collection::vec((arb_value_type(), any::<bool>()), 0..4),
        arb_return_type(),
    )
        .prop_map(move |(params, returns)| {
            params.into_iter().enumerate().fold(
                MethodSpec::new(format!("op_{index}"), returns),
                |m, (i, (ty, optional))| {
                    let p = ParamSpec::new(format!("arg{i}"), ty);
                    m.param(if optional { p.optional() } else { p })
                },
            )
        })
}

fn arb_spec() -> impl Strategy<Value = ManagementSpec> {
    (1usize..6)
        .prop_flat_map(|n| (0..n).map(arb_method).collect::<Vec<_>>())
        .prop_map(|methods| ManagementSpec::new("Generated", Reach::Public, methods).unwrap())
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Specs built only from registered types resolve in every language.
    #[test]
    fn registered_types_always_resolve(spec in arb_spec()) {
        let table = table();
        let catalog = ManagementCatalog::new(vec![spec], &table);
        prop_assert!(catalog.is_ok());

        for ty in catalog.unwrap().referenced_types() {
            for language in Language::ALL {
                prop_assert!(table.resolve(ty, language).is_ok(), "{} in {}", ty, language);
                prop_assert!(table.error_sentinel(ty, language).is_ok());
                prop_assert!(table.needs_conversion(ty, language).is_ok());
            }
            prop_assert!(table.serialization_strategy(ty).is_ok());
        }
    }

    /// Names outside the universe never resolve.
    #[test]
    fn unknown_names_never_resolve(name in "[A-Z][a-z]{3,8}Unknown") {
        let table = table();
        for language in Language::ALL {
            prop_assert!(table.resolve(&name, language).is_err());
        }
        prop_assert!(!table.is_declared(&name));
    }
}

//! Heddles: choose the treadle for a ring pair.
//!
//! Selection is first-match in registration order, never best-match. A
//! structurally matching treadle whose validator rejects the pair is a hard
//! error; the search does not fall through to later treadles.

use tracing::debug;

use crate::domain::{
    entities::{ring::Ring, treadle::Treadle, treadle::TreadleRegistry},
    error::DomainError,
};

/// Select the treadle for `(current, previous)`.
///
/// Returns `Ok(None)` when nothing matches: the pair is skipped.
///
/// # Errors
///
/// `Validation` from the first matching treadle's validator.
pub fn select_treadle<'r>(
    current: &Ring,
    previous: &Ring,
    registry: &'r TreadleRegistry,
) -> Result<Option<&'r Treadle>, DomainError> {
    let Some(treadle) = registry.iter().find(|t| t.matches(current, previous)) else {
        debug!(
            spec = %current.spec,
            current = %current.role_tag,
            previous = %previous.role_tag,
            "no treadle matches pair, skipping"
        );
        return Ok(None);
    };

    treadle.validate(current, previous)?;
    debug!(
        spec = %current.spec,
        treadle = treadle.name(),
        "treadle selected"
    );
    Ok(Some(treadle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        entities::{
            common::RelativePath,
            ring::{RingId, RingMetadata, RingRole},
            treadle::{OutputSpec, RolePattern, validators},
        },
        value_objects::{Language, RoleTag},
    };

    fn ring(id: usize, tag: &str, language: Language, previous_language: Language) -> Ring {
        Ring {
            id: RingId(id),
            spec: "Bookmark".into(),
            spec_index: 0,
            key: tag.into(),
            role_tag: RoleTag::new(tag).unwrap(),
            language,
            metadata: RingMetadata {
                package: tag.into(),
                path: RelativePath::try_new(tag).unwrap(),
            },
            role: if id == 0 {
                RingRole::Core
            } else {
                RingRole::Spiraler {
                    wraps: RingId(id - 1),
                    core: RingId(0),
                    previous_language,
                }
            },
        }
    }

    fn treadle(name: &str, current: &str, previous: &str) -> Treadle {
        Treadle::builder(name)
            .matching(
                RolePattern::parse(current).unwrap(),
                RolePattern::parse(previous).unwrap(),
            )
            .validate(validators::previous_language)
            .output(OutputSpec::new("t", format!("{name}.txt"), Language::TypeScript))
            .build()
            .unwrap()
    }

    fn pair() -> (Ring, Ring) {
        (
            ring(1, "front-domain", Language::TypeScript, Language::TypeScript),
            ring(0, "core", Language::TypeScript, Language::TypeScript),
        )
    }

    #[test]
    fn first_registered_wins_over_more_specific() {
        let mut registry = TreadleRegistry::new();
        registry.register(treadle("broad", "front-domain", "*")).unwrap();
        registry.register(treadle("specific", "front-domain", "core")).unwrap();

        let (current, previous) = pair();
        let selected = select_treadle(&current, &previous, &registry).unwrap().unwrap();
        assert_eq!(selected.name(), "broad");
    }

    #[test]
    fn unmatched_pair_is_skipped() {
        let mut registry = TreadleRegistry::new();
        registry.register(treadle("mobile", "mobile-binding", "*")).unwrap();

        let (current, previous) = pair();
        assert!(select_treadle(&current, &previous, &registry).unwrap().is_none());
    }

    #[test]
    fn validation_failure_does_not_fall_through() {
        let mut registry = TreadleRegistry::new();
        registry.register(treadle("strict", "front-domain", "core")).unwrap();
        registry.register(treadle("fallback", "*", "*")).unwrap();

        let current = ring(1, "front-domain", Language::TypeScript, Language::Kotlin);
        let previous = ring(0, "core", Language::TypeScript, Language::TypeScript);

        let err = select_treadle(&current, &previous, &registry).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref treadle, .. } if treadle == "strict"));
    }
}

use crate::domain::{
    entities::ring::{Ring, RingRole},
    value_objects::RoleTag,
};

/// Centralized structural checks on ring pairs.
///
/// Treadle validators delegate here. A returned `Err` carries the reason
/// only; the heddles wrap it into `DomainError::Validation` with the treadle
/// and spec attached.
pub struct DomainValidator;

impl DomainValidator {
    /// The spiraler's declared previous language must be the language of the
    /// ring it actually wraps.
    pub fn previous_language_matches(current: &Ring, previous: &Ring) -> Result<(), String> {
        match current.role {
            RingRole::Core => Err(format!("ring {} is a core, not a spiraler", current.id)),
            RingRole::Spiraler {
                previous_language, ..
            } if previous_language != previous.language => Err(format!(
                "spiraler '{}' expects to wrap {} but wraps {} ('{}')",
                current.key, previous_language, previous.language, previous.key
            )),
            RingRole::Spiraler { .. } => Ok(()),
        }
    }

    /// The wrapped ring must play `expected` role.
    pub fn wraps_role(current: &Ring, previous: &Ring, expected: &RoleTag) -> Result<(), String> {
        if &previous.role_tag == expected {
            Ok(())
        } else {
            Err(format!(
                "spiraler '{}' must wrap a {} ring, found {}",
                current.key, expected, previous.role_tag
            ))
        }
    }

    /// `current` must actually wrap `previous`.
    pub fn is_adjacent(current: &Ring, previous: &Ring) -> Result<(), String> {
        if current.wraps() == Some(previous.id) {
            Ok(())
        } else {
            Err(format!("ring {} does not wrap {}", current.id, previous.id))
        }
    }
}

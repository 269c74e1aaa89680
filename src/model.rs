//! Turkey document and the accepted request body.

use crate::error::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Turkey {
    pub id: Uuid,
    pub species: String,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a client may submit on create or update. Anything else is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurkeyBody {
    pub species: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTurkey {
    pub species: String,
    pub location: Option<String>,
}

/// Partial overwrite: `None` leaves the stored field unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurkeyPatch {
    pub species: Option<String>,
    pub location: Option<String>,
}

impl From<TurkeyBody> for TurkeyPatch {
    fn from(body: TurkeyBody) -> Self {
        TurkeyPatch {
            species: body.species,
            location: body.location,
        }
    }
}

fn validate_species(species: &str) -> Result<(), StoreError> {
    if species.trim().is_empty() {
        return Err(StoreError::Validation("species is required".into()));
    }
    Ok(())
}

impl NewTurkey {
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_species(&self.species)
    }
}

impl TurkeyPatch {
    /// Validate only the fields being written.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(species) = &self.species {
            validate_species(species)?;
        }
        Ok(())
    }

    pub fn apply(&self, turkey: &mut Turkey) {
        if let Some(species) = &self.species {
            turkey.species = species.clone();
        }
        if let Some(location) = &self.location {
            turkey.location = Some(location.clone());
        }
    }
}

/// Parse a client-supplied identifier; malformed ids are reported as the store would.
pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Turkey {
        let now = Utc::now();
        Turkey {
            id: Uuid::new_v4(),
            species: "Meleagris gallopavo".into(),
            location: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn body_rejects_unknown_fields() {
        let err = serde_json::from_str::<TurkeyBody>(r#"{"species":"wild","color":"bronze"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn blank_species_fails_validation() {
        let draft = NewTurkey {
            species: "  ".into(),
            location: None,
        };
        assert!(matches!(draft.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn patch_only_touches_submitted_fields() {
        let mut turkey = sample();
        let patch = TurkeyPatch {
            species: None,
            location: Some("Yucatan".into()),
        };
        patch.validate().unwrap();
        patch.apply(&mut turkey);
        assert_eq!(turkey.species, "Meleagris gallopavo");
        assert_eq!(turkey.location.as_deref(), Some("Yucatan"));
    }

    #[test]
    fn patch_with_empty_species_is_invalid() {
        let patch = TurkeyPatch {
            species: Some(String::new()),
            location: None,
        };
        assert!(matches!(patch.validate(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn malformed_id_is_invalid_id() {
        assert!(matches!(parse_id("not-a-uuid"), Err(StoreError::InvalidId(_))));
    }
}

use crate::domain::model::{TraitDefinition, TraitKind};
use crate::utils::error::{BreedError, Result};
use crate::utils::validation::{validate_bounds, validate_unique_names, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// The known traits, keyed by name. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitCatalog {
    traits: BTreeMap<String, TraitDefinition>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogFile {
    traits: Vec<TraitDefinition>,
}

impl TraitCatalog {
    /// Builds a catalog from definitions, rejecting duplicate names and
    /// malformed dominance lists or ranges.
    pub fn new(definitions: Vec<TraitDefinition>) -> Result<Self> {
        validate_unique_names("traits", definitions.iter().map(|d| d.name.as_str()))?;

        let catalog = Self {
            traits: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The dragon trait table the game ships with.
    pub fn dragon() -> Self {
        let definitions = vec![
            TraitDefinition::categorical(
                "scale_color",
                &["gold", "red", "blue", "green", "silver", "black"],
            ),
            TraitDefinition::categorical("wing_size", &["huge", "large", "medium", "small"]),
            TraitDefinition::categorical(
                "fire_type",
                &["holy", "lightning", "flame", "ice", "poison"],
            ),
            TraitDefinition::quantitative("strength", 0.0, 100.0),
            TraitDefinition::quantitative("agility", 0.0, 100.0),
            TraitDefinition::quantitative("intelligence", 0.0, 100.0),
            TraitDefinition::quantitative("magic_affinity", 0.0, 100.0),
        ];

        Self {
            traits: definitions
                .into_iter()
                .map(|d| (d.name.clone(), d))
                .collect(),
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::parse(&content, &path.as_ref().display().to_string())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, "catalog")
    }

    fn parse(content: &str, source_name: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).map_err(|e| BreedError::TomlError {
            source_name: source_name.to_string(),
            message: e.to_string(),
        })?;

        tracing::debug!("Loaded {} trait definitions from {}", file.traits.len(), source_name);
        Self::new(file.traits)
    }

    pub fn lookup(&self, trait_name: &str) -> Result<&TraitDefinition> {
        self.traits
            .get(trait_name)
            .ok_or_else(|| BreedError::UnknownTrait {
                trait_name: trait_name.to_string(),
            })
    }

    /// Position of `allele` in the trait's dominance list; 0 is most dominant.
    pub fn dominance_rank(&self, trait_name: &str, allele: &str) -> Result<usize> {
        let definition = self.lookup(trait_name)?;
        match &definition.kind {
            TraitKind::Categorical { dominance } => dominance
                .iter()
                .position(|a| a == allele)
                .ok_or_else(|| BreedError::UnknownAllele {
                    trait_name: trait_name.to_string(),
                    allele: allele.to_string(),
                }),
            kind @ TraitKind::Quantitative { .. } => Err(BreedError::TraitKindMismatch {
                trait_name: trait_name.to_string(),
                expected: kind.label(),
                found: "categorical",
            }),
        }
    }

    pub fn traits(&self) -> impl Iterator<Item = &TraitDefinition> {
        self.traits.values()
    }

    pub fn len(&self) -> usize {
        self.traits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

impl Default for TraitCatalog {
    fn default() -> Self {
        Self::dragon()
    }
}

impl Validate for TraitCatalog {
    fn validate(&self) -> Result<()> {
        for definition in self.traits.values() {
            match &definition.kind {
                TraitKind::Categorical { dominance } => {
                    if dominance.is_empty() {
                        return Err(BreedError::InvalidConfigValueError {
                            field: definition.name.clone(),
                            value: "[]".to_string(),
                            reason: "Dominance list cannot be empty".to_string(),
                        });
                    }
                    validate_unique_names(
                        &definition.name,
                        dominance.iter().map(String::as_str),
                    )?;
                }
                TraitKind::Quantitative { min, max } => {
                    validate_bounds(&definition.name, *min, *max)?;
                }
            }
        }
        Ok(())
    }
}

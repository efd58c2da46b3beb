use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a trait is inherited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraitKind {
    /// Allele names ordered from most to least dominant.
    Categorical { dominance: Vec<String> },
    Quantitative { min: f64, max: f64 },
}

impl TraitKind {
    pub fn label(&self) -> &'static str {
        match self {
            TraitKind::Categorical { .. } => "categorical",
            TraitKind::Quantitative { .. } => "quantitative",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub name: String,
    #[serde(flatten)]
    pub kind: TraitKind,
}

impl TraitDefinition {
    pub fn categorical(name: &str, dominance: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: TraitKind::Categorical {
                dominance: dominance.iter().map(|a| a.to_string()).collect(),
            },
        }
    }

    pub fn quantitative(name: &str, min: f64, max: f64) -> Self {
        Self {
            name: name.to_string(),
            kind: TraitKind::Quantitative { min, max },
        }
    }
}

/// A single parent's value for one trait, as it arrives in a request body.
///
/// `Allele` catches a bare string so it can be rejected as a malformed pair
/// against the trait it was given for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    Alleles(Vec<String>),
    Allele(String),
    Quantity(f64),
}

impl TraitValue {
    pub fn label(&self) -> &'static str {
        match self {
            TraitValue::Alleles(_) | TraitValue::Allele(_) => "categorical",
            TraitValue::Quantity(_) => "quantitative",
        }
    }

    pub fn alleles(first: &str, second: &str) -> Self {
        TraitValue::Alleles(vec![first.to_string(), second.to_string()])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentTraits {
    pub id: String,
    #[serde(default)]
    pub traits: BTreeMap<String, TraitValue>,
}

impl ParentTraits {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            traits: BTreeMap::new(),
        }
    }

    pub fn with_alleles(mut self, trait_name: &str, first: &str, second: &str) -> Self {
        self.traits
            .insert(trait_name.to_string(), TraitValue::alleles(first, second));
        self
    }

    pub fn with_value(mut self, trait_name: &str, value: f64) -> Self {
        self.traits
            .insert(trait_name.to_string(), TraitValue::Quantity(value));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlleleProbability {
    pub allele: String,
    pub probability: f64,
}

/// Probabilities of each expressed allele for one cross, most likely first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityDistribution {
    pub trait_name: String,
    pub probabilities: Vec<AlleleProbability>,
}

impl ProbabilityDistribution {
    pub fn probability_of(&self, allele: &str) -> f64 {
        self.probabilities
            .iter()
            .find(|p| p.allele == allele)
            .map(|p| p.probability)
            .unwrap_or(0.0)
    }

    pub fn most_likely(&self) -> Option<&AlleleProbability> {
        self.probabilities.first()
    }

    pub fn total(&self) -> f64 {
        self.probabilities.iter().map(|p| p.probability).sum()
    }
}

/// An unordered allele pair, stored dominant allele first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeProbability {
    pub alleles: [String; 2],
    pub probability: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PredictedTrait {
    Categorical {
        alleles: [String; 2],
        expressed: String,
        distribution: Vec<AlleleProbability>,
        genotypes: Vec<GenotypeProbability>,
    },
    Quantitative {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffspringPrediction {
    pub id: String,
    pub parents: [String; 2],
    pub traits: BTreeMap<String, PredictedTrait>,
    pub phenotype_description: String,
}

impl OffspringPrediction {
    pub fn expressed(&self, trait_name: &str) -> Option<&str> {
        match self.traits.get(trait_name)? {
            PredictedTrait::Categorical { expressed, .. } => Some(expressed.as_str()),
            PredictedTrait::Quantitative { .. } => None,
        }
    }

    pub fn value(&self, trait_name: &str) -> Option<f64> {
        match self.traits.get(trait_name)? {
            PredictedTrait::Quantitative { value } => Some(*value),
            PredictedTrait::Categorical { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingSuccess {
    pub rate: f64,
    pub min: f64,
    pub max: f64,
    /// Mean per-trait compatibility before scaling, in `[0, 1]`.
    pub compatibility: f64,
    pub mutation_applied: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inbreeding_coefficient: Option<f64>,
}

/// Caller-supplied ancestry: individual id to its parents' ids.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pedigree(BTreeMap<String, Vec<String>>);

impl Pedigree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_parents(mut self, id: &str, parents: &[&str]) -> Self {
        self.0
            .insert(id.to_string(), parents.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn parents_of(&self, id: &str) -> &[String] {
        self.0.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenotypeRatio {
    pub count: usize,
    pub ratio: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunnettSquare {
    pub trait_name: String,
    pub parent1_alleles: [String; 2],
    pub parent2_alleles: [String; 2],
    /// Rows follow parent 1's alleles, columns parent 2's.
    pub grid: [[[String; 2]; 2]; 2],
    pub total_offspring: usize,
    pub genotype_ratios: BTreeMap<String, GenotypeRatio>,
    pub unique_genotypes: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiversityReport {
    pub overall_diversity: f64,
    pub trait_diversity: BTreeMap<String, f64>,
    pub population_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreedingRequest {
    pub parent1: ParentTraits,
    pub parent2: ParentTraits,
    #[serde(default)]
    pub pedigree: Option<Pedigree>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversityRequest {
    pub population: Vec<ParentTraits>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneticsRequest {
    pub parent1_alleles: Vec<String>,
    pub parent2_alleles: Vec<String>,
    pub trait_name: String,
}

use crate::config::BreedingConfig;
use crate::core::catalog::TraitCatalog;
use crate::core::genetics::{self, Cross};
use crate::domain::model::{
    BreedingSuccess, OffspringPrediction, ParentTraits, Pedigree, PredictedTrait,
    ProbabilityDistribution, TraitKind, TraitValue,
};
use crate::utils::error::{BreedError, Result};
use crate::utils::validation::Validate;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};

/// One trait after both parents' values have been checked against the catalog.
#[derive(Debug)]
enum CheckedTrait<'a> {
    Categorical {
        first: [&'a str; 2],
        second: [&'a str; 2],
    },
    Quantitative {
        first: f64,
        second: f64,
        min: f64,
        max: f64,
    },
}

/// Stateless offspring and success-rate calculator.
///
/// Holds only the catalog and configuration; randomness comes in through
/// each call, so one calculator can be shared across threads.
#[derive(Debug, Clone)]
pub struct BreedingCalculator {
    catalog: TraitCatalog,
    config: BreedingConfig,
}

impl BreedingCalculator {
    pub fn new(catalog: TraitCatalog, config: BreedingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { catalog, config })
    }

    pub fn catalog(&self) -> &TraitCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &BreedingConfig {
        &self.config
    }

    /// Predicts the offspring of two parents.
    ///
    /// Both parents are validated in full before anything is drawn from
    /// `rng`; on error nothing partial is returned.
    pub fn calculate_offspring<R: Rng>(
        &self,
        parent1: &ParentTraits,
        parent2: &ParentTraits,
        rng: &mut R,
    ) -> Result<OffspringPrediction> {
        let checked = self.check_parents(parent1, parent2)?;

        let mut crosses = Vec::new();
        for (trait_name, checked_trait) in &checked {
            if let CheckedTrait::Categorical { first, second } = checked_trait {
                let cross = genetics::cross(&self.catalog, trait_name, *first, *second)?;
                crosses.push((*trait_name, cross));
            }
        }

        let id = format!("offspring_{}", rng.gen_range(10000..=99999));
        let mut traits = BTreeMap::new();

        for (trait_name, cross) in crosses {
            traits.insert(trait_name.to_string(), categorical_prediction(cross));
        }
        for (trait_name, checked_trait) in &checked {
            if let CheckedTrait::Quantitative {
                first,
                second,
                min,
                max,
            } = *checked_trait
            {
                let value = self.blend(first, second, min, max, rng);
                traits.insert(trait_name.to_string(), PredictedTrait::Quantitative { value });
            }
        }

        tracing::debug!(
            "Predicted {} traits for offspring of {} and {}",
            traits.len(),
            parent1.id,
            parent2.id
        );

        Ok(OffspringPrediction {
            phenotype_description: describe(&traits),
            id,
            parents: [parent1.id.clone(), parent2.id.clone()],
            traits,
        })
    }

    /// Expressed-allele distribution for a single categorical cross.
    pub fn analyze_genetics(
        &self,
        allele1: &[String],
        allele2: &[String],
        trait_name: &str,
    ) -> Result<ProbabilityDistribution> {
        let definition = self.catalog.lookup(trait_name)?;
        if let TraitKind::Quantitative { .. } = definition.kind {
            return Err(BreedError::TraitKindMismatch {
                trait_name: trait_name.to_string(),
                expected: definition.kind.label(),
                found: "categorical",
            });
        }

        let first = genetics::allele_pair(&self.catalog, trait_name, allele1)?;
        let second = genetics::allele_pair(&self.catalog, trait_name, allele2)?;
        let cross = genetics::cross(&self.catalog, trait_name, first, second)?;

        Ok(ProbabilityDistribution {
            trait_name: trait_name.to_string(),
            probabilities: cross.distribution,
        })
    }

    pub fn predict_success<R: Rng>(
        &self,
        parent1: &ParentTraits,
        parent2: &ParentTraits,
        rng: &mut R,
    ) -> Result<BreedingSuccess> {
        self.score(parent1, parent2, None, rng)
    }

    /// Like [`predict_success`](Self::predict_success), additionally
    /// penalising related parents when inbreeding penalties are enabled.
    pub fn predict_success_with_pedigree<R: Rng>(
        &self,
        parent1: &ParentTraits,
        parent2: &ParentTraits,
        pedigree: &Pedigree,
        rng: &mut R,
    ) -> Result<BreedingSuccess> {
        self.score(parent1, parent2, Some(pedigree), rng)
    }

    fn score<R: Rng>(
        &self,
        parent1: &ParentTraits,
        parent2: &ParentTraits,
        pedigree: Option<&Pedigree>,
        rng: &mut R,
    ) -> Result<BreedingSuccess> {
        let checked = self.check_parents(parent1, parent2)?;

        let contributions: Vec<f64> = checked
            .values()
            .map(|checked_trait| match checked_trait {
                CheckedTrait::Categorical { first, second } => allele_overlap(first, second),
                CheckedTrait::Quantitative {
                    first,
                    second,
                    min,
                    max,
                } => (1.0 - (first - second).abs() / (max - min)).clamp(0.0, 1.0),
            })
            .collect();
        let compatibility = contributions.iter().sum::<f64>() / contributions.len() as f64;

        let (min, max) = (self.config.min_success_rate, self.config.max_success_rate);
        let mut rate = min + compatibility * (max - min);

        let mutation_applied = self.config.mutation_enabled && self.config.mutation_rate > 0.0;
        if mutation_applied {
            let swing = self.config.mutation_rate;
            rate *= 1.0 + rng.gen_range(-swing..=swing);
        }

        let inbreeding_coefficient =
            pedigree.map(|p| genetics::inbreeding_coefficient(&parent1.id, &parent2.id, p));
        if let Some(coefficient) = inbreeding_coefficient {
            if self.config.inbreeding_penalties {
                rate *= 1.0 - coefficient;
            }
        }

        let rate = round_to_tenth(rate).clamp(min, max);
        tracing::debug!(
            "Success rate for {} x {}: {} (compatibility {:.3})",
            parent1.id,
            parent2.id,
            rate,
            compatibility
        );

        Ok(BreedingSuccess {
            rate,
            min,
            max,
            compatibility,
            mutation_applied,
            inbreeding_coefficient,
        })
    }

    fn blend<R: Rng>(&self, first: f64, second: f64, min: f64, max: f64, rng: &mut R) -> f64 {
        let mean = (first + second) / 2.0;
        let spread = self.config.quantitative_variation;
        let varied = if spread > 0.0 {
            mean + rng.gen_range(-spread..=spread) * mean
        } else {
            mean
        };
        round_to_tenth(varied).clamp(min, max)
    }

    /// Validates both parents against the catalog and the required trait
    /// list. Traits come back in name order.
    fn check_parents<'a>(
        &self,
        parent1: &'a ParentTraits,
        parent2: &'a ParentTraits,
    ) -> Result<BTreeMap<&'a str, CheckedTrait<'a>>> {
        let names: BTreeSet<&'a str> = parent1
            .traits
            .keys()
            .chain(parent2.traits.keys())
            .map(String::as_str)
            .collect();
        for required in &self.config.required_traits {
            if !names.contains(required.as_str()) {
                return Err(BreedError::IncompleteTraitData {
                    parent: parent1.id.clone(),
                    trait_name: required.clone(),
                });
            }
        }
        if names.is_empty() {
            return Err(BreedError::IncompleteTraitData {
                parent: parent1.id.clone(),
                trait_name: "traits".to_string(),
            });
        }

        let mut checked = BTreeMap::new();
        for name in names {
            let definition = self.catalog.lookup(name)?;
            let first = present(parent1, name)?;
            let second = present(parent2, name)?;

            let checked_trait = match &definition.kind {
                TraitKind::Categorical { .. } => CheckedTrait::Categorical {
                    first: self.check_alleles(name, first)?,
                    second: self.check_alleles(name, second)?,
                },
                TraitKind::Quantitative { min, max } => CheckedTrait::Quantitative {
                    first: check_quantity(name, first, *min, *max)?,
                    second: check_quantity(name, second, *min, *max)?,
                    min: *min,
                    max: *max,
                },
            };
            checked.insert(name, checked_trait);
        }
        Ok(checked)
    }

    fn check_alleles<'a>(&self, trait_name: &str, value: &'a TraitValue) -> Result<[&'a str; 2]> {
        match value {
            TraitValue::Alleles(alleles) => genetics::allele_pair(&self.catalog, trait_name, alleles),
            TraitValue::Allele(_) => Err(BreedError::MalformedAllelePair {
                trait_name: trait_name.to_string(),
                count: 1,
            }),
            TraitValue::Quantity(_) => Err(BreedError::TraitKindMismatch {
                trait_name: trait_name.to_string(),
                expected: "categorical",
                found: value.label(),
            }),
        }
    }
}

fn present<'a>(parent: &'a ParentTraits, trait_name: &str) -> Result<&'a TraitValue> {
    parent
        .traits
        .get(trait_name)
        .ok_or_else(|| BreedError::IncompleteTraitData {
            parent: parent.id.clone(),
            trait_name: trait_name.to_string(),
        })
}

fn check_quantity(trait_name: &str, value: &TraitValue, min: f64, max: f64) -> Result<f64> {
    match value {
        TraitValue::Quantity(v) if v.is_finite() && (min..=max).contains(v) => Ok(*v),
        TraitValue::Quantity(v) => Err(BreedError::OutOfRange {
            trait_name: trait_name.to_string(),
            value: *v,
            min,
            max,
        }),
        TraitValue::Alleles(_) | TraitValue::Allele(_) => Err(BreedError::TraitKindMismatch {
            trait_name: trait_name.to_string(),
            expected: "quantitative",
            found: value.label(),
        }),
    }
}

/// Shared alleles over distinct alleles across both pairs.
fn allele_overlap(first: &[&str; 2], second: &[&str; 2]) -> f64 {
    let a: BTreeSet<&str> = first.iter().copied().collect();
    let b: BTreeSet<&str> = second.iter().copied().collect();
    a.intersection(&b).count() as f64 / a.union(&b).count() as f64
}

fn categorical_prediction(cross: Cross) -> PredictedTrait {
    let alleles = cross
        .predicted_pair()
        .cloned()
        .unwrap_or_else(|| [String::new(), String::new()]);
    let expressed = cross.expressed().unwrap_or_default().to_string();
    PredictedTrait::Categorical {
        alleles,
        expressed,
        distribution: cross.distribution,
        genotypes: cross.genotypes,
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// e.g. "red scale color, large wing size; strength 80.0"
fn describe(traits: &BTreeMap<String, PredictedTrait>) -> String {
    let mut looks = Vec::new();
    let mut stats = Vec::new();
    for (name, predicted) in traits {
        let label = name.replace('_', " ");
        match predicted {
            PredictedTrait::Categorical { expressed, .. } => {
                looks.push(format!("{} {}", expressed, label))
            }
            PredictedTrait::Quantitative { value } => stats.push(format!("{} {:.1}", label, value)),
        }
    }

    match (looks.is_empty(), stats.is_empty()) {
        (false, false) => format!("{}; {}", looks.join(", "), stats.join(", ")),
        (false, true) => looks.join(", "),
        (true, false) => stats.join(", "),
        (true, true) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn calculator() -> BreedingCalculator {
        BreedingCalculator::new(TraitCatalog::dragon(), BreedingConfig::deterministic()).unwrap()
    }

    #[test]
    fn test_blend_without_variation_is_mean() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(calculator().blend(80.0, 70.0, 0.0, 100.0, &mut rng), 75.0);
    }

    #[test]
    fn test_blend_clamps_to_bounds() {
        let config = BreedingConfig {
            quantitative_variation: 1.0,
            ..BreedingConfig::deterministic()
        };
        let calculator = BreedingCalculator::new(TraitCatalog::dragon(), config).unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..200 {
            let value = calculator.blend(99.0, 100.0, 0.0, 100.0, &mut rng);
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = BreedingConfig {
            min_success_rate: 90.0,
            max_success_rate: 20.0,
            ..BreedingConfig::default()
        };
        assert!(BreedingCalculator::new(TraitCatalog::dragon(), config).is_err());
    }

    #[test]
    fn test_allele_overlap() {
        assert_eq!(allele_overlap(&["red", "blue"], &["red", "blue"]), 1.0);
        assert_eq!(allele_overlap(&["red", "red"], &["blue", "green"]), 0.0);
        assert!((allele_overlap(&["red", "blue"], &["blue", "green"]) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_check_quantity_rejects_nan() {
        let err = check_quantity("strength", &TraitValue::Quantity(f64::NAN), 0.0, 100.0)
            .unwrap_err();
        assert!(matches!(err, BreedError::OutOfRange { .. }));
    }

    #[test]
    fn test_describe() {
        let mut traits = BTreeMap::new();
        traits.insert(
            "strength".to_string(),
            PredictedTrait::Quantitative { value: 80.0 },
        );
        traits.insert(
            "scale_color".to_string(),
            PredictedTrait::Categorical {
                alleles: ["red".to_string(), "blue".to_string()],
                expressed: "red".to_string(),
                distribution: vec![],
                genotypes: vec![],
            },
        );
        assert_eq!(describe(&traits), "red scale color; strength 80.0");
    }

    #[test]
    fn test_required_trait_missing_from_both_parents() {
        let config = BreedingConfig {
            required_traits: vec!["fire_type".to_string()],
            ..BreedingConfig::deterministic()
        };
        let calculator = BreedingCalculator::new(TraitCatalog::dragon(), config).unwrap();
        let parent1 = ParentTraits::new("a").with_value("strength", 50.0);
        let parent2 = ParentTraits::new("b").with_value("strength", 60.0);
        let mut rng = StdRng::seed_from_u64(3);

        let err = calculator
            .calculate_offspring(&parent1, &parent2, &mut rng)
            .unwrap_err();
        assert!(matches!(
            err,
            BreedError::IncompleteTraitData { ref trait_name, .. } if trait_name == "fire_type"
        ));
    }
}

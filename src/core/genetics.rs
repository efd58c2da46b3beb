//! Mendelian building blocks: allele pair checks, the four-way cross,
//! Punnett squares, inbreeding and population diversity.
//!
//! Everything here is a pure function of its inputs and the catalog.

use crate::core::catalog::TraitCatalog;
use crate::domain::model::{
    AlleleProbability, DiversityReport, GenotypeProbability, GenotypeRatio, ParentTraits,
    Pedigree, PunnettSquare, TraitValue,
};
use crate::utils::error::{BreedError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Each of the four parent allele combinations is equally likely.
pub const COMBINATION_PROBABILITY: f64 = 0.25;

/// How many generations back `inbreeding_coefficient` searches.
pub const ANCESTOR_DEPTH: usize = 3;

const COMMON_ANCESTOR_WEIGHT: f64 = 0.1;
const DIRECT_DESCENT_PENALTY: f64 = 0.25;

/// Outcome of crossing two allele pairs for one trait.
#[derive(Debug, Clone, PartialEq)]
pub struct Cross {
    /// Expressed alleles, most probable first, ties by dominance rank.
    pub distribution: Vec<AlleleProbability>,
    /// Genotypes, most probable first, ties by the dominant allele's rank
    /// and then by enumeration order.
    pub genotypes: Vec<GenotypeProbability>,
}

impl Cross {
    pub fn expressed(&self) -> Option<&str> {
        self.distribution.first().map(|p| p.allele.as_str())
    }

    pub fn predicted_pair(&self) -> Option<&[String; 2]> {
        self.genotypes.first().map(|g| &g.alleles)
    }
}

/// Checks that `alleles` is exactly two names registered for `trait_name`.
pub fn allele_pair<'a>(
    catalog: &TraitCatalog,
    trait_name: &str,
    alleles: &'a [String],
) -> Result<[&'a str; 2]> {
    let [first, second] = alleles else {
        return Err(BreedError::MalformedAllelePair {
            trait_name: trait_name.to_string(),
            count: alleles.len(),
        });
    };
    catalog.dominance_rank(trait_name, first)?;
    catalog.dominance_rank(trait_name, second)?;
    Ok([first.as_str(), second.as_str()])
}

/// Orders two alleles dominant first, returning their ranks alongside.
fn resolve<'a>(
    catalog: &TraitCatalog,
    trait_name: &str,
    a: &'a str,
    b: &'a str,
) -> Result<((&'a str, usize), (&'a str, usize))> {
    let rank_a = catalog.dominance_rank(trait_name, a)?;
    let rank_b = catalog.dominance_rank(trait_name, b)?;
    if rank_a <= rank_b {
        Ok(((a, rank_a), (b, rank_b)))
    } else {
        Ok(((b, rank_b), (a, rank_a)))
    }
}

/// Enumerates parent 1's alleles (outer) against parent 2's (inner) and
/// tallies expressed alleles and genotypes.
pub fn cross(
    catalog: &TraitCatalog,
    trait_name: &str,
    first: [&str; 2],
    second: [&str; 2],
) -> Result<Cross> {
    let mut expressed: Vec<(usize, AlleleProbability)> = Vec::with_capacity(4);
    let mut genotypes: Vec<(usize, GenotypeProbability)> = Vec::with_capacity(4);

    for a in first {
        for b in second {
            let ((dominant, dominant_rank), (recessive, _)) = resolve(catalog, trait_name, a, b)?;

            match expressed.iter_mut().find(|(_, p)| p.allele == dominant) {
                Some((_, p)) => p.probability += COMBINATION_PROBABILITY,
                None => expressed.push((
                    dominant_rank,
                    AlleleProbability {
                        allele: dominant.to_string(),
                        probability: COMBINATION_PROBABILITY,
                    },
                )),
            }

            match genotypes
                .iter_mut()
                .find(|(_, g)| g.alleles[0] == dominant && g.alleles[1] == recessive)
            {
                Some((_, g)) => g.probability += COMBINATION_PROBABILITY,
                None => genotypes.push((
                    dominant_rank,
                    GenotypeProbability {
                        alleles: [dominant.to_string(), recessive.to_string()],
                        probability: COMBINATION_PROBABILITY,
                    },
                )),
            }
        }
    }

    expressed.sort_by(|(rank_a, a), (rank_b, b)| {
        b.probability
            .total_cmp(&a.probability)
            .then(rank_a.cmp(rank_b))
    });
    // stable: equal probability and dominant rank keep enumeration order
    genotypes.sort_by(|(rank_a, a), (rank_b, b)| {
        b.probability
            .total_cmp(&a.probability)
            .then(rank_a.cmp(rank_b))
    });

    Ok(Cross {
        distribution: expressed.into_iter().map(|(_, p)| p).collect(),
        genotypes: genotypes.into_iter().map(|(_, g)| g).collect(),
    })
}

pub fn genotype_distribution(
    catalog: &TraitCatalog,
    trait_name: &str,
    parent1_alleles: &[String],
    parent2_alleles: &[String],
) -> Result<Vec<GenotypeProbability>> {
    let first = allele_pair(catalog, trait_name, parent1_alleles)?;
    let second = allele_pair(catalog, trait_name, parent2_alleles)?;
    Ok(cross(catalog, trait_name, first, second)?.genotypes)
}

pub fn punnett_square(
    catalog: &TraitCatalog,
    trait_name: &str,
    parent1_alleles: &[String],
    parent2_alleles: &[String],
) -> Result<PunnettSquare> {
    let first = allele_pair(catalog, trait_name, parent1_alleles)?;
    let second = allele_pair(catalog, trait_name, parent2_alleles)?;

    let cell = |a: &str, b: &str| [a.to_string(), b.to_string()];
    let grid = [
        [cell(first[0], second[0]), cell(first[0], second[1])],
        [cell(first[1], second[0]), cell(first[1], second[1])],
    ];

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for a in first {
        for b in second {
            let ((dominant, _), (recessive, _)) = resolve(catalog, trait_name, a, b)?;
            *counts.entry(format!("{}/{}", dominant, recessive)).or_default() += 1;
        }
    }

    let total_offspring = first.len() * second.len();
    let genotype_ratios: BTreeMap<String, GenotypeRatio> = counts
        .into_iter()
        .map(|(key, count)| {
            let ratio = count as f64 / total_offspring as f64;
            (
                key,
                GenotypeRatio {
                    count,
                    ratio,
                    percentage: ratio * 100.0,
                },
            )
        })
        .collect();

    Ok(PunnettSquare {
        trait_name: trait_name.to_string(),
        parent1_alleles: cell(first[0], first[1]),
        parent2_alleles: cell(second[0], second[1]),
        grid,
        total_offspring,
        unique_genotypes: genotype_ratios.len(),
        genotype_ratios,
    })
}

/// Collects ancestors within `depth` generations, keyed by the most
/// generations still searchable above each one. An id reached again along
/// a shorter path is searched again from there.
fn ancestors(id: &str, pedigree: &Pedigree, depth: usize, found: &mut HashMap<String, usize>) {
    if depth == 0 {
        return;
    }
    let remaining = depth - 1;
    for parent in pedigree.parents_of(id) {
        let closer = found.get(parent).map_or(true, |&seen| remaining > seen);
        if closer {
            found.insert(parent.clone(), remaining);
            ancestors(parent, pedigree, remaining, found);
        }
    }
}

/// Rough inbreeding estimate for offspring of `parent1` and `parent2`.
///
/// Each ancestor shared within [`ANCESTOR_DEPTH`] generations adds 0.1,
/// and one parent descending from the other adds 0.25. Capped at 1.0.
pub fn inbreeding_coefficient(parent1: &str, parent2: &str, pedigree: &Pedigree) -> f64 {
    let mut first = HashMap::new();
    let mut second = HashMap::new();
    ancestors(parent1, pedigree, ANCESTOR_DEPTH, &mut first);
    ancestors(parent2, pedigree, ANCESTOR_DEPTH, &mut second);

    let common = first.keys().filter(|id| second.contains_key(*id)).count();
    let mut coefficient = common as f64 * COMMON_ANCESTOR_WEIGHT;

    if first.contains_key(parent2) || second.contains_key(parent1) {
        coefficient += DIRECT_DESCENT_PENALTY;
    }

    coefficient.min(1.0)
}

/// Share of distinct alleles or values among everything observed, per trait.
pub fn genetic_diversity(population: &[ParentTraits]) -> DiversityReport {
    let mut observed: BTreeMap<&str, (BTreeSet<String>, usize)> = BTreeMap::new();

    for individual in population {
        for (trait_name, value) in &individual.traits {
            let (unique, total) = observed.entry(trait_name.as_str()).or_default();
            match value {
                TraitValue::Alleles(alleles) => {
                    for allele in alleles {
                        unique.insert(allele.clone());
                        *total += 1;
                    }
                }
                TraitValue::Allele(allele) => {
                    unique.insert(allele.clone());
                    *total += 1;
                }
                TraitValue::Quantity(v) => {
                    unique.insert(v.to_string());
                    *total += 1;
                }
            }
        }
    }

    let trait_diversity: BTreeMap<String, f64> = observed
        .into_iter()
        .filter(|(_, (_, total))| *total > 0)
        .map(|(name, (unique, total))| (name.to_string(), unique.len() as f64 / total as f64))
        .collect();

    let overall_diversity = if trait_diversity.is_empty() {
        0.0
    } else {
        trait_diversity.values().sum::<f64>() / trait_diversity.len() as f64
    };

    DiversityReport {
        overall_diversity,
        trait_diversity,
        population_size: population.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(a: &str, b: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string()]
    }

    #[test]
    fn test_cross_heterozygous_scale_colors() {
        let catalog = TraitCatalog::dragon();
        let result = cross(&catalog, "scale_color", ["red", "blue"], ["blue", "green"]).unwrap();

        assert_eq!(result.expressed(), Some("red"));
        assert_eq!(result.distribution.len(), 2);
        assert_eq!(result.distribution[0].probability, 0.5);
        assert_eq!(result.distribution[1].allele, "blue");
        assert_eq!(
            result.predicted_pair(),
            Some(&["red".to_string(), "blue".to_string()])
        );
        assert_eq!(result.genotypes.len(), 4);
    }

    #[test]
    fn test_cross_merges_identical_genotypes() {
        let catalog = TraitCatalog::dragon();
        let result = cross(&catalog, "wing_size", ["large", "small"], ["small", "large"]).unwrap();

        // large/small appears twice, once from each side
        assert_eq!(result.genotypes[0].alleles, ["large".to_string(), "small".to_string()]);
        assert_eq!(result.genotypes[0].probability, 0.5);
        assert_eq!(result.expressed(), Some("large"));
        assert_eq!(result.distribution[0].probability, 0.75);
    }

    #[test]
    fn test_allele_pair_rejects_wrong_length() {
        let catalog = TraitCatalog::dragon();
        let alleles = vec!["red".to_string()];
        let err = allele_pair(&catalog, "scale_color", &alleles).unwrap_err();
        assert!(matches!(err, BreedError::MalformedAllelePair { count: 1, .. }));
    }

    #[test]
    fn test_punnett_square_layout() {
        let catalog = TraitCatalog::dragon();
        let square =
            punnett_square(&catalog, "fire_type", &pair("flame", "ice"), &pair("ice", "flame"))
                .unwrap();

        assert_eq!(square.total_offspring, 4);
        assert_eq!(square.grid[0][1], ["flame".to_string(), "flame".to_string()]);
        assert_eq!(square.unique_genotypes, 3);
        assert_eq!(square.genotype_ratios["flame/ice"].count, 2);
        assert_eq!(square.genotype_ratios["ice/ice"].percentage, 25.0);
    }

    #[test]
    fn test_genotype_distribution_sums_to_one() {
        let catalog = TraitCatalog::dragon();
        let genotypes = genotype_distribution(
            &catalog,
            "scale_color",
            &pair("gold", "black"),
            &pair("silver", "red"),
        )
        .unwrap();
        let total: f64 = genotypes.iter().map(|g| g.probability).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_inbreeding_unrelated_parents() {
        let pedigree = Pedigree::new()
            .with_parents("a", &["a_mom", "a_dad"])
            .with_parents("b", &["b_mom", "b_dad"]);
        assert_eq!(inbreeding_coefficient("a", "b", &pedigree), 0.0);
    }

    #[test]
    fn test_inbreeding_siblings() {
        let pedigree = Pedigree::new()
            .with_parents("a", &["mom", "dad"])
            .with_parents("b", &["mom", "dad"]);
        let coefficient = inbreeding_coefficient("a", "b", &pedigree);
        assert!((coefficient - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_inbreeding_parent_offspring() {
        let pedigree = Pedigree::new().with_parents("child", &["elder", "other"]);
        let coefficient = inbreeding_coefficient("child", "elder", &pedigree);
        assert!((coefficient - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_inbreeding_ancestor_reached_by_longer_path_first() {
        // x is both a grandparent (via p) and a parent of a; z sits three
        // generations above a only through the shorter route.
        let pedigree = Pedigree::new()
            .with_parents("a", &["p", "x"])
            .with_parents("p", &["x"])
            .with_parents("x", &["y"])
            .with_parents("y", &["z"])
            .with_parents("b", &["z"]);
        let coefficient = inbreeding_coefficient("a", "b", &pedigree);
        assert!((coefficient - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_inbreeding_ignores_ancestors_beyond_three_generations() {
        let pedigree = Pedigree::new()
            .with_parents("a", &["g1"])
            .with_parents("g1", &["g2"])
            .with_parents("g2", &["g3"])
            .with_parents("g3", &["g4"])
            .with_parents("b", &["g4"]);
        assert_eq!(inbreeding_coefficient("a", "b", &pedigree), 0.0);
    }

    #[test]
    fn test_genetic_diversity() {
        let population = vec![
            ParentTraits::new("a").with_alleles("scale_color", "red", "red"),
            ParentTraits::new("b").with_alleles("scale_color", "red", "blue"),
        ];
        let report = genetic_diversity(&population);
        assert_eq!(report.population_size, 2);
        assert_eq!(report.trait_diversity["scale_color"], 0.5);
        assert_eq!(report.overall_diversity, 0.5);
    }

    #[test]
    fn test_genetic_diversity_empty_population() {
        let report = genetic_diversity(&[]);
        assert_eq!(report.overall_diversity, 0.0);
        assert!(report.trait_diversity.is_empty());
    }
}

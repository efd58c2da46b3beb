use crate::config::Settings;
use crate::core::calculator::BreedingCalculator;
use crate::core::catalog::TraitCatalog;
use crate::core::genetics;
use crate::domain::model::{BreedingRequest, DiversityRequest, GeneticsRequest};
use crate::domain::response::{
    AnalyzeResponse, CalculateResponse, DiversityResponse, PredictResponse, PunnettResponse,
};
use crate::utils::error::Result;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Request-level facade over [`BreedingCalculator`]: owns a random source,
/// logs each operation and wraps results in response envelopes.
pub struct BreedingEngine<R: Rng = StdRng> {
    calculator: BreedingCalculator,
    rng: R,
}

impl BreedingEngine<StdRng> {
    /// Builds the catalog, calculator and random source described by `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let catalog = match &settings.catalog_path {
            Some(path) => {
                tracing::info!("Loading trait catalog from {}", path);
                TraitCatalog::from_file(path)?
            }
            None => TraitCatalog::dragon(),
        };
        let calculator = BreedingCalculator::new(catalog, settings.breeding.clone())?;

        let rng = match settings.seed {
            Some(seed) => {
                tracing::debug!("Seeding random source with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_entropy(),
        };

        Ok(Self::new(calculator, rng))
    }
}

impl<R: Rng> BreedingEngine<R> {
    pub fn new(calculator: BreedingCalculator, rng: R) -> Self {
        Self { calculator, rng }
    }

    pub fn calculator(&self) -> &BreedingCalculator {
        &self.calculator
    }

    pub fn calculate(&mut self, request: &BreedingRequest) -> Result<CalculateResponse> {
        tracing::info!(
            "Breeding dragons {} and {}",
            request.parent1.id,
            request.parent2.id
        );

        let offspring = logged(
            "calculate",
            self.calculator
                .calculate_offspring(&request.parent1, &request.parent2, &mut self.rng),
        )?;

        tracing::info!(
            "Generated offspring {}: {}",
            offspring.id,
            offspring.phenotype_description
        );

        Ok(CalculateResponse {
            success: true,
            offspring,
            timestamp: Utc::now(),
        })
    }

    pub fn analyze(&self, request: &GeneticsRequest) -> Result<AnalyzeResponse> {
        tracing::info!("Analyzing {} cross", request.trait_name);

        let distribution = logged(
            "analyze",
            self.calculator.analyze_genetics(
                &request.parent1_alleles,
                &request.parent2_alleles,
                &request.trait_name,
            ),
        )?;

        let genotypes = logged(
            "analyze",
            genetics::genotype_distribution(
                self.calculator.catalog(),
                &request.trait_name,
                &request.parent1_alleles,
                &request.parent2_alleles,
            ),
        )?;

        tracing::debug!("Distribution for {}: {:?}", request.trait_name, distribution.probabilities);

        Ok(AnalyzeResponse {
            success: true,
            trait_name: distribution.trait_name,
            probabilities: distribution.probabilities,
            genotypes,
            timestamp: Utc::now(),
        })
    }

    pub fn predict(&mut self, request: &BreedingRequest) -> Result<PredictResponse> {
        tracing::info!(
            "Predicting breeding success for {} and {}",
            request.parent1.id,
            request.parent2.id
        );

        let result = match &request.pedigree {
            Some(pedigree) => self.calculator.predict_success_with_pedigree(
                &request.parent1,
                &request.parent2,
                pedigree,
                &mut self.rng,
            ),
            None => self
                .calculator
                .predict_success(&request.parent1, &request.parent2, &mut self.rng),
        };
        let details = logged("predict", result)?;

        tracing::info!("Breeding success rate: {}", details.rate);

        Ok(PredictResponse {
            success: true,
            breeding_success_rate: details.rate,
            details,
            timestamp: Utc::now(),
        })
    }

    pub fn punnett(&self, request: &GeneticsRequest) -> Result<PunnettResponse> {
        tracing::info!("Building Punnett square for {}", request.trait_name);

        let punnett_square = logged(
            "punnett",
            genetics::punnett_square(
                self.calculator.catalog(),
                &request.trait_name,
                &request.parent1_alleles,
                &request.parent2_alleles,
            ),
        )?;

        Ok(PunnettResponse {
            success: true,
            punnett_square,
            timestamp: Utc::now(),
        })
    }

    /// Diversity of a group of dragons. Every trait named must be in the catalog.
    pub fn diversity(&self, request: &DiversityRequest) -> Result<DiversityResponse> {
        tracing::info!("Measuring diversity of {} dragons", request.population.len());

        for individual in &request.population {
            for trait_name in individual.traits.keys() {
                logged("diversity", self.calculator.catalog().lookup(trait_name))?;
            }
        }
        let diversity = genetics::genetic_diversity(&request.population);

        tracing::debug!("Overall diversity: {:.3}", diversity.overall_diversity);

        Ok(DiversityResponse {
            success: true,
            diversity,
            timestamp: Utc::now(),
        })
    }
}

fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::warn!(
            "{} rejected: {} (field: {})",
            operation,
            e,
            e.field().unwrap_or("-")
        );
    }
    result
}

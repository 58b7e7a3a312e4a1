//! Merged technique lookup: `shard-catalog`'s static techniques plus
//! deterministically generated signature/ultimate techniques, resolved by
//! the same [`TechniqueId`] type so combat code never needs to know
//! which source a technique came from (§4.H).

use std::collections::BTreeMap;

use shard_catalog::Catalog;
use shard_types::{ClassId, Technique, TechniqueId};

use crate::error::TechniqueError;
use crate::generator::{self, GeneratedTier};

/// A technique registry layering generated techniques over the static
/// catalog.
#[derive(Debug, Default)]
pub struct TechniqueCatalog {
    generated: BTreeMap<TechniqueId, Technique>,
}

impl TechniqueCatalog {
    /// An empty registry with no generated techniques yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate and register a wallet's signature or ultimate technique,
    /// returning it. Idempotent: regenerating for the same inputs
    /// produces and stores the same technique.
    pub fn generate_and_register(
        &mut self,
        wallet: &str,
        class_id: ClassId,
        tier: GeneratedTier,
    ) -> Technique {
        let technique = generator::generate(wallet, class_id, tier);
        self.generated.insert(technique.id, technique.clone());
        technique
    }

    /// Register an already-generated technique (e.g. restored from a
    /// character save that references a signature/ultimate id not yet
    /// in this process's registry).
    pub fn register(&mut self, technique: Technique) {
        self.generated.insert(technique.id, technique);
    }

    /// Resolve a technique id against the generated registry first, then
    /// the static catalog.
    ///
    /// # Errors
    ///
    /// Returns [`TechniqueError::UnknownTechnique`] if neither source has
    /// this id.
    pub fn technique_by_id<'a>(
        &'a self,
        catalog: &'a Catalog,
        id: TechniqueId,
    ) -> Result<&'a Technique, TechniqueError> {
        if let Some(technique) = self.generated.get(&id) {
            return Ok(technique);
        }
        catalog.technique_by_id(id).map_err(|_| TechniqueError::UnknownTechnique(id))
    }
}

#[cfg(test)]
mod tests {
    use shard_types::{ClassId, Quality};

    use super::*;

    #[test]
    fn generated_technique_resolves_before_catalog_lookup() {
        let mut registry = TechniqueCatalog::new();
        let catalog = Catalog::default();
        let technique = registry.generate_and_register("0xabc", ClassId::Warrior, GeneratedTier::Signature);
        let resolved = registry.technique_by_id(&catalog, technique.id).expect("registered");
        assert_eq!(resolved.quality_tier, Quality::Rare);
    }

    #[test]
    fn unknown_id_is_typed_error() {
        let registry = TechniqueCatalog::new();
        let catalog = Catalog::default();
        let err = registry.technique_by_id(&catalog, TechniqueId::new()).expect_err("not registered");
        assert!(matches!(err, TechniqueError::UnknownTechnique(_)));
    }
}

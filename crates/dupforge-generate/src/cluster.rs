use rand::{Rng, RngCore};
use tracing::debug;

use dupforge_core::{
    CanonicalEntity, DuplicateCluster, DuplicateDistribution, ErrorKind, GenerationConfig,
    PersonField, PersonFields, Variant,
};

use crate::noise::OperatorLibrary;
use crate::rng::{random_uuid, weighted_pick};

/// Builds duplicate clusters around canonical entities.
pub struct ClusterGenerator<'a> {
    config: &'a GenerationConfig,
    library: &'a OperatorLibrary,
    count_weights: Vec<(u32, f64)>,
}

impl<'a> ClusterGenerator<'a> {
    pub fn new(config: &'a GenerationConfig, library: &'a OperatorLibrary) -> Self {
        let count_weights = count_weights(
            config.dup_distribution,
            config.max_dup_accounts.max(1),
            config.dup_rate,
        );
        Self {
            config,
            library,
            count_weights,
        }
    }

    /// Duplicate count for one entity: zero unless the `dup_rate` draw hits,
    /// then drawn from `dup_distribution` over `[1, max_dup_accounts]`.
    pub fn duplicate_count(&self, rng: &mut dyn RngCore) -> u32 {
        if self.config.dup_rate <= 0.0 || rng.random::<f64>() >= self.config.dup_rate {
            return 0;
        }
        let max = self.config.max_dup_accounts.max(1);
        match self.config.dup_distribution {
            DuplicateDistribution::Uniform => rng.random_range(1..=max),
            _ => weighted_pick(&self.count_weights, rng).copied().unwrap_or(1),
        }
    }

    pub fn trigger(&self, field: PersonField) -> f64 {
        let triggers = &self.config.triggers;
        match field {
            PersonField::FirstName => triggers.first_name,
            PersonField::LastName => triggers.last_name,
            PersonField::Email => triggers.email,
            PersonField::Phone => triggers.phone,
            PersonField::Address1 => triggers.address_1,
            PersonField::Address2 => triggers.address_2,
            PersonField::City => triggers.city,
            PersonField::State => triggers.state,
        }
    }

    /// Pollute every present field independently with its own trigger.
    ///
    /// A triggered field receives up to `max_field_modifications` chained
    /// edits and is recorded under its first kind. Fields stop being drawn
    /// once `max_record_modifications` of them changed.
    pub fn pollute_fields(
        &self,
        fields: &PersonFields,
        rng: &mut dyn RngCore,
    ) -> (PersonFields, Vec<(PersonField, ErrorKind)>) {
        let mut polluted = fields.clone();
        let mut changes = Vec::new();
        for field in PersonField::POLLUTABLE {
            if let Some(cap) = self.config.max_record_modifications {
                if changes.len() >= cap as usize {
                    break;
                }
            }
            let Some(original) = fields.get(field) else {
                continue;
            };
            let trigger = self.trigger(field);
            let outcome = self.library.pollute(field.field_type(), original, trigger, rng);
            let Some(kind) = outcome.applied else {
                continue;
            };

            let mut value = outcome.value;
            let max_edits = self.config.max_field_modifications.max(1);
            if max_edits > 1 {
                let extra = rng.random_range(1..=max_edits) - 1;
                for _ in 0..extra {
                    value = self.library.pollute(field.field_type(), &value, 1.0, rng).value;
                }
            }
            if value == original {
                continue;
            }

            if value.is_empty() {
                polluted.clear(field);
            } else if let Some(slot) = polluted.slot_mut(field) {
                *slot = value;
            }
            changes.push((field, kind));
        }
        (polluted, changes)
    }

    /// One polluted duplicate. With `require_visible_change` the draw is
    /// repeated up to `max_attempts_variant` times while nothing changed.
    pub fn variant(&self, canonical: &CanonicalEntity, rng: &mut dyn RngCore) -> Variant {
        let attempts = if self.config.require_visible_change {
            self.config.max_attempts_variant.max(1)
        } else {
            1
        };

        let (mut fields, mut changes) = self.pollute_fields(&canonical.fields, rng);
        let mut attempt = 1;
        while changes.is_empty() && attempt < attempts {
            debug!(canonical_id = %canonical.canonical_id, attempt, "duplicate unchanged, redrawing");
            (fields, changes) = self.pollute_fields(&canonical.fields, rng);
            attempt += 1;
        }

        Variant {
            canonical_id: canonical.canonical_id.clone(),
            variant_id: random_uuid(rng),
            is_duplicate: true,
            fields,
            changes,
        }
    }

    pub fn baseline(&self, canonical: &CanonicalEntity, rng: &mut dyn RngCore) -> Variant {
        Variant {
            canonical_id: canonical.canonical_id.clone(),
            variant_id: random_uuid(rng),
            is_duplicate: false,
            fields: canonical.fields.clone(),
            changes: Vec::new(),
        }
    }

    /// Baseline plus `count` duplicates.
    pub fn cluster_with_count(
        &self,
        canonical: CanonicalEntity,
        count: u32,
        rng: &mut dyn RngCore,
    ) -> DuplicateCluster {
        let mut members = Vec::with_capacity(count as usize + 1);
        members.push(self.baseline(&canonical, rng));
        for _ in 0..count {
            members.push(self.variant(&canonical, rng));
        }
        debug!(
            canonical_id = %canonical.canonical_id,
            duplicates = count,
            "cluster generated"
        );
        DuplicateCluster { canonical, members }
    }

    pub fn cluster(&self, canonical: CanonicalEntity, rng: &mut dyn RngCore) -> DuplicateCluster {
        let count = self.duplicate_count(rng);
        self.cluster_with_count(canonical, count, rng)
    }
}

/// Relative weight of each duplicate count `k` in `[1, max]`.
fn count_weights(distribution: DuplicateDistribution, max: u32, dup_rate: f64) -> Vec<(u32, f64)> {
    let mean = 1.0 + dup_rate;
    let mut poisson = (-mean).exp();
    (1..=max)
        .map(|k| {
            let weight = match distribution {
                DuplicateDistribution::Uniform => 1.0,
                DuplicateDistribution::Poisson => {
                    let weight = poisson;
                    poisson *= mean / f64::from(k);
                    weight
                }
                DuplicateDistribution::Zipf => 1.0 / f64::from(k).sqrt(),
            };
            (k, weight)
        })
        .collect()
}

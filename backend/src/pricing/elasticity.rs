//! Elasticity layer
//!
//! Effective elasticity is `type elasticity × zone modifier`, optionally
//! scaled by a timing modifier when a booking lead time is known. The
//! adjustment then pushes inelastic segments up and pulls elastic ones down.

use crate::config::PricingConfig;
use crate::models::Space;

/// Which side of unit elasticity a segment falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElasticityBranch {
    Inelastic,
    Unit,
    Elastic,
}

/// Result of the elasticity layer
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticityDecision {
    pub elasticity: f64,
    pub adjustment: f64,
    pub branch: ElasticityBranch,
    pub note: String,
}

/// Effective elasticity of a space's segment
///
/// `lead_time` is the number of hours until the event. Below the last-minute
/// threshold demand is treated as more inelastic, above the advance
/// threshold as more elastic; in between, or when absent, no timing
/// modifier applies.
pub fn effective_elasticity(space: &Space, lead_time: Option<f64>, config: &PricingConfig) -> f64 {
    let mut elasticity = config.elasticity_by_type.get(space.spot_type())
        * config.elasticity_by_zone.get(space.zone());

    if let Some(lead) = lead_time {
        if lead < config.last_minute_threshold_hours {
            elasticity *= config.last_minute_elasticity_modifier;
        } else if lead > config.advance_threshold_hours {
            elasticity *= config.advance_elasticity_modifier;
        }
    }

    elasticity
}

/// Turn an elasticity into a price adjustment and explanation
///
/// # Example
/// ```
/// use garage_pricing_core::pricing::elasticity::{decide, ElasticityBranch};
///
/// let d = decide(0.63);
/// assert_eq!(d.branch, ElasticityBranch::Inelastic);
/// assert!((d.adjustment - 1.37).abs() < 1e-12);
/// assert!(d.note.contains("inelastic"));
///
/// assert_eq!(decide(1.0).adjustment, 1.0);
/// ```
pub fn decide(elasticity: f64) -> ElasticityDecision {
    if elasticity < 1.0 {
        let adjustment = 1.0 + (1.0 - elasticity);
        ElasticityDecision {
            elasticity,
            adjustment,
            branch: ElasticityBranch::Inelastic,
            note: format!(
                "inelastic segment (e={:.2}): price pushed up {:.0}%",
                elasticity,
                (adjustment - 1.0) * 100.0
            ),
        }
    } else if elasticity > 1.0 {
        let adjustment = 1.0 / elasticity;
        ElasticityDecision {
            elasticity,
            adjustment,
            branch: ElasticityBranch::Elastic,
            note: format!(
                "elastic segment (e={:.2}): price reduced {:.0}%",
                elasticity,
                (1.0 - adjustment) * 100.0
            ),
        }
    } else {
        ElasticityDecision {
            elasticity,
            adjustment: 1.0,
            branch: ElasticityBranch::Unit,
            note: "unit elastic (e=1.00): no adjustment".to_string(),
        }
    }
}

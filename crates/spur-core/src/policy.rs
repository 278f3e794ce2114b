//! Canonical reward policy tables
//!
//! Every tunable scoring number lives in one versioned TOML document:
//! per-category weights, the model-path adjustment tiers, the fallback
//! rule tiers, and the luxury overspend penalties. Tables are explicit
//! ordered tier lists rather than nested conditionals, so they can be
//! tested table-driven and swapped without touching code.
//!
//! ## Configuration Resolution
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for an override (`SPUR_POLICY_PATH`, then
//!    `<data-dir>/spur/config/policy.toml`)
//! 2. Fall back to embedded defaults (compiled into the binary)

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Embedded default policy (compiled into binary)
const DEFAULT_POLICY: &str = include_str!("../../../config/policy.toml");

/// Environment variable naming an explicit policy override file
pub const POLICY_PATH_ENV: &str = "SPUR_POLICY_PATH";

/// Overspend penalty class for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuxuryClass {
    /// Pure discretionary spending (entertainment, travel, shopping)
    Harsh,
    /// Can be overspent but is still a necessity (food)
    Moderate,
    /// Everything else
    Mild,
}

/// Static policy for one spending category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPolicy {
    /// Weight applied to the model estimate, in (0, 1]
    pub priority: f64,
    /// Seed value for the rule-based fallback path
    pub base_coins: u32,
    /// Feeds the category_health explanation factor
    pub healthy: bool,
    /// Overspend penalty class
    pub luxury: LuxuryClass,
}

/// One row of a tier table.
///
/// Applies to values less than or equal to `up_to`; a row without a
/// bound is the unbounded terminal tier.
#[derive(Debug, Clone, Deserialize)]
pub struct Tier {
    #[serde(default)]
    pub up_to: Option<f64>,
    pub factor: f64,
    #[serde(default)]
    pub tag: Option<String>,
}

/// An ordered list of tiers mapping a value to a factor.
#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct TierTable(Vec<Tier>);

/// Neutral tier returned if selection ever falls through. Load-time
/// validation guarantees a terminal tier, so this is unreachable in
/// practice.
const NEUTRAL_TIER: Tier = Tier {
    up_to: None,
    factor: 1.0,
    tag: None,
};

impl TierTable {
    /// Select the tier covering `value`.
    pub fn select(&self, value: f64) -> &Tier {
        for tier in &self.0 {
            match tier.up_to {
                Some(bound) if value > bound => continue,
                _ => return tier,
            }
        }
        &NEUTRAL_TIER
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.0
    }

    /// Validate ordering: ascending bounds, exactly one terminal tier
    /// (last), positive non-increasing factors.
    fn validate(&self, name: &str, require_tags: bool) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::Policy(format!("{}: tier table is empty", name)));
        }

        let mut prev_bound: Option<f64> = None;
        let mut prev_factor: Option<f64> = None;

        for (i, tier) in self.0.iter().enumerate() {
            if !tier.factor.is_finite() || tier.factor <= 0.0 {
                return Err(Error::Policy(format!(
                    "{}: tier {} has non-positive factor {}",
                    name, i, tier.factor
                )));
            }
            if require_tags && tier.tag.as_deref().map_or(true, str::is_empty) {
                return Err(Error::Policy(format!("{}: tier {} is missing a tag", name, i)));
            }

            match tier.up_to {
                Some(bound) => {
                    if !bound.is_finite() {
                        return Err(Error::Policy(format!(
                            "{}: tier {} has non-finite bound",
                            name, i
                        )));
                    }
                    if i == self.0.len() - 1 {
                        return Err(Error::Policy(format!(
                            "{}: last tier must be unbounded",
                            name
                        )));
                    }
                    if let Some(prev) = prev_bound {
                        if bound <= prev {
                            return Err(Error::Policy(format!(
                                "{}: tier bounds must be strictly ascending ({} after {})",
                                name, bound, prev
                            )));
                        }
                    }
                    prev_bound = Some(bound);
                }
                None => {
                    if i != self.0.len() - 1 {
                        return Err(Error::Policy(format!(
                            "{}: unbounded tier must come last",
                            name
                        )));
                    }
                }
            }

            if let Some(prev) = prev_factor {
                if tier.factor > prev {
                    return Err(Error::Policy(format!(
                        "{}: factors must be non-increasing ({} after {})",
                        name, tier.factor, prev
                    )));
                }
            }
            prev_factor = Some(tier.factor);
        }

        Ok(())
    }
}

/// Model-path adjustment tiers (deliberately narrower than the fallback
/// tables: the learned estimate is trusted for near-budget cases).
#[derive(Debug, Clone, Deserialize)]
pub struct ModelTables {
    pub overspend: TierTable,
    pub amount: TierTable,
}

/// Fallback rule tiers.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackTables {
    pub budget: TierTable,
    pub amount: TierTable,
}

/// Extra penalty for discretionary overspending.
#[derive(Debug, Clone, Deserialize)]
pub struct LuxuryTable {
    /// Budget ratio above which the penalty applies
    pub trigger_ratio: f64,
    pub harsh: f64,
    pub moderate: f64,
    pub mild: f64,
}

impl LuxuryTable {
    pub fn factor(&self, class: LuxuryClass) -> f64 {
        match class {
            LuxuryClass::Harsh => self.harsh,
            LuxuryClass::Moderate => self.moderate,
            LuxuryClass::Mild => self.mild,
        }
    }
}

/// The full policy document. Read-only after process start.
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyTables {
    pub version: u32,
    categories: BTreeMap<String, CategoryPolicy>,
    default_category: CategoryPolicy,
    pub model: ModelTables,
    pub fallback: FallbackTables,
    pub luxury: LuxuryTable,
}

impl PolicyTables {
    /// Parse and validate a policy document.
    pub fn from_toml(input: &str) -> Result<Self> {
        let tables: PolicyTables = toml::from_str(input)?;
        tables.validate()?;
        Ok(tables)
    }

    /// The embedded default tables.
    pub fn embedded() -> Result<Self> {
        Self::from_toml(DEFAULT_POLICY)
    }

    /// Load tables with override resolution.
    ///
    /// A present-but-invalid override is an error rather than a silent
    /// fall-through, so a typo cannot quietly revert policy.
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::override_path() {
            info!(path = %path.display(), "Loading policy table override");
            let text = fs::read_to_string(&path)?;
            return Self::from_toml(&text);
        }
        debug!("Using embedded policy tables");
        Self::embedded()
    }

    /// Locate an override file, if any.
    fn override_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(POLICY_PATH_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        let candidate = dirs::data_dir()?.join("spur").join("config").join("policy.toml");
        if candidate.exists() {
            Some(candidate)
        } else {
            None
        }
    }

    /// Policy for a category; unknown categories get the default bucket.
    pub fn category(&self, name: &str) -> &CategoryPolicy {
        self.categories.get(name).unwrap_or_else(|| {
            debug!(category = name, "Unknown category, using default policy");
            &self.default_category
        })
    }

    /// Whether the category is in the known vocabulary.
    pub fn is_known(&self, name: &str) -> bool {
        self.categories.contains_key(name)
    }

    /// The known category names, sorted.
    pub fn category_names(&self) -> Vec<String> {
        self.categories.keys().cloned().collect()
    }

    fn validate(&self) -> Result<()> {
        if self.version == 0 {
            return Err(Error::Policy("version must be at least 1".into()));
        }
        if self.categories.is_empty() {
            return Err(Error::Policy("no categories defined".into()));
        }

        let all_categories = self
            .categories
            .iter()
            .map(|(name, policy)| (name.as_str(), policy))
            .chain(std::iter::once(("default", &self.default_category)));

        for (name, policy) in all_categories {
            if !policy.priority.is_finite() || policy.priority <= 0.0 || policy.priority > 1.0 {
                return Err(Error::Policy(format!(
                    "category {}: priority {} outside (0, 1]",
                    name, policy.priority
                )));
            }
            if policy.base_coins < crate::models::MIN_COINS
                || policy.base_coins > crate::models::MAX_COINS
            {
                return Err(Error::Policy(format!(
                    "category {}: base_coins {} outside [{}, {}]",
                    name,
                    policy.base_coins,
                    crate::models::MIN_COINS,
                    crate::models::MAX_COINS
                )));
            }
        }

        self.model.overspend.validate("model.overspend", false)?;
        self.model.amount.validate("model.amount", false)?;
        self.fallback.budget.validate("fallback.budget", true)?;
        self.fallback.amount.validate("fallback.amount", false)?;

        for (name, factor) in [
            ("harsh", self.luxury.harsh),
            ("moderate", self.luxury.moderate),
            ("mild", self.luxury.mild),
        ] {
            if !factor.is_finite() || factor <= 0.0 || factor > 1.0 {
                return Err(Error::Policy(format!(
                    "luxury.{}: factor {} outside (0, 1]",
                    name, factor
                )));
            }
        }
        if !self.luxury.trigger_ratio.is_finite() || self.luxury.trigger_ratio < 0.0 {
            return Err(Error::Policy(format!(
                "luxury.trigger_ratio {} must be non-negative",
                self.luxury.trigger_ratio
            )));
        }

        Ok(())
    }
}

//! Activation Router (§4.2): complexity classification, pipeline selection,
//! and the decision cache.
//!
//! Shares `complexity.rs`'s `PatternClassifier`/`TaskComplexitySignals`
//! weighted-scoring shape, retargeted from "should an RLM sub-call
//! activate" to "what complexity band is this signal and which pipeline
//! template should run".

use crate::config::KernelConfig;
use crate::error::CapabilityGap;
use crate::kernel::types::{
    ActivationMap, ComplexityLevel, ModuleActivation, PipelineConfig, SignalTags, UrgencyBand,
};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Weighted inputs to `classify_signal_complexity`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexitySignals {
    pub urgency_score: f64,
    pub structural_score: f64,
    pub domain_specificity: f64,
    pub capability_gap_severity: f64,
}

impl ComplexitySignals {
    /// §4.2: weighted sum of four normalized scores (urgency 0.30,
    /// structural 0.25, domain specificity 0.25, capability gap 0.20).
    pub fn weighted_score(&self) -> f64 {
        0.30 * self.urgency_score
            + 0.25 * self.structural_score
            + 0.25 * self.domain_specificity
            + 0.20 * self.capability_gap_severity
    }
}

fn structural_score(tags: &SignalTags) -> f64 {
    let count = tags.required_tools.len() + tags.required_skills.len();
    (count as f64 / 6.0).min(1.0)
}

fn domain_specificity(tags: &SignalTags) -> f64 {
    if tags.domain == "general" {
        0.1
    } else {
        0.6
    }
}

fn urgency_score(band: UrgencyBand) -> f64 {
    match band {
        UrgencyBand::Low => 0.1,
        UrgencyBand::Normal => 0.35,
        UrgencyBand::High => 0.7,
        UrgencyBand::Critical => 1.0,
    }
}

/// `classify_signal_complexity(tags) -> ComplexityLevel` (§4.2).
///
/// Critical-urgency signals bypass the weighted sum entirely and return
/// `CRITICAL`.
pub fn classify_signal_complexity(
    tags: &SignalTags,
    gap_severity: Option<f64>,
) -> ComplexityLevel {
    if tags.urgency_band == UrgencyBand::Critical {
        return ComplexityLevel::Critical;
    }

    let signals = ComplexitySignals {
        urgency_score: urgency_score(tags.urgency_band),
        structural_score: structural_score(tags),
        domain_specificity: domain_specificity(tags),
        capability_gap_severity: gap_severity.unwrap_or(0.0),
    };

    let score = signals.weighted_score();
    if score >= 0.8 {
        ComplexityLevel::Critical
    } else if score >= 0.6 {
        ComplexityLevel::Complex
    } else if score >= 0.4 {
        ComplexityLevel::Moderate
    } else if score >= 0.2 {
        ComplexityLevel::Simple
    } else {
        ComplexityLevel::Trivial
    }
}

fn pipeline_template(complexity: ComplexityLevel) -> PipelineConfig {
    match complexity {
        ComplexityLevel::Trivial => PipelineConfig {
            complexity,
            active_modules: vec!["ooda".into(), "noise_gate".into()],
            gated_modules: vec!["hallucination".into(), "calibration".into()],
            max_cycles: 1,
            token_budget: 2_000,
        },
        ComplexityLevel::Simple => PipelineConfig {
            complexity,
            active_modules: vec![
                "ooda".into(),
                "hallucination".into(),
                "noise_gate".into(),
            ],
            gated_modules: vec!["calibration".into()],
            max_cycles: 1,
            token_budget: 4_000,
        },
        ComplexityLevel::Moderate => PipelineConfig {
            complexity,
            active_modules: vec![
                "ooda".into(),
                "hallucination".into(),
                "calibration".into(),
                "noise_gate".into(),
            ],
            gated_modules: vec![],
            max_cycles: 4,
            token_budget: 16_000,
        },
        ComplexityLevel::Complex => PipelineConfig {
            complexity,
            active_modules: vec![
                "ooda".into(),
                "hallucination".into(),
                "calibration".into(),
                "noise_gate".into(),
                "planning".into(),
            ],
            gated_modules: vec![],
            max_cycles: 8,
            token_budget: 64_000,
        },
        ComplexityLevel::Critical => PipelineConfig {
            complexity,
            active_modules: vec![
                "ooda".into(),
                "hallucination".into(),
                "calibration".into(),
                "noise_gate".into(),
                "planning".into(),
                "curiosity".into(),
                "what_if".into(),
            ],
            gated_modules: vec![],
            max_cycles: 16,
            token_budget: 200_000,
        },
    }
}

/// `select_pipeline(complexity, pressure) -> PipelineConfig` (§4.2).
pub fn select_pipeline(
    complexity: ComplexityLevel,
    pressure: f64,
    cfg: &KernelConfig,
) -> PipelineConfig {
    let downgraded = if pressure >= cfg.pressure_high_threshold {
        complexity.downgrade(2)
    } else if pressure >= cfg.pressure_moderate_threshold {
        complexity.downgrade(1)
    } else {
        complexity
    };
    pipeline_template(downgraded)
}

/// Gate (not disable) modules whose required tools the identity lacks.
/// Execute may revive a gated module only via REPLAN if the tool is later
/// acquired — the router never removes it from the activation map outright.
pub fn apply_tool_availability(
    pipeline: &PipelineConfig,
    tools_allowed: &HashSet<String>,
    required_tools: &HashSet<String>,
) -> ActivationMap {
    let mut modules = HashMap::new();
    for m in &pipeline.active_modules {
        modules.insert(m.clone(), ModuleActivation::Active);
    }
    for m in &pipeline.gated_modules {
        modules.insert(m.clone(), ModuleActivation::Gated);
    }

    let missing_tools: HashSet<String> = required_tools.difference(tools_allowed).cloned().collect();
    if !missing_tools.is_empty() {
        for module in modules.values_mut() {
            if *module == ModuleActivation::Active {
                *module = ModuleActivation::Gated;
            }
        }
    }

    ActivationMap {
        modules,
        required_tools: required_tools.clone(),
    }
}

fn fingerprint(domain: &str, intent: &str, complexity: ComplexityLevel, urgency: UrgencyBand) -> String {
    let key = format!("{domain}|{intent}|{complexity:?}|{urgency:?}");
    let digest = Sha256::digest(key.as_bytes());
    hex_prefix(&digest, 16)
}

fn hex_prefix(bytes: &[u8], chars: usize) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<String>()
        .chars()
        .take(chars)
        .collect()
}

struct CacheEntry {
    complexity: ComplexityLevel,
    map: ActivationMap,
    inserted_at: Instant,
}

/// Decision cache keyed by a fingerprint of `(domain, intent, complexity-band,
/// urgency-band)` with a TTL (§4.2). Process-global with a mutex around
/// eviction, per §5's shared-resource policy.
///
/// Caches the classified `ComplexityLevel` alongside its `ActivationMap` —
/// a cache hit must return the same pipeline tier that produced the cached
/// map, not whatever placeholder band `SignalTags` was carrying before
/// classification ran.
pub struct DecisionCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl DecisionCache {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            ttl: Duration::from_secs(ttl_seconds),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, tags: &SignalTags, complexity: ComplexityLevel) -> Option<(ComplexityLevel, ActivationMap)> {
        let key = fingerprint(&tags.domain, &tags.primary_intent, complexity, tags.urgency_band);
        let mut entries = self.entries.lock().expect("decision cache poisoned");
        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                Some((entry.complexity, entry.map.clone()))
            }
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, tags: &SignalTags, complexity: ComplexityLevel, map: ActivationMap) {
        let key = fingerprint(&tags.domain, &tags.primary_intent, complexity, tags.urgency_band);
        let mut entries = self.entries.lock().expect("decision cache poisoned");
        entries.insert(
            key,
            CacheEntry {
                complexity,
                map,
                inserted_at: Instant::now(),
            },
        );
    }
}

pub struct ActivationRouter {
    cache: DecisionCache,
}

impl ActivationRouter {
    pub fn new(cfg: &KernelConfig) -> Self {
        Self {
            cache: DecisionCache::new(cfg.cache_ttl_seconds),
        }
    }

    /// Run the full Gate-In activation decision: classify, select, gate on
    /// tool availability, and consult/populate the decision cache.
    pub fn route(
        &self,
        tags: &SignalTags,
        gap: Option<&CapabilityGap>,
        tools_allowed: &HashSet<String>,
        pressure: f64,
        cfg: &KernelConfig,
    ) -> (ComplexityLevel, ActivationMap) {
        let complexity = classify_signal_complexity(tags, gap.map(|g| g.severity));

        if let Some((cached_complexity, cached_map)) = self.cache.get(tags, complexity) {
            return (cached_complexity, cached_map);
        }

        let pipeline = select_pipeline(complexity, pressure, cfg);
        let map = apply_tool_availability(&pipeline, tools_allowed, &tags.required_tools);
        self.cache.insert(tags, complexity, map.clone());
        (complexity, map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(urgency: UrgencyBand, tools: usize, domain: &str) -> SignalTags {
        SignalTags {
            domain: domain.to_string(),
            urgency_band: urgency,
            required_tools: (0..tools).map(|i| format!("tool{i}")).collect(),
            ..SignalTags::default()
        }
    }

    #[test]
    fn critical_urgency_bypasses_weighted_sum() {
        let t = tags(UrgencyBand::Critical, 0, "general");
        assert_eq!(classify_signal_complexity(&t, None), ComplexityLevel::Critical);
    }

    #[test]
    fn trivial_faq_classifies_low() {
        let t = tags(UrgencyBand::Low, 0, "general");
        let level = classify_signal_complexity(&t, None);
        assert!(matches!(level, ComplexityLevel::Trivial | ComplexityLevel::Simple));
    }

    #[test]
    fn pressure_downgrade_by_two_at_high_threshold() {
        let cfg = KernelConfig::default();
        let pipeline = select_pipeline(ComplexityLevel::Complex, 0.85, &cfg);
        assert_eq!(pipeline.complexity, ComplexityLevel::Simple);
    }

    #[test]
    fn pressure_downgrade_by_one_at_moderate_threshold() {
        let cfg = KernelConfig::default();
        let pipeline = select_pipeline(ComplexityLevel::Complex, 0.65, &cfg);
        assert_eq!(pipeline.complexity, ComplexityLevel::Moderate);
    }

    #[test]
    fn missing_tool_gates_rather_than_disables() {
        let pipeline = pipeline_template(ComplexityLevel::Moderate);
        let allowed: HashSet<String> = HashSet::new();
        let required: HashSet<String> = ["payroll_read".to_string()].into_iter().collect();
        let map = apply_tool_availability(&pipeline, &allowed, &required);
        for module in pipeline.active_modules.iter() {
            assert_eq!(map.modules.get(module), Some(&ModuleActivation::Gated));
        }
    }

    #[test]
    fn cache_hit_returns_identical_map_within_ttl() {
        let cfg = KernelConfig::default();
        let router = ActivationRouter::new(&cfg);
        let t = tags(UrgencyBand::Normal, 1, "finance");
        let allowed: HashSet<String> = ["tool0".to_string()].into_iter().collect();
        let (_, first) = router.route(&t, None, &allowed, 0.0, &cfg);
        let (_, second) = router.route(&t, None, &allowed, 0.0, &cfg);
        assert_eq!(first, second);
    }

    #[test]
    fn cache_hit_returns_the_complexity_that_produced_the_cached_map() {
        let cfg = KernelConfig::default();
        let router = ActivationRouter::new(&cfg);
        // High urgency + several required tools pushes this well past Trivial;
        // `SignalTags::default().complexity_band` is `Simple`, so a router
        // that trusted the placeholder instead of its own classification
        // would report the wrong tier on the cache-hit path.
        let t = tags(UrgencyBand::High, 4, "finance");
        let allowed: HashSet<String> = (0..4).map(|i| format!("tool{i}")).collect();

        let (classified, first_map) = router.route(&t, None, &allowed, 0.0, &cfg);
        assert_ne!(classified, ComplexityLevel::Simple);

        let (cached_complexity, cached_map) = router.route(&t, None, &allowed, 0.0, &cfg);
        assert_eq!(cached_complexity, classified);
        assert_eq!(cached_map, first_map);
    }
}

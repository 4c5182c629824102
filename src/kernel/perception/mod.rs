//! Perception submodules (SPEC_FULL.md §C): the concerns `spec.md` §4.1
//! steps 2-3 compress into "ingest modality" and "run perception in
//! parallel". Each concern is its own small module; `perceive` assembles
//! their outputs into one `SignalTags`, which is what Gate-In actually
//! needs `spec.md` to produce.

pub mod classify;
pub mod entities;
pub mod intent;
pub mod modality;
pub mod spacetime;
pub mod validation;

use crate::kernel::types::{ComplexityLevel, SignalTags, UrgencyBand};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Everything Gate-In learns about a raw input before capability assessment
/// and complexity classification run.
#[derive(Debug, Clone, PartialEq)]
pub struct PerceptionResult {
    pub tags: SignalTags,
    pub modality: modality::ModalityType,
    pub file_handle: Option<modality::FileHandle>,
    pub entities: Vec<entities::ValidatedEntity>,
    pub anchors: spacetime::SpatiotemporalAnchors,
    pub classification: classify::ClassificationResult,
}

/// Run the perception tier over one `RawInput` (§4.1 steps 2-3): ingest
/// modality, score intent/sentiment/urgency, extract entities, anchor
/// spatiotemporal references, and classify domain — then assemble
/// `SignalTags`. Skills/tools the caller already knows are required (from
/// the `SpawnRequest`) are folded in verbatim; this tier only derives what
/// can be read off the input text itself.
pub fn perceive(
    input: &modality::RawInput,
    reference_time: DateTime<Utc>,
    required_skills: HashSet<String>,
    required_tools: HashSet<String>,
    embed: Option<&dyn Fn(&str) -> Vec<f64>>,
) -> PerceptionResult {
    let (modality_type, file_handle) = modality::classify(input);
    let text = input.content.clone().unwrap_or_default();

    let labels = intent::score(&text);
    let found_entities = entities::extract(&text);
    let anchors = spacetime::anchor(&text, reference_time);
    let classification = classify::classify(&text, embed);

    let tags = SignalTags {
        domain: classification.domain.clone(),
        urgency_band: labels.urgency_band,
        // Default until Gate-In overwrites it with the Activation Router's
        // classification; the router classifies from `gap_severity` plus
        // the fields above, never from this value (spec.md §4.2
        // `classify_signal_complexity`).
        complexity_band: ComplexityLevel::Simple,
        primary_intent: labels.intent,
        required_skills,
        required_tools,
        content_keywords: found_entities.iter().map(|e| e.value.clone()).collect(),
    };

    PerceptionResult {
        tags,
        modality: modality_type,
        file_handle,
        entities: found_entities,
        anchors,
        classification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perceive_assembles_signal_tags_from_text() {
        let input = modality::RawInput::text("How do I reset my password?");
        let result = perceive(&input, Utc::now(), HashSet::new(), HashSet::new(), None);
        assert_eq!(result.tags.urgency_band, UrgencyBand::Low);
        assert_eq!(result.modality, modality::ModalityType::Text);
    }
}

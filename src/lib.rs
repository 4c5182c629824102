//! # cognitive-kernel
//!
//! A tiered cognitive kernel: every input is run through a Gate-In ->
//! Execute -> Gate-Out pipeline, with activation routing, cognitive-load
//! monitoring, hallucination grading, and confidence calibration deciding
//! how much of the kernel actually engages for a given signal.
//!
//! ## Core Components
//!
//! - **Apex Orchestrator** (`kernel::orchestrator`): the single entry point,
//!   `ApexOrchestrator::process`.
//! - **Activation Router** (`kernel::activation`): complexity classification
//!   and pipeline selection.
//! - **Cognitive Load Monitor** (`kernel::load`): per-cycle load measurement
//!   and the Continue/Simplify/Escalate/Abort ladder.
//! - **Hallucination Monitor** (`kernel::hallucination`): claim extraction
//!   and evidence grading.
//! - **Confidence Calibrator** (`kernel::calibration`): per-domain
//!   observed-accuracy curves.
//! - **Noise Gate** (`kernel::noise_gate`): the quality bar a candidate
//!   output must clear before it leaves the kernel.
//! - **OODA Cycle Driver** (`kernel::ooda`): one Observe/Orient/Decide/Act
//!   step over the current plan.
//! - **Short-Term Memory** (`kernel::memory`): ephemeral state for one
//!   Execute phase.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cognitive_kernel::{ApexOrchestrator, Collaborators, KernelConfig, RawInput, SpawnRequest};
//!
//! # async fn run() {
//! let orchestrator = ApexOrchestrator::new(KernelConfig::default(), Collaborators::default());
//! let spawn = SpawnRequest::new("employee", "How do I reset my password?");
//! let input = RawInput::text("How do I reset my password?");
//! let result = orchestrator.process(input, spawn, vec![]).await;
//! # }
//! ```

pub mod collaborators;
pub mod config;
pub mod error;
pub mod kernel;

pub use collaborators::{
    Collaborators, EventStream, InferenceContext, InferenceKit, KnowledgeRetriever,
    NullEventStream, NullInferenceKit, NullRetriever, NullToolRegistry, ToolDescriptor,
    ToolRegistry,
};
pub use config::{IdentityConfig, KernelConfig, QualityBar};
pub use error::{Error, Result};
pub use kernel::lifecycle::{Identity, SpawnRequest};
pub use kernel::ooda::{ActionResult, NodeExecutor, OodaCycleDriver};
pub use kernel::orchestrator::{ApexOrchestrator, ObserverPhase, ObserverResult, ProcessingMode};
pub use kernel::perception::modality::RawInput;
pub use kernel::types::{
    ActivationMap, CalibratedConfidence, CapabilityAssessment, Claim, ClaimCategory,
    CognitiveLoad, ComplexityLevel, Decision, DecisionAction, ExecutableDag, FilteredOutput,
    GroundingReport, ModuleActivation, Origin, PipelineConfig, RejectedOutput, SignalTags,
    UrgencyBand,
};

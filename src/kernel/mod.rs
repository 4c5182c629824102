//! The cognitive kernel (SPEC_FULL.md §4): eight core components plus the
//! perception/planning/lifecycle submodules they're built from, wired
//! together by `orchestrator::ApexOrchestrator`.

pub mod activation;
pub mod calibration;
pub mod hallucination;
pub mod lifecycle;
pub mod load;
pub mod memory;
pub mod noise_gate;
pub mod ooda;
pub mod orchestrator;
pub mod perception;
pub mod planning;
pub mod types;

pub use activation::ActivationRouter;
pub use calibration::ConfidenceCalibrator;
pub use hallucination::HallucinationMonitor;
pub use lifecycle::{SpawnRequest, TraceLifecycle};
pub use load::CognitiveLoadMonitor;
pub use noise_gate::NoiseGate;
pub use ooda::{NodeExecutor, OodaCycleDriver};
pub use orchestrator::{ApexOrchestrator, ObserverPhase, ObserverResult, ProcessingMode};

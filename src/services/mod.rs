pub mod orchestrator;

pub use orchestrator::{PaymentOrchestrator, Receipt, ResolutionChannel};

pub mod detect;
pub mod registry;

pub use detect::{DetectionEvidence, DetectionMethod, LanguageDetection, LanguageDetector, LanguageStats};
pub use registry::{ClassificationRule, LanguageProfile, LanguageRegistry};

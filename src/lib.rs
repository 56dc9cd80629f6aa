// Stomp Control Core - real-time stomp-to-direction engine
// Detection, feature extraction, and classification over stereo audio

// Module declarations
pub mod analysis;
pub mod audio;
pub mod classify;
pub mod config;
pub mod control;
pub mod error;

// Re-exports for convenience
pub use analysis::{DetectionEvent, StompPipeline};
pub use classify::Direction;
pub use config::AppConfig;

/// Initialize logging for binaries and tools
///
/// Respects RUST_LOG; repeated calls are harmless, so tests and embedders
/// can both call it.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_module_structure() {
        // Verify all modules are accessible
        // This ensures the crate compiles with proper module hierarchy
    }
}

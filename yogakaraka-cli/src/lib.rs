// All detection logic is in yogakaraka-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod output;

// Re-export core types for convenience
pub use yogakaraka_core::*;

// Re-export CLI utilities
pub use output::{load_chart, render, save_output, OutputFormat};

// Library root module for ultra-sor
// This file defines the public API and module structure for the ultra-sor library
// It exports the split-route optimizer and the providers it runs against
//
// Numan Thabit 2025 Nov

pub mod amounts;
pub mod chains;
pub mod config;
pub mod errors;
pub mod gas;
pub mod metrics;
pub mod router;
pub mod tokens;
pub mod transport;
pub mod venues;

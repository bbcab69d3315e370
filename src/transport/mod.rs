// Wire transports for external collaborators
//
// Numan Thabit 2025 Nov

pub mod graphql;
pub mod jsonrpc;

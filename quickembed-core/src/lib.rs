// quickembed-core: embedding backend contract shared by the quickembed gateway.

pub mod embedding;

// Test utilities - always available for use by quickembed-server and tests
pub mod testutil;

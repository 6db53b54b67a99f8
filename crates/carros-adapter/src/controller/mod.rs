//! Inbound Adapters - The RPC surface
//!
//! ```text
//! line ─→ rpc::CarsEndpoint ─→ CarRegistrationService
//!   ↑            │
//!   └── server ←─┘ (status::Status on failure)
//! ```

pub mod rpc;
pub mod server;
pub mod status;

//! Filegate Pipeline Library
//!
//! The per-event state machine: decode the provider hash, query the
//! reputation service, route the file on a terminal verdict, otherwise
//! submit it for analysis and poll (bounded) until one appears.

pub mod orchestrator;
pub mod poll;
pub mod router;

pub use orchestrator::{FailureReason, Orchestrator, Resolution, RouteTable};
pub use poll::PollPolicy;
pub use router::{FileRouter, MoveError};

//! JSON API client for the managed wide-column service
//!
//! [`RestAdminClient`] and [`RestDataClient`] implement the client traits of
//! `hellotable-core` over the service's public v2 JSON surface using a
//! blocking `reqwest` client. Authentication is a bearer token supplied by
//! the caller; no token minting happens here.
//!
//! - [`wire`]: request and response bodies
//! - [`chunks`]: reassembly of streamed `readRows` chunks

#![warn(clippy::all)]

pub mod chunks;
mod client;
pub mod wire;

pub use chunks::ChunkMerger;
pub use client::{connect, RestAdminClient, RestDataClient};

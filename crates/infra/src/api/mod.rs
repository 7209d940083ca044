//! Portal backend API client
//!
//! [`PortalApiClient`] implements [`eyecare_core::ports::PortalApi`] over
//! HTTP. Each call is one request whose JSON body is returned as received;
//! non-success statuses map onto the domain error taxonomy.

mod client;

pub use client::PortalApiClient;

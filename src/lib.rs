//! # dinehub-gateway
//!
//! REST API and WebSocket gateway for real-time restaurant order fan-out.
//!
//! This crate is the single writer-and-broadcaster for order state in a
//! multi-tenant restaurant platform: every order mutation — whether it
//! arrives over REST or as a WebSocket command — is validated, committed
//! through the persistence seam, and only then fanned out to the
//! restaurant's kitchen and waiter rooms. Menu, table, and staff CRUD
//! live in other services; this one owns the event path.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── REST Handlers (api/)
//!     ├── WS Connections (ws/)
//!     │
//!     ├── OrderDispatcher (service/)   persist → route → fan out
//!     │
//!     ├── ConnectionRegistry (domain/) rooms = restaurant × role
//!     ├── Routing policy (domain/)
//!     │
//!     └── OrderStore (persistence/)    PostgreSQL or in-memory
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod ws;

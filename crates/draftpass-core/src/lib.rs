//! Core of draftpass: anonymous, time-bounded preview links for unpublished
//! content.
//!
//! This crate provides:
//! - Stateless time-windowed tokens bound to one content id ([`token`])
//! - Content id disambiguation across addressing conventions ([`request`])
//! - The authorization pipeline producing an [`AuthorizationContext`]
//! - Synthetic single-item [`DocumentView`]s
//! - A chain of render [`adapter`]s that commits the substitution
//! - The two-phase [`PreviewController`] a host calls into
//! - Shareable link generation and Prometheus metrics helpers
//!
//! # Request flow
//!
//! ```text
//! request ─▶ on_request_parsed ─▶ PreviewResolver ─▶ AdapterBus::bootstrap
//!                                                      │
//!          on_before_render ◀───────────────────────────┘
//!                 │
//!                 ├─▶ DocumentViewFactory::build
//!                 └─▶ AdapterBus::finalize (first HANDLED wins)
//! ```
//!
//! Nothing here holds cross-request state. The host owns one
//! [`RequestScope`] per request and threads it through both phases.

pub mod adapter;
pub mod content;
pub mod controller;
mod error;
pub mod links;
pub mod metrics;
pub mod request;
pub mod resolver;
pub mod scope;
pub mod token;
pub mod view;

pub use adapter::{AdapterBus, AdapterOutcome, BuilderAdapter, DefaultAdapter, PreviewAdapter};
pub use content::{
    ContentItem, ContentKind, ContentStatus, ContentStore, EnabledSet, MemoryStore, Registry,
};
pub use controller::PreviewController;
pub use error::{Error, RejectReason, Result, Stage};
pub use links::PreviewLinks;
pub use request::{PreviewRequest, RouteVars, TOKEN_PARAM};
pub use resolver::{AuthorizationContext, PreviewResolver, Resolution};
pub use scope::RequestScope;
pub use token::{Clock, ExpirationHours, FixedClock, SystemClock, TickMatch, TokenCodec};
pub use view::{DocumentType, DocumentView, DocumentViewFactory, RouteFlags};

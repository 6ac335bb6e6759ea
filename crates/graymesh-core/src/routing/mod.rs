//! Gray-routing engine: version derivation, eligibility, and selection.
//!
//! Strategies are trait objects over a flat capability set — one method
//! per seam, no inheritance. The engine composes them to filter a
//! candidate list; tie-breaking among survivors belongs to the
//! load-balancing collaborator, never to this module.
mod version;
pub use version::{MetadataVersionStrategy, VersionStrategy};

mod invoker;
pub use invoker::{InvokerStrategy, TargetVersionInvoker};

mod engine;
pub use engine::{RoutingEngine, Selection};

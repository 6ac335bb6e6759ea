pub mod context;
pub mod routing;
pub mod wrapper;

pub mod prelude {
    pub use crate::context::{TagScope, current, install, suppress};
    pub use crate::routing::{
        InvokerStrategy, MetadataVersionStrategy, RoutingEngine, Selection, TargetVersionInvoker,
        VersionStrategy,
    };
    pub use crate::wrapper::{Tagged, TaggedWork, tag_free, tagged, tagged_with};
}

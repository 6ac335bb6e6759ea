mod domain;
pub use domain::{DEFAULT_VERSION, META_VERSION_KEY, TAG_VERSION_KEY};
pub use domain::{Metadata, ServiceId};

mod error;
pub use error::{ModelError, ModelResult};

mod instance;
pub use instance::{Instance, InstanceStatus};

mod tag;
pub use tag::TrafficTag;

mod rule;
pub use rule::{EmptyMatchPolicy, RequiredVersion, RouteConfig, RoutingRule};

mod strategy;
pub use strategy::ValueMatchStrategy;

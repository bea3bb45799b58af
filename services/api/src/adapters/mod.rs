pub mod identity;
pub mod profiles;

pub use identity::{BypassIdentityAdapter, GatewayIdentityAdapter};
pub use profiles::InMemoryProfileAdapter;

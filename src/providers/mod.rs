pub mod error;
pub mod http;
pub mod mock;
pub mod proxy;
pub mod types;

pub use error::ProviderError;
pub use mock::{MockBackend, MockReply};
pub use proxy::{ClientConfig, ProxyClient};
pub use types::{ApiKey, Endpoint, ModelId};

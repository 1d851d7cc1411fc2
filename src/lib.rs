pub mod cli;
pub mod error;
pub mod extract;
pub mod feeds;
pub mod iplists;
pub mod registry;
pub mod resolver;
pub mod rpsl;
pub mod transport;

pub use cli::Cli;
pub use error::WhoisError;
pub use extract::ResolutionResult;
pub use iplists::IpListOptions;
pub use registry::{RegistryDirectory, RegistryEndpoint};
pub use resolver::Resolver;
pub use rpsl::Record;

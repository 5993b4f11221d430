mod authorizer;
mod registry;

pub use authorizer::Authorizer;
pub use registry::ActorRegistry;

pub mod fixture;
pub mod gateway;

pub use fixture::FixtureSessionProvider;
pub use gateway::GatewaySessionProvider;

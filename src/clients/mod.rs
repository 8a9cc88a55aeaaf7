pub mod meka_client;

pub use meka_client::MekaClient;

pub mod client;

pub use client::{PayRequest, PayResponse, RemoteClient, RemoteError};

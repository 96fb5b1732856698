#[cfg(test)]
pub mod common;
#[cfg(test)]
mod metrics_endpoint;
#[cfg(test)]
mod profile_store;

pub mod common;
pub mod launcher;

#[cfg(test)]
pub(crate) mod tests;

pub type Error = crate::common::error::LaunchError;
pub type Result<T> = std::result::Result<T, Error>;

pub const SLURMTOOLS_VERSION: &str = env!("CARGO_PKG_VERSION");

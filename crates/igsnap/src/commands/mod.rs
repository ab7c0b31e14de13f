//! CLI command implementations.

pub(crate) mod fetch;
pub(crate) mod show;

pub(crate) use fetch::FetchArgs;
pub(crate) use show::ShowArgs;

//! CLI command implementations.

pub(crate) mod deploy;
pub(crate) mod preview;

pub(crate) use deploy::DeployArgs;
pub(crate) use preview::PreviewArgs;

//! Options provider implementation
//!
//! Bridges the loader to the `OptionsProvider` port the forward
//! service consumes.

use crosspost_core::OptionsProvider;
use crosspost_domain::{ForwardingOptions, Result};

use super::loader;

/// Serves a fixed set of forwarding settings.
///
/// The settings are captured once, either directly or via the loader,
/// and every `forwarding_options` call returns a clone. An attempt
/// therefore sees one consistent view of the settings even if the
/// backing file or environment changes mid-run.
#[derive(Debug, Clone)]
pub struct StaticOptionsProvider {
    options: ForwardingOptions,
}

impl StaticOptionsProvider {
    /// Wrap already-loaded settings.
    pub fn new(options: ForwardingOptions) -> Self {
        Self { options }
    }

    /// Load settings through the standard loader (environment first,
    /// then file probing).
    ///
    /// # Errors
    /// Returns `CrosspostError::Config` if neither source yields a
    /// valid configuration.
    pub fn from_environment() -> Result<Self> {
        Ok(Self::new(loader::load()?))
    }
}

impl OptionsProvider for StaticOptionsProvider {
    fn forwarding_options(&self) -> Result<ForwardingOptions> {
        Ok(self.options.clone())
    }
}

#[cfg(test)]
mod tests {
    use crosspost_domain::PostStatus;

    use super::*;

    #[test]
    fn serves_the_captured_options() {
        let provider = StaticOptionsProvider::new(ForwardingOptions {
            enabled: true,
            post_status: PostStatus::Publish,
            portals: Default::default(),
        });

        let options = provider.forwarding_options().expect("options");
        assert!(options.enabled);
        assert_eq!(options.post_status, PostStatus::Publish);
    }
}

//! Runtime feature checks.
//!
//! Collaborators are switched on twice: at compile time through cargo features on the
//! backend crate, and at runtime through `use_*` flags in the configuration. A runtime
//! feature is only usable when its flag is set *and* its configuration section exists.

/// Check if a feature is enabled at runtime based on configuration.
///
/// # Arguments
///
/// * `use_feature` - The configuration flag that enables the feature
/// * `feature_config` - The configuration section for the feature
pub fn is_feature_enabled<T>(use_feature: bool, feature_config: Option<&T>) -> bool {
    use_feature && feature_config.is_some()
}

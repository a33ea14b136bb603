//! Property-based tests for configuration system.

use super::merger::ConfigMerger;
use super::schema::{Config, FailurePolicy, OutputFormat};
use super::validator::ConfigValidator;
use proptest::prelude::*;

fn extension_strategy() -> impl Strategy<Value = String> {
    "\\.[a-z]{1,8}"
}

fn directory_name_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_-][a-zA-Z0-9._-]{0,11}"
}

fn policy_strategy() -> impl Strategy<Value = FailurePolicy> {
    prop_oneof![Just(FailurePolicy::BestEffort), Just(FailurePolicy::Rollback)]
}

fn format_strategy() -> impl Strategy<Value = OutputFormat> {
    prop_oneof![Just(OutputFormat::Human), Just(OutputFormat::Json)]
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(prop::collection::vec(extension_strategy(), 1..4)),
        prop::option::of(prop::collection::vec(directory_name_strategy(), 1..6)),
        prop::option::of(prop::collection::vec(directory_name_strategy(), 1..3)),
        prop::option::of(policy_strategy()),
        prop::option::of(format_strategy()),
    )
        .prop_map(|(projects, excluded, markers, policy, format)| Config {
            project_extensions: projects,
            excluded_directories: excluded,
            repository_markers: markers,
            failure_policy: policy,
            output_format: format,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Every field set by the higher source wins; unset fields keep the lower value.
    #[test]
    fn config_merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(
            &merged.project_extensions,
            if high.project_extensions.is_some() { &high.project_extensions } else { &low.project_extensions }
        );
        prop_assert_eq!(
            &merged.excluded_directories,
            if high.excluded_directories.is_some() { &high.excluded_directories } else { &low.excluded_directories }
        );
        prop_assert_eq!(
            &merged.repository_markers,
            if high.repository_markers.is_some() { &high.repository_markers } else { &low.repository_markers }
        );
        prop_assert_eq!(merged.failure_policy, high.failure_policy.or(low.failure_policy));
        prop_assert_eq!(merged.output_format, high.output_format.or(low.output_format));
    }

    // Merging a config onto itself changes nothing.
    #[test]
    fn config_merge_idempotent(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    // Generated configs are well formed, and stay valid when merged.
    #[test]
    fn config_valid_configs_merge_valid(low in config_strategy(), high in config_strategy()) {
        prop_assert!(ConfigValidator::validate(&low).is_ok());
        let mut merged = low;
        ConfigMerger::merge_into(&mut merged, &high);
        prop_assert!(ConfigValidator::validate(&merged).is_ok());
    }

    // Extensions without a leading dot are always rejected.
    #[test]
    fn config_rejects_extension_without_dot(ext in "[a-z]{1,8}") {
        let config = Config {
            project_extensions: Some(vec![ext]),
            ..Default::default()
        };
        prop_assert!(ConfigValidator::validate(&config).is_err());
    }
}

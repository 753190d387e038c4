//! Compose fragment resolution
//!
//! Pure mapping from (toggles, run mode) to the ordered list of compose files.
//! Fragment existence is not checked here: a missing file surfaces as a
//! docker compose error when the set is used.

use crate::domain::{ComposeFragmentSet, RunMode, ServiceToggles};

/// Base compose file, always first.
pub const BASE_FRAGMENT: &str = "docker-compose.yml";

/// Compose file name for a mode or service: `docker-compose.<name>.yml`.
pub fn fragment_name(name: &str) -> String {
    format!("docker-compose.{}.yml", name)
}

/// Resolve the ordered fragment set.
///
/// Order: base, mode, then one fragment per enabled service in file order.
pub fn resolve(toggles: &ServiceToggles, mode: RunMode) -> ComposeFragmentSet {
    let mut files = vec![BASE_FRAGMENT.to_string(), fragment_name(mode.as_str())];
    files.extend(toggles.enabled().map(fragment_name));
    ComposeFragmentSet::new(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::KeyValues;
    use rstest::rstest;

    fn toggles(content: &str) -> ServiceToggles {
        ServiceToggles::from_key_values(&KeyValues::parse(content))
    }

    #[rstest]
    #[case(RunMode::Local, "docker-compose.local.yml")]
    #[case(RunMode::External, "docker-compose.external.yml")]
    fn given_no_toggles_when_resolve_then_base_and_mode_only(
        #[case] mode: RunMode,
        #[case] mode_file: &str,
    ) {
        let set = resolve(&ServiceToggles::default(), mode);
        assert_eq!(set.files(), &["docker-compose.yml".to_string(), mode_file.to_string()]);
    }

    #[test]
    fn given_redis_enabled_postgres_disabled_chroma_commented_when_resolve_then_only_redis() {
        let t = toggles("ENABLE_REDIS=true\nENABLE_POSTGRES=false\n# ENABLE_CHROMA=true\n");
        let set = resolve(&t, RunMode::Local);

        assert_eq!(set.files().len(), 3);
        assert!(set.contains("docker-compose.redis.yml"));
        assert!(!set.contains("docker-compose.postgres.yml"));
        assert!(!set.contains("docker-compose.chroma.yml"));
    }

    #[test]
    fn given_services_when_resolve_then_follow_file_order() {
        let t = toggles("ENABLE_POSTGRES=true\nENABLE_REDIS=true\nENABLE_CHROMA=true\n");
        let set = resolve(&t, RunMode::External);

        assert_eq!(
            set.files(),
            &[
                "docker-compose.yml",
                "docker-compose.external.yml",
                "docker-compose.postgres.yml",
                "docker-compose.redis.yml",
                "docker-compose.chroma.yml",
            ]
            .map(String::from)
        );
    }

    #[test]
    fn given_same_config_when_resolved_repeatedly_then_identical() {
        let content = "ENABLE_B=true\nENABLE_A=true\nENABLE_C=false\n";
        let first = resolve(&toggles(content), RunMode::Local);
        for _ in 0..10 {
            assert_eq!(resolve(&toggles(content), RunMode::Local), first);
        }
    }

    #[test]
    fn given_unknown_service_when_resolve_then_still_referenced() {
        let set = resolve(&toggles("ENABLE_MYSTERY=true\n"), RunMode::Local);
        assert!(set.contains("docker-compose.mystery.yml"));
    }
}

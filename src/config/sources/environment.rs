//! Environment source: VAULTSYNC_<SECTION>__<KEY>, plus the token variables.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Token variables, highest priority first
pub const TOKEN_VARIABLES: [&str; 2] = ["VAULTSYNC_TOKEN", "GITHUB_TOKEN"];

/// First non-empty token variable
pub fn token_from_env() -> Option<String> {
    TOKEN_VARIABLES
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
}

/// Add `VAULTSYNC_*` variables and the access token to the builder.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    builder
        .add_source(
            Environment::with_prefix("VAULTSYNC")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("sync.ignore_patterns"),
        )
        .set_override_option("remote.token", token_from_env())
}

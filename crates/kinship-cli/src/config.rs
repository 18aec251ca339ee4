//! Settings resolution for the `kinship` binary.
//!
//! File and environment values come from [`KinshipConfig::load`]; flags given
//! on the command line win over both.

use kinship_core::config::KinshipConfig;

/// Connection flags that override the loaded configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub uri: Option<String>,
    pub user: Option<String>,
    pub database: Option<String>,
}

impl Overrides {
    pub fn apply(&self, config: &mut KinshipConfig) {
        if let Some(uri) = &self.uri {
            config.neo4j.uri = uri.clone();
        }
        if let Some(user) = &self.user {
            config.neo4j.user = user.clone();
        }
        if let Some(database) = &self.database {
            config.neo4j.database = Some(database.clone());
        }
    }
}

/// Load `{file_prefix}.toml` plus `KINSHIP__*` variables, then apply flags.
pub fn load_settings(file_prefix: &str, overrides: &Overrides) -> crate::error::Result<KinshipConfig> {
    let mut config = KinshipConfig::load(file_prefix)?;
    overrides.apply(&mut config);
    tracing::debug!(uri = %config.neo4j.uri, user = %config.neo4j.user, "Settings loaded");
    Ok(config)
}

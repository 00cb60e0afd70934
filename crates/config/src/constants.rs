//! Fixed names and defaults for VaultIQ configuration

/// Directory under the user config dir that holds `config.toml`
pub const CONFIG_DIR_NAME: &str = "vaultiq";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Mean score a document must strictly exceed to be approved
pub const DEFAULT_APPROVAL_THRESHOLD: f64 = 0.8;

/// Placeholder replaced by the document path or identifier in collaborator args
pub const DOCUMENT_PLACEHOLDER: &str = "{document}";

pub const ENV_OUTPUT: &str = "VAULTIQ_OUTPUT";
pub const ENV_COLOR: &str = "VAULTIQ_COLOR";
pub const ENV_APPROVAL_THRESHOLD: &str = "VAULTIQ_APPROVAL_THRESHOLD";
pub const ENV_SCORE_POLICY: &str = "VAULTIQ_SCORE_POLICY";

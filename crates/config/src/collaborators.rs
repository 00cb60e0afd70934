//! External collaborator command configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use vaultiq_types::Collaborator;

/// How to launch one external collaborator
///
/// ```toml
/// [collaborators.forgery]
/// program = "/usr/local/bin/forgery-check"
/// args = ["--input", "{document}"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
    /// Extra environment variables for the child process
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

/// Commands for the three collaborators; unset entries are unavailable
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollaboratorsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr: Option<CommandSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forgery: Option<CommandSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<CommandSpec>,
}

impl CollaboratorsConfig {
    #[must_use]
    pub fn get(&self, collaborator: Collaborator) -> Option<&CommandSpec> {
        match collaborator {
            Collaborator::Ocr => self.ocr.as_ref(),
            Collaborator::Forgery => self.forgery.as_ref(),
            Collaborator::Market => self.market.as_ref(),
        }
    }

    /// Collaborators with no command configured
    #[must_use]
    pub fn missing(&self) -> Vec<Collaborator> {
        [Collaborator::Ocr, Collaborator::Forgery, Collaborator::Market]
            .into_iter()
            .filter(|c| self.get(*c).is_none())
            .collect()
    }
}

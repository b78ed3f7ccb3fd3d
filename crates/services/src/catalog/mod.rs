//! Built-in training modules and their scenarios.

use std::sync::Arc;

use drill_core::model::{ModuleId, Scenario};

mod network;
mod passwords;
mod phishing;
mod threat_hunting;

pub use threat_hunting::{DNS_TUNNELING, INSIDER_THREAT, SSH_BRUTE_FORCE};

pub const PHISHING_AWARENESS: &str = "phishing-awareness";
pub const PASSWORD_SECURITY: &str = "password-security";
pub const THREAT_HUNTING: &str = "threat-hunting";
pub const NETWORK_SECURITY: &str = "network-security";

fn module_id(raw: &str) -> Result<ModuleId, drill_core::Error> {
    Ok(ModuleId::new(raw)?)
}

/// A training module: a titled group of scenarios reported under one module id.
#[derive(Debug, Clone)]
pub struct TrainingModule {
    id: ModuleId,
    title: &'static str,
    summary: &'static str,
    scenarios: Vec<Arc<Scenario>>,
}

impl TrainingModule {
    #[must_use]
    pub fn id(&self) -> &ModuleId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &'static str {
        self.title
    }

    #[must_use]
    pub fn summary(&self) -> &'static str {
        self.summary
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Arc<Scenario>] {
        &self.scenarios
    }
}

/// Ordered module list; the order is the recommended progression.
#[derive(Debug, Clone)]
pub struct ModuleCatalog {
    modules: Vec<TrainingModule>,
}

impl ModuleCatalog {
    /// Builds the four built-in modules.
    ///
    /// # Errors
    ///
    /// Returns `drill_core::Error` if any fixture violates an item or scenario invariant.
    pub fn builtin() -> Result<Self, drill_core::Error> {
        let module = |id: &str,
                      title: &'static str,
                      summary: &'static str,
                      scenarios: Vec<Scenario>|
         -> Result<TrainingModule, drill_core::Error> {
            Ok(TrainingModule {
                id: module_id(id)?,
                title,
                summary,
                scenarios: scenarios.into_iter().map(Arc::new).collect(),
            })
        };

        Ok(Self {
            modules: vec![
                module(
                    PHISHING_AWARENESS,
                    "Phishing Awareness",
                    "Spot phishing emails in a simulated inbox.",
                    vec![phishing::scenario()?],
                )?,
                module(
                    PASSWORD_SECURITY,
                    "Password Security",
                    "Judge password strength and common weaknesses.",
                    vec![passwords::scenario()?],
                )?,
                module(
                    THREAT_HUNTING,
                    "Threat Hunting",
                    "Investigate security logs to uncover attacks.",
                    vec![
                        threat_hunting::ssh_brute_force()?,
                        threat_hunting::insider_threat()?,
                        threat_hunting::dns_tunneling()?,
                    ],
                )?,
                module(
                    NETWORK_SECURITY,
                    "Network Security",
                    "Analyse scans, firewall rules and protocols.",
                    vec![network::scenario()?],
                )?,
            ],
        })
    }

    #[must_use]
    pub fn modules(&self) -> &[TrainingModule] {
        &self.modules
    }

    #[must_use]
    pub fn module(&self, id: &ModuleId) -> Option<&TrainingModule> {
        self.modules.iter().find(|m| m.id() == id)
    }

    /// Looks a scenario up by its id across all modules.
    #[must_use]
    pub fn scenario(&self, id: &str) -> Option<Arc<Scenario>> {
        self.modules
            .iter()
            .flat_map(|m| m.scenarios.iter())
            .find(|s| s.id().as_str() == id)
            .cloned()
    }

    /// The module recommended after completing `id`; `None` after the last one.
    #[must_use]
    pub fn next_module(&self, id: &ModuleId) -> Option<&TrainingModule> {
        let pos = self.modules.iter().position(|m| m.id() == id)?;
        self.modules.get(pos + 1)
    }
}

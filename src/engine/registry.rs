//! Command registry.
//!
//! Maps aliases to descriptors. Built once at startup by
//! [`crate::engine::catalog::builtin_registry`] and shared read-only while
//! serving; tests build their own isolated instances.

use super::catalog;
use super::invoke::CommandBody;
use super::parsing::ParseStrategy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// One invocable command kind.
pub struct CommandDescriptor {
    name: String,
    description: String,
    aliases: Vec<String>,
    is_default: bool,
    strategy: ParseStrategy,
    skip_first: bool,
    body: Arc<dyn CommandBody>,
}

impl CommandDescriptor {
    pub fn new(name: &str, body: impl CommandBody + 'static) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            aliases: Vec::new(),
            is_default: false,
            strategy: ParseStrategy::Raw,
            skip_first: true,
            body: Arc::new(body),
        }
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Aliases are stored lower-cased; lookups lower-case the typed token.
    pub fn aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases = aliases.iter().map(|a| a.to_lowercase()).collect();
        self
    }

    pub fn strategy(mut self, strategy: ParseStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn default_command(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn declared_aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn parse_strategy(&self) -> ParseStrategy {
        self.strategy
    }

    pub fn skips_first(&self) -> bool {
        self.skip_first
    }

    pub(crate) fn body(&self) -> &dyn CommandBody {
        self.body.as_ref()
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("is_default", &self.is_default)
            .field("strategy", &self.strategy)
            .field("skip_first", &self.skip_first)
            .finish()
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command descriptor has an empty name")]
    EmptyName,
    #[error("invalid alias {alias:?} for command {command}")]
    InvalidAlias { command: String, alias: String },
    #[error("default command {0} has no aliases")]
    DefaultWithoutAliases(String),
}

pub struct Registry {
    descriptors: Vec<Arc<CommandDescriptor>>,
    by_alias: HashMap<String, Arc<CommandDescriptor>>,
    default: Option<Arc<CommandDescriptor>>,
    help: Arc<CommandDescriptor>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Empty registry. Only the built-in help descriptor exists, unregistered.
    pub fn new() -> Self {
        Self {
            descriptors: Vec::new(),
            by_alias: HashMap::new(),
            default: None,
            help: Arc::new(catalog::help_descriptor()),
        }
    }

    pub fn register(
        &mut self,
        descriptor: impl Into<Arc<CommandDescriptor>>,
    ) -> Result<Arc<CommandDescriptor>, RegistryError> {
        let descriptor = descriptor.into();
        validate(&descriptor)?;

        if !self.descriptors.iter().any(|d| Arc::ptr_eq(d, &descriptor)) {
            self.descriptors.push(descriptor.clone());
        }
        for alias in &descriptor.aliases {
            if let Some(previous) = self.by_alias.insert(alias.clone(), descriptor.clone()) {
                if !Arc::ptr_eq(&previous, &descriptor) {
                    tracing::debug!(
                        alias = %alias,
                        from = %previous.name,
                        to = %descriptor.name,
                        "alias reassigned"
                    );
                }
            }
        }
        if descriptor.is_default {
            if let Some(previous) = &self.default {
                tracing::debug!(from = %previous.name, to = %descriptor.name, "default command replaced");
            }
            self.default = Some(descriptor.clone());
        }
        Ok(descriptor)
    }

    pub fn lookup(&self, alias: &str) -> Option<&Arc<CommandDescriptor>> {
        self.by_alias.get(alias)
    }

    pub fn fallback(&self) -> Arc<CommandDescriptor> {
        self.default.clone().unwrap_or_else(|| self.help.clone())
    }

    pub fn help(&self) -> Arc<CommandDescriptor> {
        self.help.clone()
    }

    pub fn default_descriptor(&self) -> Option<&Arc<CommandDescriptor>> {
        self.default.as_ref()
    }

    /// Registered descriptors in registration order, each with the full alias
    /// set it was registered with.
    pub fn all_descriptors_with_aliases(&self) -> Vec<(Arc<CommandDescriptor>, Vec<String>)> {
        self.descriptors
            .iter()
            .map(|d| (d.clone(), d.aliases.clone()))
            .collect()
    }

    /// Aliases of `descriptor` that a lookup currently routes to it.
    pub fn resolving_aliases(&self, descriptor: &Arc<CommandDescriptor>) -> Vec<String> {
        descriptor
            .aliases
            .iter()
            .filter(|a| {
                self.by_alias
                    .get(a.as_str())
                    .map(|owner| Arc::ptr_eq(owner, descriptor))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

fn validate(descriptor: &CommandDescriptor) -> Result<(), RegistryError> {
    if descriptor.name.trim().is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if let Some(bad) = descriptor
        .aliases
        .iter()
        .find(|a| a.is_empty() || a.chars().any(char::is_whitespace))
    {
        return Err(RegistryError::InvalidAlias {
            command: descriptor.name.clone(),
            alias: bad.clone(),
        });
    }
    if descriptor.is_default && descriptor.aliases.is_empty() {
        return Err(RegistryError::DefaultWithoutAliases(descriptor.name.clone()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{CommandDescriptor, Registry, RegistryError};
    use crate::engine::catalog::{builtin_registry, Help, SearchRedirect};
    use std::sync::Arc;

    fn engine(name: &str, aliases: &[&str]) -> CommandDescriptor {
        CommandDescriptor::new(name, SearchRedirect::new("https://example.com/", "q"))
            .aliases(aliases)
    }

    #[test]
    fn every_builtin_alias_resolves_to_its_declarer() {
        let registry = builtin_registry().expect("builtin registry");
        for (descriptor, aliases) in registry.all_descriptors_with_aliases() {
            for alias in descriptor.declared_aliases() {
                let found = registry.lookup(&alias.to_lowercase()).expect("alias registered");
                assert!(Arc::ptr_eq(found, &descriptor), "alias {alias}");
                assert!(aliases.contains(alias));
            }
            assert_eq!(registry.resolving_aliases(&descriptor), aliases);
        }
    }

    #[test]
    fn aliases_are_stored_lowercase() {
        let mut registry = Registry::new();
        registry.register(engine("upper", &["UP"])).unwrap();
        assert!(registry.lookup("up").is_some());
        assert!(registry.lookup("UP").is_none());
    }

    #[test]
    fn later_registration_wins_shared_alias() {
        let mut registry = Registry::new();
        let first = registry.register(engine("first", &["x", "one"])).unwrap();
        let second = registry.register(engine("second", &["x"])).unwrap();

        assert!(Arc::ptr_eq(registry.lookup("x").unwrap(), &second));
        assert!(Arc::ptr_eq(registry.lookup("one").unwrap(), &first));

        let listing = registry.all_descriptors_with_aliases();
        assert_eq!(listing[0].0.name(), "first");
        assert_eq!(listing[0].1, vec!["x".to_string(), "one".to_string()]);
        assert_eq!(listing[1].1, vec!["x".to_string()]);

        assert_eq!(registry.resolving_aliases(&first), vec!["one".to_string()]);
        assert_eq!(registry.resolving_aliases(&second), vec!["x".to_string()]);
    }

    #[test]
    fn second_default_replaces_first() {
        let mut registry = Registry::new();
        registry.register(engine("a", &["a"]).default_command()).unwrap();
        let b = registry.register(engine("b", &["b"]).default_command()).unwrap();
        assert!(Arc::ptr_eq(registry.default_descriptor().unwrap(), &b));
        assert!(Arc::ptr_eq(&registry.fallback(), &b));
    }

    #[test]
    fn fallback_without_default_is_help() {
        let registry = Registry::new();
        assert_eq!(registry.fallback().name(), "help");
        assert!(registry.is_empty());
    }

    #[test]
    fn registering_same_descriptor_twice_is_idempotent() {
        let mut registry = Registry::new();
        let help = registry.help();
        registry.register(help.clone()).unwrap();
        registry.register(help).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn misconfigured_descriptors_fail_at_registration() {
        let mut registry = Registry::new();
        assert_eq!(
            registry
                .register(CommandDescriptor::new("orphan", Help).default_command())
                .unwrap_err(),
            RegistryError::DefaultWithoutAliases("orphan".to_string())
        );
        assert!(matches!(
            registry.register(engine("spaced", &["a b"])),
            Err(RegistryError::InvalidAlias { .. })
        ));
        assert_eq!(
            registry.register(engine(" ", &["z"])).unwrap_err(),
            RegistryError::EmptyName
        );
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn documentation_only_descriptor_is_listed_but_unreachable() {
        let mut registry = Registry::new();
        registry.register(engine("hidden", &[])).unwrap();
        let listing = registry.all_descriptors_with_aliases();
        assert_eq!(listing.len(), 1);
        assert!(listing[0].1.is_empty());
    }
}

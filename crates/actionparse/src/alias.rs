//! Alias canonicalization and per-action alias tables.

use std::sync::Arc;

use indexmap::IndexMap;

use crate::error::SchemaError;
use crate::option::OptionDef;

/// Turn a user-supplied option name into its flag spelling.
///
/// Leading dashes and surrounding whitespace are ignored, so `n`, `-n` and
/// `--n` all become `-n`; `name` becomes `--name`. Returns `None` for names
/// that are empty after trimming or contain whitespace or `=`, which separates
/// an inline value on the command line.
pub fn canonicalize(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('-');
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_whitespace() || c == '=') {
        return None;
    }
    if trimmed.chars().count() == 1 {
        Some(format!("-{trimmed}"))
    } else {
        Some(format!("--{trimmed}"))
    }
}

/// Alias table plus the ordered list of unique options of one action.
#[derive(Debug, Clone, Default)]
pub struct OptionSet {
    aliases: IndexMap<String, usize>,
    options: Vec<Arc<OptionDef>>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options in registration order.
    pub fn options(&self) -> &[Arc<OptionDef>] {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Resolve a canonical alias (`-n`, `--name`).
    pub fn lookup(&self, alias: &str) -> Option<&Arc<OptionDef>> {
        self.index_of(alias).map(|idx| &self.options[idx])
    }

    pub fn index_of(&self, alias: &str) -> Option<usize> {
        self.aliases.get(alias).copied()
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.aliases.contains_key(alias)
    }

    /// All registered aliases with the registration index of their option.
    pub fn alias_entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.aliases.iter().map(|(a, idx)| (a.as_str(), *idx))
    }

    /// Verify that `option` could be registered without alias collisions.
    pub fn check(&self, option: &OptionDef, owner: &str) -> Result<(), SchemaError> {
        for alias in option.aliases() {
            if let Some(&idx) = self.aliases.get(alias) {
                if !std::ptr::eq(self.options[idx].as_ref(), option) {
                    return Err(SchemaError::DuplicateOption {
                        alias: alias.clone(),
                        action: owner.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Insert every alias of `option`. Re-registering the same instance is a no-op.
    pub fn register(&mut self, option: Arc<OptionDef>, owner: &str) -> Result<(), SchemaError> {
        self.check(&option, owner)?;
        if self.options.iter().any(|o| Arc::ptr_eq(o, &option)) {
            return Ok(());
        }
        let idx = self.options.len();
        for alias in option.aliases() {
            self.aliases.insert(alias.clone(), idx);
        }
        self.options.push(option);
        Ok(())
    }

    /// Drop options that fail `keep`, rebuilding the alias index.
    pub(crate) fn retain(&mut self, keep: impl Fn(&OptionDef) -> bool) {
        let options = std::mem::take(&mut self.options);
        self.aliases.clear();
        for option in options.into_iter().filter(|o| keep(o.as_ref())) {
            let idx = self.options.len();
            for alias in option.aliases() {
                self.aliases.insert(alias.clone(), idx);
            }
            self.options.push(option);
        }
    }
}

//! Block scope resolution of names to frame slots

use std::collections::HashMap;

use core_types::JsError;

use crate::program::Slot;

/// Lexical scopes of one generator body.
///
/// Every declaration gets its own slot, so a shadowing `let` in an inner
/// block never disturbs the outer binding.
#[derive(Debug, Default)]
pub struct ScopeChain {
    scopes: Vec<HashMap<String, Slot>>,
    slot_names: Vec<String>,
}

impl ScopeChain {
    /// Create a chain holding the function scope
    pub fn new() -> Self {
        ScopeChain {
            scopes: vec![HashMap::new()],
            slot_names: Vec::new(),
        }
    }

    /// Enter a block scope
    pub fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Exit the current block scope
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Declare a name in the current scope
    pub fn declare(&mut self, name: &str) -> Result<Slot, JsError> {
        let slot = Slot(self.slot_names.len() as u32);
        let scope = self
            .scopes
            .last_mut()
            .ok_or_else(|| JsError::syntax_error("no active scope"))?;
        if scope.contains_key(name) {
            return Err(JsError::syntax_error(format!(
                "Identifier '{}' has already been declared",
                name
            )));
        }
        scope.insert(name.to_string(), slot);
        self.slot_names.push(name.to_string());
        Ok(slot)
    }

    /// Resolve a name, innermost scope first
    pub fn resolve(&self, name: &str) -> Result<Slot, JsError> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
            .ok_or_else(|| JsError::reference_error(format!("{} is not defined", name)))
    }

    /// Current nesting level (the function scope is 0)
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    /// Consume the chain, returning slot names in slot order
    pub fn into_slot_names(self) -> Vec<String> {
        self.slot_names
    }
}

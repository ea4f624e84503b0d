//! System-symbol oracle
//!
//! The host supplies a total lookup from identifier names to symbol
//! metadata. Only operator descriptors feed the Pratt loop; constants and
//! functions are carried on the identifier node for later phases.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Precedence used for oracle operators that omit one: the multiplication
/// level of the built-in ladder.
pub const DEFAULT_OPERATOR_PRECEDENCE: u8 = 90;

/// What kind of thing a system name denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SystemKind {
    Function,
    Constant,
    Operator,
    Identifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Associativity {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OperatorKind {
    #[default]
    Infix,
    Prefix,
    Postfix,
}

/// Descriptor returned by the oracle for a system name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub kind: SystemKind,
    pub precedence: Option<u8>,
    pub associativity: Option<Associativity>,
    pub operator_kind: Option<OperatorKind>,
}

impl SystemInfo {
    pub fn identifier() -> Self {
        Self {
            kind: SystemKind::Identifier,
            precedence: None,
            associativity: None,
            operator_kind: None,
        }
    }

    pub fn constant() -> Self {
        Self {
            kind: SystemKind::Constant,
            ..Self::identifier()
        }
    }

    pub fn function() -> Self {
        Self {
            kind: SystemKind::Function,
            ..Self::identifier()
        }
    }

    pub fn infix(precedence: u8) -> Self {
        Self {
            kind: SystemKind::Operator,
            precedence: Some(precedence),
            associativity: None,
            operator_kind: Some(OperatorKind::Infix),
        }
    }

    pub fn prefix(precedence: u8) -> Self {
        Self {
            operator_kind: Some(OperatorKind::Prefix),
            ..Self::infix(precedence)
        }
    }

    pub fn postfix(precedence: u8) -> Self {
        Self {
            operator_kind: Some(OperatorKind::Postfix),
            ..Self::infix(precedence)
        }
    }

    pub fn with_associativity(mut self, associativity: Associativity) -> Self {
        self.associativity = Some(associativity);
        self
    }

    /// The oracle adapter: collapse a descriptor into the concrete operator
    /// shape the Pratt loop consumes, filling in defaults. Non-operator
    /// descriptors yield `None`.
    pub fn operator_info(&self) -> Option<OperatorInfo> {
        if self.kind != SystemKind::Operator {
            return None;
        }
        Some(OperatorInfo {
            precedence: self.precedence.unwrap_or(DEFAULT_OPERATOR_PRECEDENCE),
            associativity: self.associativity.unwrap_or_default(),
            kind: self.operator_kind.unwrap_or_default(),
        })
    }
}

/// Parser-visible operator descriptor with all defaults applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    pub precedence: u8,
    pub associativity: Associativity,
    pub kind: OperatorKind,
}

/// The oracle seam: a pure, total lookup. Unknown names must come back as
/// plain identifiers.
pub trait SystemLookup {
    fn lookup(&self, name: &str) -> SystemInfo;
}

impl<F> SystemLookup for F
where
    F: Fn(&str) -> SystemInfo,
{
    fn lookup(&self, name: &str) -> SystemInfo {
        self(name)
    }
}

/// Map-backed oracle, convenient for hosts with a fixed symbol set
#[derive(Debug, Clone, Default)]
pub struct SystemRegistry {
    entries: BTreeMap<String, SystemInfo>,
}

impl SystemRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, info: SystemInfo) {
        self.entries.insert(name.into(), info);
    }

    pub fn with(mut self, name: impl Into<String>, info: SystemInfo) -> Self {
        self.insert(name, info);
        self
    }
}

impl SystemLookup for SystemRegistry {
    fn lookup(&self, name: &str) -> SystemInfo {
        self.entries
            .get(name)
            .cloned()
            .unwrap_or_else(SystemInfo::identifier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_total() {
        let registry = SystemRegistry::new();
        assert_eq!(registry.lookup("UNKNOWN").kind, SystemKind::Identifier);
    }

    #[test]
    fn test_operator_defaults() {
        let info = SystemInfo {
            kind: SystemKind::Operator,
            precedence: None,
            associativity: None,
            operator_kind: None,
        };
        let op = info.operator_info().unwrap();
        assert_eq!(op.precedence, DEFAULT_OPERATOR_PRECEDENCE);
        assert_eq!(op.associativity, Associativity::Left);
        assert_eq!(op.kind, OperatorKind::Infix);
    }

    #[test]
    fn test_non_operator_has_no_operator_info() {
        assert!(SystemInfo::constant().operator_info().is_none());
        assert!(SystemInfo::function().operator_info().is_none());
    }

    #[test]
    fn test_closure_oracle() {
        let oracle = |name: &str| {
            if name == "AND" {
                SystemInfo::infix(40)
            } else {
                SystemInfo::identifier()
            }
        };
        assert_eq!(oracle.lookup("AND").operator_info().unwrap().precedence, 40);
        assert_eq!(oracle.lookup("other").kind, SystemKind::Identifier);
    }
}

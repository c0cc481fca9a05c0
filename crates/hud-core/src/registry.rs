//! Immutable table of named states and their parameter bundles.

use crate::bundle::ParameterBundle;
use crate::error::{ConfigError, HudError};
use fnv::FnvHashMap;
use std::fmt;
use std::sync::Arc;

/// Index of a state inside its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(usize);

impl StateId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct StateDef {
    pub name: Arc<str>,
    pub label: Arc<str>,
    pub bundle: ParameterBundle,
}

#[derive(Clone, Debug)]
pub struct StateRegistry {
    states: Vec<StateDef>,
    index: FnvHashMap<String, StateId>,
    default_state: StateId,
}

impl StateRegistry {
    pub fn builder() -> StateRegistryBuilder {
        StateRegistryBuilder::default()
    }

    pub fn resolve(&self, name: &str) -> Result<StateId, HudError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| HudError::UnknownState {
                name: name.to_string(),
                known: self.names().collect::<Vec<_>>().join(", "),
            })
    }

    pub fn get_bundle(&self, name: &str) -> Result<&ParameterBundle, HudError> {
        self.resolve(name).map(|id| self.bundle(id))
    }

    pub fn bundle(&self, id: StateId) -> &ParameterBundle {
        &self.states[id.0].bundle
    }

    pub fn name(&self, id: StateId) -> &Arc<str> {
        &self.states[id.0].name
    }

    pub fn label(&self, id: StateId) -> &Arc<str> {
        &self.states[id.0].label
    }

    pub fn default_state(&self) -> StateId {
        self.default_state
    }

    /// Id of the `n`th state in declaration order.
    pub fn nth(&self, n: usize) -> Option<StateId> {
        (n < self.states.len()).then_some(StateId(n))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.states.iter().map(|s| &*s.name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StateId, &StateDef)> + '_ {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }
}

#[derive(Clone, Debug, Default)]
pub struct StateRegistryBuilder {
    states: Vec<StateDef>,
    default_state: Option<String>,
}

impl StateRegistryBuilder {
    /// Adds a state. An empty label falls back to the upper-cased name.
    pub fn state(mut self, name: &str, label: &str, bundle: ParameterBundle) -> Self {
        let label = if label.is_empty() {
            name.to_uppercase()
        } else {
            label.to_string()
        };
        self.states.push(StateDef {
            name: Arc::from(name),
            label: Arc::from(label),
            bundle,
        });
        self
    }

    /// Picks the initial state; the first declared state otherwise.
    pub fn default_state(mut self, name: &str) -> Self {
        self.default_state = Some(name.to_string());
        self
    }

    pub fn build(self) -> Result<StateRegistry, ConfigError> {
        if self.states.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        let mut index = FnvHashMap::default();
        for (i, def) in self.states.iter().enumerate() {
            if let Some(field) = def.bundle.non_finite_field() {
                return Err(ConfigError::NonFiniteField {
                    state: def.name.to_string(),
                    field,
                });
            }
            if index.insert(def.name.to_string(), StateId(i)).is_some() {
                return Err(ConfigError::DuplicateState(def.name.to_string()));
            }
        }
        let default_state = match self.default_state {
            Some(name) => *index
                .get(&name)
                .ok_or(ConfigError::MissingDefaultState(name))?,
            None => StateId(0),
        };
        Ok(StateRegistry {
            states: self.states,
            index,
            default_state,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(intensity: f32) -> ParameterBundle {
        ParameterBundle {
            sphere_intensity: intensity,
            ..ParameterBundle::default()
        }
    }

    #[test]
    fn resolves_names_and_reports_unknown() {
        let reg = StateRegistry::builder()
            .state("idle", "STANDBY", bundle(0.4))
            .state("active", "", bundle(0.8))
            .build()
            .unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.default_state(), reg.resolve("idle").unwrap());
        assert_eq!(reg.get_bundle("active").unwrap().sphere_intensity, 0.8);
        assert_eq!(&**reg.label(reg.resolve("active").unwrap()), "ACTIVE");
        match reg.resolve("bogus") {
            Err(HudError::UnknownState { name, known }) => {
                assert_eq!(name, "bogus");
                assert_eq!(known, "idle, active");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_invalid_tables() {
        assert!(matches!(
            StateRegistry::builder().build(),
            Err(ConfigError::EmptyRegistry)
        ));
        assert!(matches!(
            StateRegistry::builder()
                .state("idle", "", bundle(0.1))
                .state("idle", "", bundle(0.2))
                .build(),
            Err(ConfigError::DuplicateState(n)) if n == "idle"
        ));
        assert!(matches!(
            StateRegistry::builder()
                .state("idle", "", bundle(f32::NAN))
                .build(),
            Err(ConfigError::NonFiniteField { field: "sphere_intensity", .. })
        ));
        assert!(matches!(
            StateRegistry::builder()
                .state("idle", "", bundle(0.1))
                .default_state("sleep")
                .build(),
            Err(ConfigError::MissingDefaultState(n)) if n == "sleep"
        ));
    }

    #[test]
    fn explicit_default_state_is_honoured() {
        let reg = StateRegistry::builder()
            .state("idle", "", bundle(0.4))
            .state("active", "", bundle(0.8))
            .default_state("active")
            .build()
            .unwrap();
        assert_eq!(&**reg.name(reg.default_state()), "active");
        assert_eq!(reg.nth(1), Some(reg.default_state()));
        assert_eq!(reg.nth(2), None);
    }
}

//! Plug-in registry for scenarios and intelligences.
//!
//! An explicit, statically-populated table mapping short names to the
//! spec/factory objects behind the `Scenario` and `Intelligence` seams.
//! The registry is built once at startup by [`Registry::builtin`] and
//! passed by reference into commands; names are resolved exactly once,
//! before any simulation work, and never re-resolved mid-run.

use std::collections::BTreeMap;

use anyhow::anyhow;
use swarmevo_intelligence::{flocking::FlockingSpec, seeker::SeekerSpec};
use swarmevo_sim::{FreeRoamSpec, IntelligenceSpec, ScenarioSpec, TargetChaseSpec};

/// Name-keyed tables of the available scenario and intelligence kinds.
pub struct Registry {
    scenarios: BTreeMap<&'static str, Box<dyn ScenarioSpec>>,
    intelligences: BTreeMap<&'static str, Box<dyn IntelligenceSpec>>,
}

impl Registry {
    /// Builds the registry of everything shipped with this binary.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self {
            scenarios: BTreeMap::new(),
            intelligences: BTreeMap::new(),
        };
        registry.register_scenario(Box::new(FreeRoamSpec));
        registry.register_scenario(Box::new(TargetChaseSpec));
        registry.register_intelligence(Box::new(FlockingSpec));
        registry.register_intelligence(Box::new(SeekerSpec));
        registry
    }

    fn register_scenario(&mut self, spec: Box<dyn ScenarioSpec>) {
        self.scenarios.insert(spec.name(), spec);
    }

    fn register_intelligence(&mut self, spec: Box<dyn IntelligenceSpec>) {
        self.intelligences.insert(spec.name(), spec);
    }

    /// Resolves a scenario name, or fails listing what is available.
    pub fn scenario(&self, name: &str) -> anyhow::Result<&dyn ScenarioSpec> {
        self.scenarios
            .get(name)
            .map(|spec| spec.as_ref())
            .ok_or_else(|| {
                anyhow!(
                    "unknown scenario {name:?} (available: {})",
                    self.scenario_names().collect::<Vec<_>>().join(", ")
                )
            })
    }

    /// Resolves an intelligence name, or fails listing what is available.
    pub fn intelligence(&self, name: &str) -> anyhow::Result<&dyn IntelligenceSpec> {
        self.intelligences
            .get(name)
            .map(|spec| spec.as_ref())
            .ok_or_else(|| {
                anyhow!(
                    "unknown intelligence {name:?} (available: {})",
                    self.intelligence_names().collect::<Vec<_>>().join(", ")
                )
            })
    }

    pub fn scenario_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.scenarios.keys().copied()
    }

    pub fn intelligence_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.intelligences.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names() {
        let registry = Registry::builtin();
        let scenarios: Vec<_> = registry.scenario_names().collect();
        let intelligences: Vec<_> = registry.intelligence_names().collect();
        assert_eq!(scenarios, vec!["free_roam", "target_chase"]);
        assert_eq!(intelligences, vec!["flocking", "seeker"]);
    }

    #[test]
    fn test_lookup_known_names() {
        let registry = Registry::builtin();
        assert_eq!(registry.scenario("free_roam").unwrap().name(), "free_roam");
        assert_eq!(
            registry.intelligence("flocking").unwrap().weight_len(),
            7
        );
    }

    #[test]
    fn test_unknown_names_list_alternatives() {
        let registry = Registry::builtin();
        let err = registry.scenario("warehouse").err().unwrap().to_string();
        assert!(err.contains("warehouse"));
        assert!(err.contains("free_roam"));
        let err = registry.intelligence("psychic").err().unwrap().to_string();
        assert!(err.contains("seeker"));
    }
}

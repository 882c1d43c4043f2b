use crate::registry::Registry;

pub(crate) fn run(registry: &Registry) {
    println!("Available scenarios:");
    for name in registry.scenario_names() {
        println!("  - {name}");
    }
    println!();
    println!("Available intelligences:");
    for name in registry.intelligence_names() {
        println!("  - {name}");
    }
}

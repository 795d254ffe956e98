use std::collections::{HashMap, HashSet};

use node_plugin::node::{ExecutorKind, PortId, ProcessContext, Project};
use node_plugin::registry::NodeRegistry;
use node_plugin::plugin::NodePlugin;
use node_plugin::value::{DataValue, Inputs};
use node_plugin::NodeError;
use script_nodes::{plugin, PLUGIN_ID};
use serde_json::json;

fn registry_with_plugin() -> NodeRegistry {
    let registry = NodeRegistry::new();
    plugin().register(&registry).expect("plugin registers once");
    registry
}

#[test]
fn manifest_describes_the_plugin() {
    let manifest = plugin().manifest();
    assert_eq!(manifest.id, PLUGIN_ID);
    assert_eq!(manifest.name, "Script Nodes");
    assert_eq!(manifest.options.len(), 1);
    assert_eq!(manifest.options[0].key, "pythonPath");
    assert_eq!(manifest.groups[0].id, "scripting");
}

#[test]
fn plugin_registers_both_nodes() {
    let registry = registry_with_plugin();
    let mut types = registry.type_names();
    types.sort();
    assert_eq!(types, vec!["echo", "runScript"]);
}

#[test]
fn second_activation_is_rejected() {
    let registry = registry_with_plugin();
    let err = plugin().register(&registry).unwrap_err();
    assert!(matches!(err, NodeError::DuplicateNodeType(_)));
}

#[test]
fn created_instances_carry_defaults() {
    let registry = registry_with_plugin();

    let echo = registry.create("echo").unwrap();
    assert_eq!(echo.data["text"], json!("Hello World"));
    assert_eq!(echo.visual.width, 200.0);

    let run = registry.create("runScript").unwrap();
    assert_eq!(run.data["scriptPath"], json!(""));
    assert_eq!(run.data["arguments"], json!(""));

    assert_ne!(echo.id, run.id);
}

#[test]
fn port_derivation_follows_the_instance_configuration() {
    let registry = registry_with_plugin();
    let mut node = registry.create("runScript").unwrap();

    let project = Project::default();
    let none = registry
        .input_ports(&node, &[], &HashMap::new(), &project)
        .unwrap();
    assert!(none.is_empty());

    node.data["useScriptPathInput"] = json!(true);
    node.data["useArgumentsInput"] = json!(true);
    let ports = registry
        .input_ports(&node, &[], &HashMap::new(), &project)
        .unwrap();
    let ids: HashSet<&str> = ports.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, HashSet::from(["scriptPath", "arguments"]));

    let outputs = registry
        .output_ports(&node, &[], &HashMap::new(), &project)
        .unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[0].id.as_str(), "output");
}

#[tokio::test]
async fn echo_processes_under_any_executor() {
    let registry = registry_with_plugin();
    let node = registry.create("echo").unwrap();

    for executor in [ExecutorKind::Embedded, ExecutorKind::Native] {
        let outputs = registry
            .process(&node, &Inputs::new(), &ProcessContext::new(executor))
            .await
            .unwrap();
        assert_eq!(
            outputs.get("text"),
            Some(&DataValue::String("Hello World".into()))
        );
    }
}

#[tokio::test]
async fn run_script_needs_the_native_executor() {
    let registry = registry_with_plugin();
    let node = registry.create("runScript").unwrap();

    let err = registry
        .process(&node, &Inputs::new(), &ProcessContext::new(ExecutorKind::Embedded))
        .await
        .unwrap_err();
    assert!(matches!(err, NodeError::UnsupportedExecutor { .. }));
}

#[tokio::test]
async fn bound_echo_input_overrides_stored_text() {
    let registry = registry_with_plugin();
    let mut node = registry.create("echo").unwrap();
    node.data["useTextInput"] = json!(true);

    let mut inputs = Inputs::new();
    inputs.insert(PortId::from("text"), DataValue::String("bound".into()));
    let outputs = registry
        .process(&node, &inputs, &ProcessContext::new(ExecutorKind::Embedded))
        .await
        .unwrap();
    assert_eq!(outputs.get("text"), Some(&DataValue::String("bound".into())));
}

#[test]
fn every_node_publishes_a_data_schema() {
    let registry = registry_with_plugin();
    let schemas = registry.data_schemas();
    assert_eq!(schemas.len(), 2);
    for (tag, schema) in schemas {
        assert!(
            schema.get("properties").is_some(),
            "schema for {tag} has no properties"
        );
    }
}

#[test]
fn bodies_never_fail_on_odd_data() {
    let registry = registry_with_plugin();
    for tag in ["echo", "runScript"] {
        let mut node = registry.create(tag).unwrap();
        node.data = json!("not an object");
        // Lenient summaries, no panic.
        let _ = registry.body(&node).unwrap();
    }
}

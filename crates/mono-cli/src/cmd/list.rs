use crate::output::{print_json, print_table};
use mono_core::config::{ActionConfig, NamespaceConfig};
use mono_core::launcher::program_available;
use mono_core::{paths, Config};
use std::path::Path;

pub fn run(config: &Config, root: &Path, json: bool) -> anyhow::Result<()> {
    if json {
        print_json(&table_json(config, root))?;
        return Ok(());
    }

    if config.namespaces.is_empty() {
        println!("No namespaces configured.");
    } else {
        let rows: Vec<Vec<String>> = config
            .namespaces
            .iter()
            .flat_map(|ns| ns.actions.iter().map(move |a| action_row(root, ns, a)))
            .collect();
        print_table(&["COMMAND", "ROOT", "RUNS"], rows);
    }

    if !config.composites.is_empty() {
        println!();
        let rows: Vec<Vec<String>> = config
            .composites
            .iter()
            .map(|c| {
                let steps: Vec<String> = c.steps.iter().map(|s| s.to_string()).collect();
                vec![c.name.clone(), steps.join(", ")]
            })
            .collect();
        print_table(&["COMPOSITE", "STEPS"], rows);
    }

    println!();
    println!("Run: mono <namespace> <action> [args...] | mono <composite>");
    Ok(())
}

fn action_row(root: &Path, ns: &NamespaceConfig, action: &ActionConfig) -> Vec<String> {
    let mut runs = action.command.to_string();
    if !is_available(root, ns, action) {
        runs.push_str("  (not found)");
    }
    vec![action.usage(&ns.name), ns.root.display().to_string(), runs]
}

fn is_available(root: &Path, ns: &NamespaceConfig, action: &ActionConfig) -> bool {
    action
        .command
        .program()
        .is_some_and(|p| program_available(&p, &paths::namespace_dir(root, &ns.root)))
}

fn table_json(config: &Config, root: &Path) -> serde_json::Value {
    let namespaces: Vec<serde_json::Value> = config
        .namespaces
        .iter()
        .map(|ns| {
            let actions: Vec<serde_json::Value> = ns
                .actions
                .iter()
                .map(|a| {
                    serde_json::json!({
                        "name": a.name,
                        "usage": a.usage(&ns.name),
                        "command": a.command.to_string(),
                        "description": a.description,
                        "available": is_available(root, ns, a),
                    })
                })
                .collect();
            serde_json::json!({
                "name": ns.name,
                "root": ns.root,
                "description": ns.description,
                "actions": actions,
            })
        })
        .collect();

    let composites: Vec<serde_json::Value> = config
        .composites
        .iter()
        .map(|c| {
            let steps: Vec<String> = c.steps.iter().map(|s| s.to_string()).collect();
            serde_json::json!({
                "name": c.name,
                "description": c.description,
                "steps": steps,
            })
        })
        .collect();

    serde_json::json!({
        "root": root,
        "namespaces": namespaces,
        "composites": composites,
    })
}

use crate::output::print_json;
use mono_core::config::{ConfigWarning, WarnLevel};
use mono_core::Config;

/// `mono --validate`: print every finding. Exit 1 when any is an error.
pub fn run(config: &Config, json: bool) -> anyhow::Result<i32> {
    let warnings = config.validate();

    if json {
        let value = serde_json::json!({
            "warnings": warnings,
        });
        print_json(&value)?;
    } else if warnings.is_empty() {
        println!("Command table is valid. No warnings.");
    } else {
        for w in &warnings {
            println!("[{}] {}", level_name(&w.level), w.message);
        }
    }

    Ok(if has_errors(&warnings) { 1 } else { 0 })
}

/// Gate run before every dispatch: warnings are logged, errors abort.
pub fn ensure_dispatchable(config: &Config) -> anyhow::Result<()> {
    let warnings = config.validate();
    for w in warnings.iter().filter(|w| w.level == WarnLevel::Warning) {
        tracing::warn!("{}", w.message);
    }
    if has_errors(&warnings) {
        let messages: Vec<&str> = warnings
            .iter()
            .filter(|w| w.level == WarnLevel::Error)
            .map(|w| w.message.as_str())
            .collect();
        anyhow::bail!(
            "command table has errors:\n  {}\nRun: mono --validate",
            messages.join("\n  ")
        );
    }
    Ok(())
}

fn has_errors(warnings: &[ConfigWarning]) -> bool {
    warnings.iter().any(|w| w.level == WarnLevel::Error)
}

fn level_name(level: &WarnLevel) -> &'static str {
    match level {
        WarnLevel::Warning => "warning",
        WarnLevel::Error => "error",
    }
}

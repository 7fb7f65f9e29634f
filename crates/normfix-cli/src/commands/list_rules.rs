//! List rules command implementation.

use normfix::passes::pass_for;
use normfix::{PassId, RuleCode};

/// Runs the list-rules command.
pub fn run() {
    println!("Known rules:\n");
    println!(
        "{:<24} {:<9} {:<10} {:<5} Description",
        "Code", "Severity", "Fix", "Auto"
    );
    println!("{}", "-".repeat(80));

    for rule in RuleCode::ALL {
        let profile = rule.profile();
        println!(
            "{:<24} {:<9} {:<10} {:<5} {}",
            rule.as_str(),
            profile.severity.to_string(),
            profile.fix_complexity.to_string(),
            if profile.auto_fixable { "yes" } else { "no" },
            profile.description
        );
    }

    println!("\nPasses (run in this order):");
    for id in PassId::ORDER {
        let triggers: Vec<&str> = id.triggers().iter().map(|r| r.as_str()).collect();
        println!("  {:<17} {}", id.name(), pass_for(id).description());
        println!("  {:<17} fixes {}", "", triggers.join(", "));
    }

    println!("\nUnknown rule codes are reported as medium severity and never auto-fixed.");
}

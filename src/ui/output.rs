use std::path::Path;

use compart::config::ConfigWarning;
use compart::Partition;

pub fn print_config_warnings(warnings: &[ConfigWarning]) {
    for w in warnings {
        if let Some(line) = w.line {
            eprintln!("⚠ Unknown config key '{}' in {}:{}", w.key, w.file.display(), line);
        } else {
            eprintln!("⚠ Unknown config key '{}' in {}", w.key, w.file.display());
        }

        if let Some(suggestion) = &w.suggestion {
            eprintln!("   Did you mean '{}'?\n", suggestion);
        }
    }
}

/// Compartment table, one block per compartment in key order.
pub fn render_partition(partition: &Partition) -> String {
    let mut out = String::new();
    for compartment in &partition.compartments {
        out.push_str(&format!(
            "compartment {} ({}/, entry {}, {} sources)\n",
            compartment.key,
            compartment.name,
            compartment.entry_file.display(),
            compartment.members.len()
        ));
        for member in &compartment.members {
            let marker = if member == &compartment.entry_file { " *" } else { "" };
            out.push_str(&format!("  {}{}\n", member.display(), marker));
        }
    }
    if !partition.unassigned.is_empty() {
        out.push_str(&format!(
            "untrusted ({} sources, not rewritten)\n",
            partition.unassigned.len()
        ));
        for path in &partition.unassigned {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }
    out
}

pub fn print_diff(diff: Option<&str>) {
    if let Some(diff) = diff {
        print!("{}", diff);
    }
}

pub fn print_summary(label: &str, path: &Path) {
    println!("{}: {}", label, path.display());
}

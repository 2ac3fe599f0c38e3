//! Output formatting for CLI commands

use crate::pipeline::SessionSummary;

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Format a count with its share of `total` as a percentage
pub fn format_share(count: usize, total: usize) -> String {
    if total == 0 {
        return count.to_string();
    }
    format!("{count} ({:.1}%)", 100.0 * count as f64 / total as f64)
}

/// Print wins per player, draws and average game length
pub fn print_summary(summary: &SessionSummary) {
    print_kv("Games", &summary.games.to_string());
    for (name, wins) in &summary.wins {
        print_kv(&format!("{name} won"), &format_share(*wins, summary.games));
    }
    print_kv("Draws", &format_share(summary.draws, summary.games));
    print_kv(
        "Average length",
        &format!("{:.2} moves", summary.avg_game_length()),
    );
}

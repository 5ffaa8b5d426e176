//! Output formatting for CLI

use crate::{
    grid::Cell,
    pipeline::{BlockAverage, TrainingReport},
    session::{Rollout, RolloutEnd, Snapshot},
};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

pub fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

pub fn print_report(report: &TrainingReport) {
    print_kv("Episodes", &format_number(report.episodes));
    print_kv(
        "Reached goal",
        &format!(
            "{} ({})",
            format_number(report.successes),
            format_percent(report.success_rate)
        ),
    );
    print_kv("Stuck", &format_number(report.stuck));
    print_kv("Mean reward", &format!("{:.2}", report.mean_reward));
    print_kv("Mean steps", &format!("{:.1}", report.mean_steps));
    print_kv("Final epsilon", &format!("{:.4}", report.final_epsilon));
}

pub fn print_block_averages(blocks: &[BlockAverage]) {
    for block in blocks {
        println!(
            "  through {:>8}: reward {:>9.2}  steps {:>6.1}  goal {:>6}",
            format_number(block.through_episode),
            block.mean_reward,
            block.mean_steps,
            format_percent(block.success_rate),
        );
    }
}

pub fn print_rollout(rollout: &Rollout, snapshot: &Snapshot) {
    let end = match rollout.end {
        RolloutEnd::ReachedGoal { steps } => format!("reached goal in {steps} steps"),
        RolloutEnd::Stuck => "stuck: no open neighbour".to_string(),
        RolloutEnd::StepLimit => "step limit reached".to_string(),
        RolloutEnd::Busy => "session busy".to_string(),
    };
    print_kv("Outcome", &end);
    print_kv("Reward", &format!("{:.2}", rollout.reward));

    let path: Vec<String> = rollout.path.iter().map(ToString::to_string).collect();
    print_kv("Path", &path.join(" -> "));

    print_subsection("Grid");
    print!("{}", render_grid(snapshot, &rollout.path));
}

/// Text grid: `A` agent, `G` goal, `#` obstacle, `S` start, `*` path, `.` open
pub fn render_grid(snapshot: &Snapshot, path: &[Cell]) -> String {
    let size = snapshot.grid_size;
    let mut out = String::with_capacity(size * (size + 1));
    for row in 0..size {
        for col in 0..size {
            let cell = Cell::new(row, col);
            let glyph = if cell == snapshot.agent {
                'A'
            } else if cell == snapshot.goal {
                'G'
            } else if snapshot.obstacles.binary_search(&cell).is_ok() {
                '#'
            } else if cell == snapshot.start {
                'S'
            } else if path.contains(&cell) {
                '*'
            } else {
                '.'
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

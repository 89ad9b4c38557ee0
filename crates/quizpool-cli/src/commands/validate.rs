//! The `quizpool validate` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use quizpool_core::compose::compose;
use quizpool_core::model::Node;
use quizpool_core::parser;

pub fn execute(quiz: PathBuf) -> Result<()> {
    let raw = parser::parse_quiz(&quiz)?;
    let warnings = parser::validate_quiz(&raw);

    // A fixed seed: validation only cares about invariants, not which
    // subset a real session would draw.
    let root = compose(&raw, &mut StdRng::seed_from_u64(0))?;

    print_tree(&root);

    for warning in &warnings {
        println!(
            "Warning ({}): {}",
            warning.node.as_deref().unwrap_or("<quiz>"),
            warning.message
        );
    }

    println!(
        "{} exercises, max total score {}",
        root.leaves().len(),
        root.max_achievable()
    );
    println!("Quiz definition OK: {}", quiz.display());
    Ok(())
}

fn print_tree(root: &Node) {
    let mut table = Table::new();
    table.set_header(vec![
        "Path",
        "Kind",
        "Navigation",
        "Select",
        "Shuffle",
        "Max score",
    ]);

    for (node, _) in root.traverse() {
        match node {
            Node::Pool(p) => {
                table.add_row(vec![
                    Cell::new(&p.path),
                    Cell::new("pool"),
                    Cell::new(p.navigation.to_string()),
                    Cell::new(if p.select == 0 {
                        "all".to_string()
                    } else {
                        p.select.to_string()
                    }),
                    Cell::new(if p.shuffle { "yes" } else { "no" }),
                    Cell::new(format!("{}", node.max_achievable())),
                ]);
            }
            Node::Exercise(e) => {
                table.add_row(vec![
                    Cell::new(&e.path),
                    Cell::new("exercise"),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(""),
                    Cell::new(format!("{}", e.max_score)),
                ]);
            }
        }
    }

    println!("{table}");
}

//! Notebook materialization.
//!
//! Writes one `.ipynb` per exercise leaf into the render directory. Each
//! notebook carries a single bootstrap cell that imports the exercise from
//! its module, runs it, and posts the result message
//! `{type: "results", id, score, maxScore}` to the parent window. Pool
//! weights multiply down the hierarchy into the per-exercise weight.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{json, Value};

use quizpool_core::model::{Exercise, Node, Pool};

/// Materialize the whole tree under `dir`.
///
/// Files land at `<dir>/<path>.ipynb`, so a renderer serving `dir` exposes
/// each notebook at the exercise's frame URL.
pub fn write_notebook_tree(root: &Node, dir: &Path) -> Result<()> {
    write_node(root, dir, 1.0)
}

fn write_node(node: &Node, dir: &Path, base_weight: f64) -> Result<()> {
    match node {
        Node::Exercise(e) => write_exercise(e, dir, base_weight),
        Node::Pool(pool) => write_pool(pool, dir, base_weight),
    }
}

fn write_pool(pool: &Pool, dir: &Path, base_weight: f64) -> Result<()> {
    for (i, child) in pool.items.iter().enumerate() {
        let weight = pool.weights.get(i).copied().unwrap_or(1.0) * base_weight;
        write_node(child, dir, weight)?;
    }
    Ok(())
}

fn write_exercise(exercise: &Exercise, dir: &Path, weight: f64) -> Result<()> {
    // The exercise path carries every ancestor component.
    let file = dir.join(format!("{}.ipynb", exercise.path));
    if let Some(parent) = file.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let notebook = bootstrap_notebook(exercise, weight);
    let content =
        serde_json::to_string_pretty(&notebook).context("failed to serialize notebook")?;
    std::fs::write(&file, content)
        .with_context(|| format!("failed to write notebook {}", file.display()))?;
    tracing::debug!(path = %exercise.path, file = %file.display(), "notebook written");
    Ok(())
}

/// One nbformat-v4 notebook with the bootstrap cell.
fn bootstrap_notebook(exercise: &Exercise, weight: f64) -> Value {
    // The notebook runs from its own directory; the exercise modules live
    // at the render-directory root.
    let depth = exercise.path.matches('/').count();
    let ups = vec![".."; depth.max(1)].join("/");
    let id = serde_json::to_string(&exercise.path).expect("string serializes");

    let source = format!(
        r#"import sys, os, json
import ipywidgets as widgets
from IPython.display import Javascript, display
sys.path.insert(0, os.path.abspath(os.path.join(os.getcwd(), {ups:?})))
from {module} import {name}

outputspace = widgets.Output()
display(outputspace)

def postresult(score, max_score):
    message = {{"type": "results", "id": {id}, "score": score, "maxScore": max_score}}
    js_code = "window.parent.postMessage(" + json.dumps(message) + ", '*');"
    with outputspace:
        display(Javascript(js_code))

{name}(weights={weight}).run(callback=postresult)
"#,
        module = exercise.module,
        name = exercise.name,
    );

    json!({
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [{
            "cell_type": "code",
            "execution_count": null,
            "metadata": {},
            "outputs": [],
            "source": source,
        }]
    })
}

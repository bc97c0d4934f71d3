//! Shared utilities for Ripple benchmarks.

// Benchmark utilities - pedantic lints not critical here
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

/// Create a temporary project with the given files.
/// Returns the temp directory (must be kept alive) and the project path.
pub fn create_project(files: &[(String, String)]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");

    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }

    let path = dir.path().to_path_buf();
    (dir, path)
}

/// Generate a layered TypeScript project.
///
/// `src/index.ts` imports every module of layer 0; each module of layer `n`
/// imports two modules of layer `n + 1`. The last layer imports
/// `src/core/leaf.ts`, so changing the leaf reaches every file.
pub fn generate_layered_project(layers: usize, width: usize) -> Vec<(String, String)> {
    let mut files = Vec::new();

    let mut index = String::new();
    for w in 0..width {
        index.push_str(&format!("import {{ m0_{w} }} from './layer0/m{w}';\n"));
    }
    index.push_str("export const app = 1;\n");
    files.push(("src/index.ts".to_string(), index));

    for layer in 0..layers {
        for w in 0..width {
            let mut code = String::new();
            if layer + 1 < layers {
                let next = layer + 1;
                let a = w;
                let b = (w + 1) % width;
                code.push_str(&format!(
                    "import {{ m{next}_{a} }} from '../layer{next}/m{a}';\n\
                     import {{ m{next}_{b} }} from '../layer{next}/m{b}';\n"
                ));
            } else {
                code.push_str("import { leaf } from '../core/leaf';\n");
            }
            code.push_str(&format!(
                "export function m{layer}_{w}(input: number): number {{\n\
                     return input * {w};\n\
                 }}\n\
                 export const helper{w} = (x: number) => x + {layer};\n"
            ));
            files.push((format!("src/layer{layer}/m{w}.ts"), code));
        }
    }

    files.push((
        "src/core/leaf.ts".to_string(),
        "export const leaf = 42;\nexport default leaf;\n".to_string(),
    ));

    files
}

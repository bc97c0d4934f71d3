//! Alias configuration from tsconfig, `ripple.yaml` and explicit flags.

use std::fs;

use ripple::{Config, Error, FileIdentity, Ripple, parse_alias_flag};
use tempfile::TempDir;

fn create_project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent dirs");
        }
        fs::write(&full_path, content).expect("failed to write file");
    }
    dir
}

fn id(dir: &TempDir, path: &str) -> FileIdentity {
    FileIdentity::new(dir.path().join(path))
}

fn dependencies(config: Config, dir: &TempDir) -> Vec<FileIdentity> {
    let mut ripple = Ripple::new(config).expect("grammars should load");
    let project = ripple
        .build(&dir.path().join("src/index.ts"))
        .expect("build should succeed");
    project
        .graph()
        .dependencies(&id(dir, "src/index.ts"))
        .into_iter()
        .cloned()
        .collect()
}

#[test]
fn tsconfig_paths_become_aliases() {
    let dir = create_project(&[
        (
            "tsconfig.json",
            r#"{ "compilerOptions": { "baseUrl": ".", "paths": { "@/*": ["src/*"] } } }"#,
        ),
        ("src/index.ts", "import { api } from '@/services/api';\n"),
        ("src/services/api.ts", "export const api = 1;\n"),
    ]);

    let config = Config::load(dir.path(), None).expect("config should load");

    assert_eq!(
        dependencies(config, &dir),
        vec![id(&dir, "src/services/api.ts")]
    );
}

#[test]
fn yaml_aliases_override_tsconfig() {
    let dir = create_project(&[
        (
            "tsconfig.json",
            r#"{ "compilerOptions": { "paths": { "~/*": ["old/*"] } } }"#,
        ),
        ("ripple.yaml", "aliases:\n  \"~/\": src/shared/\n"),
        ("src/index.ts", "import { x } from '~/x';\n"),
        ("src/shared/x.ts", "export const x = 1;\n"),
        ("old/x.ts", "export const x = 0;\n"),
    ]);

    let config = Config::load(dir.path(), None).expect("config should load");

    assert_eq!(dependencies(config, &dir), vec![id(&dir, "src/shared/x.ts")]);
}

#[test]
fn flag_alias_resolves_prefix() {
    let dir = create_project(&[
        ("src/index.ts", "import { Button } from '@ui/button';\n"),
        ("src/components/button.tsx", "export const Button = () => <b />;\n"),
    ]);
    let (prefix, target) = parse_alias_flag("@ui/=src/components").expect("valid flag");

    let config = Config::load(dir.path(), None)
        .expect("config should load")
        .with_alias(prefix, &target);

    assert_eq!(
        dependencies(config, &dir),
        vec![id(&dir, "src/components/button.tsx")]
    );
}

#[test]
fn longest_alias_prefix_wins() {
    let dir = create_project(&[
        ("src/index.ts", "import '@/ui/card';\n"),
        ("src/ui/card.ts", "export {};\n"),
        ("design/card.ts", "export {};\n"),
    ]);

    let config = Config::load(dir.path(), None)
        .expect("config should load")
        .with_alias("@/", "src")
        .with_alias("@/ui/", "design");

    assert_eq!(dependencies(config, &dir), vec![id(&dir, "design/card.ts")]);
}

#[test]
fn commented_tsconfig_is_ignored() {
    let dir = create_project(&[
        (
            "tsconfig.json",
            "{\n  // comments are legal in tsconfig\n  \"compilerOptions\": {}\n}\n",
        ),
        ("src/index.ts", "import './a';\n"),
        ("src/a.ts", "export {};\n"),
    ]);

    let config = Config::load(dir.path(), None).expect("tsconfig errors are not fatal");

    assert!(config.aliases.is_empty());
    assert_eq!(dependencies(config, &dir), vec![id(&dir, "src/a.ts")]);
}

#[test]
fn malformed_yaml_is_fatal() {
    let dir = create_project(&[("ripple.yaml", "aliases: [unclosed\n")]);

    let err = Config::load(dir.path(), None).expect_err("bad yaml must fail");

    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn bare_specifiers_stay_unresolved_without_alias() {
    let dir = create_project(&[(
        "src/index.ts",
        "import React from 'react';\nimport { join } from 'node:path';\n",
    )]);
    let config = Config::load(dir.path(), None).expect("config should load");
    let mut ripple = Ripple::new(config).expect("grammars should load");

    let project = ripple
        .build(&dir.path().join("src/index.ts"))
        .expect("build should succeed");

    assert_eq!(project.graph().file_count(), 1);
    assert_eq!(project.stats().unresolved_imports.len(), 2);
}

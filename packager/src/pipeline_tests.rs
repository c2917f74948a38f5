//! Tests for pipeline orchestration.

use super::*;
use crate::error::PackagerError;
use crate::stager::{README_FILE, RELEASE_NOTES_URL, USER_MANUAL_URL};
use crate::test_utils::{ExpectedCall, PackagingTree, StubExecutor, failure_output};
use rstest::{fixture, rstest};
use std::fs;

const INSTALLER: &str = "blast-2.15.0-win64.exe";

#[fixture]
fn tree() -> PackagingTree {
    PackagingTree::new(&Manifest::blast(), INSTALLER).expect("create packaging tree")
}

fn context<'a>(
    tree: &'a PackagingTree,
    manifest: &'a Manifest,
    config: &'a PackagerConfig,
    verbose: bool,
) -> PipelineContext<'a> {
    PipelineContext {
        version: "2.15.0",
        install_dir: &tree.install_dir,
        work_dir: &tree.work_dir,
        manifest,
        config,
        verbose,
    }
}

#[rstest]
fn run_pipeline_produces_relocated_installer(tree: PackagingTree) {
    let manifest = Manifest::blast();
    let config = tree.config("makensis");
    let executor = StubExecutor::new(vec![ExpectedCall::compiles(
        "makensis",
        "ncbi-blast.nsi",
        INSTALLER,
    )]);
    let mut stderr = Vec::new();

    let installer = run_pipeline(&context(&tree, &manifest, &config, false), &executor, &mut stderr)
        .expect("pipeline should succeed");

    executor.assert_finished();
    assert_eq!(installer, tree.install_dir.join("installer").join(INSTALLER));
    assert!(installer.is_file());
    for name in manifest.iter() {
        assert!(tree.work_dir.join(name).is_file(), "{name} not staged");
    }

    let definition = fs::read_to_string(tree.work_dir.join("ncbi-blast.nsi")).expect("read");
    assert!(definition.contains("!define PRODUCT_VERSION \"2.15.0\"\n"));
    let source = fs::read_to_string(tree.resource_dir.join("ncbi-blast.nsi")).expect("read");
    assert!(source.contains("\"BLAST_VERSION\""), "source definition was modified");

    let readme = fs::read_to_string(tree.work_dir.join(README_FILE)).expect("read readme");
    let lines: Vec<&str> = readme.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains(USER_MANUAL_URL));
    assert!(lines[1].contains(RELEASE_NOTES_URL));
    assert!(stderr.is_empty());
}

#[rstest]
fn missing_binary_stops_before_compiling(tree: PackagingTree) {
    tree.remove_binary("deltablast.exe").expect("remove binary");
    let manifest = Manifest::blast();
    let config = tree.config("makensis");
    let executor = StubExecutor::new(Vec::new());
    let mut stderr = Vec::new();

    let err = run_pipeline(&context(&tree, &manifest, &config, false), &executor, &mut stderr)
        .expect_err("missing binary should fail");

    assert!(matches!(err, PackagerError::MissingBinary { ref name, .. } if name == "deltablast.exe"));
    assert!(!tree.work_dir.join("ncbi-blast.nsi").exists());
    assert!(!tree.install_dir.join("installer").exists());
}

#[rstest]
fn compiler_failure_skips_relocation(tree: PackagingTree) {
    let manifest = Manifest::blast();
    let config = tree.config("makensis");
    let executor = StubExecutor::new(vec![ExpectedCall {
        program: "makensis",
        args: vec!["ncbi-blast.nsi"],
        produces: None,
        result: Ok(failure_output("Error in script on line 12")),
    }]);
    let mut stderr = Vec::new();

    let err = run_pipeline(&context(&tree, &manifest, &config, false), &executor, &mut stderr)
        .expect_err("build failure should propagate");

    executor.assert_finished();
    assert!(matches!(err, PackagerError::BuildTool { ref reason, .. } if reason.contains("line 12")));
    assert!(!tree.install_dir.join("installer").exists());
}

#[rstest]
fn missing_artifact_after_successful_build(tree: PackagingTree) {
    let manifest = Manifest::blast();
    let config = tree.config("makensis");
    let executor = StubExecutor::new(vec![ExpectedCall {
        program: "makensis",
        args: vec!["ncbi-blast.nsi"],
        produces: Some("some-other-name.exe"),
        result: Ok(crate::test_utils::success_output()),
    }]);
    let mut stderr = Vec::new();

    let err = run_pipeline(&context(&tree, &manifest, &config, false), &executor, &mut stderr)
        .expect_err("undeclared artifact should fail");

    assert!(matches!(err, PackagerError::MissingArtifact { ref path } if path.file_name() == Some(INSTALLER)));
    assert!(tree.install_dir.join("installer").is_dir());
}

#[rstest]
fn missing_version_marker_stops_before_compiling(tree: PackagingTree) {
    let manifest = Manifest::blast();
    let mut config = tree.config("makensis");
    config.version_marker = "!define NOT_PRESENT".to_owned();
    let executor = StubExecutor::new(Vec::new());
    let mut stderr = Vec::new();

    let err = run_pipeline(&context(&tree, &manifest, &config, false), &executor, &mut stderr)
        .expect_err("absent marker should fail");

    assert!(matches!(err, PackagerError::ConfigFormat { .. }));
}

#[rstest]
fn verbose_run_reports_each_stage(tree: PackagingTree) {
    let manifest = Manifest::new(["blastn.exe"]).expect("manifest");
    let config = tree.config("makensis");
    let executor = StubExecutor::new(vec![ExpectedCall::compiles(
        "makensis",
        "ncbi-blast.nsi",
        INSTALLER,
    )]);
    let mut stderr = Vec::new();

    run_pipeline(&context(&tree, &manifest, &config, true), &executor, &mut stderr)
        .expect("pipeline should succeed");

    let output = String::from_utf8(stderr).expect("utf8");
    assert!(output.contains("Staging 1 file(s)"));
    assert!(output.contains("Copying"));
    assert!(output.contains("Setting version 2.15.0"));
    assert!(output.contains("Compiling installer with makensis"));
    assert!(output.contains("Relocating installer"));
}

#[rstest]
fn stage_inputs_returns_staged_definition(tree: PackagingTree) {
    let manifest = Manifest::blast();
    let config = tree.config("makensis");
    let ctx = context(&tree, &manifest, &config, false);
    let mut stderr = Vec::new();

    let definition = stage_inputs(&ctx, &mut stderr).expect("staging should succeed");

    assert_eq!(definition, ctx.staged_definition());
    for asset in ["LICENSE", "BLAST_PRIVACY", "EnvVarUpdate.nsh", "ncbilogo.ico"] {
        assert!(tree.work_dir.join(asset).is_file(), "{asset} not staged");
    }
}

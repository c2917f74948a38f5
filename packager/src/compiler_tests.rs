//! Unit tests for installer compiler invocation.

use super::*;
use crate::test_utils::{exit_status, failure_output, success_output};
use rstest::rstest;

fn definition() -> &'static Utf8Path {
    Utf8Path::new("/work/ncbi-blast.nsi")
}

#[test]
fn compile_passes_base_name_and_staging_cwd() {
    let mut executor = MockCommandExecutor::new();
    executor
        .expect_run()
        .withf(|program, args, cwd| {
            program == "makensis"
                && args == ["ncbi-blast.nsi".to_owned()]
                && cwd == Utf8Path::new("/work")
        })
        .times(1)
        .returning(|_, _, _| Ok(success_output()));

    let compiler = InstallerCompiler::new("makensis", &executor, false);
    let status = compiler
        .compile(definition(), &mut Vec::new())
        .expect("compile should succeed");

    assert!(status.success());
}

#[test]
fn compile_reports_nonzero_exit_with_stderr() {
    let mut executor = MockCommandExecutor::new();
    executor
        .expect_run()
        .returning(|_, _, _| Ok(failure_output("Error in script \"ncbi-blast.nsi\" on line 12")));

    let compiler = InstallerCompiler::new("makensis", &executor, false);
    let err = compiler
        .compile(definition(), &mut Vec::new())
        .expect_err("compile should fail");

    match err {
        PackagerError::BuildTool { tool, reason } => {
            assert_eq!(tool, "makensis");
            assert!(reason.contains("line 12"));
        }
        other => panic!("expected BuildTool, got {other:?}"),
    }
}

#[test]
fn compile_maps_spawn_failure_to_build_tool_error() {
    let mut executor = MockCommandExecutor::new();
    executor.expect_run().returning(|_, _, _| {
        Err(PackagerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "program not found",
        )))
    });

    let compiler = InstallerCompiler::new("C:/NSIS/makensis.exe", &executor, false);
    let err = compiler
        .compile(definition(), &mut Vec::new())
        .expect_err("compile should fail");

    assert!(matches!(
        err,
        PackagerError::BuildTool { ref reason, .. } if reason.contains("could not be started")
    ));
}

#[rstest]
#[case::verbose(true)]
#[case::quiet(false)]
fn compile_echoes_output_only_when_verbose(#[case] verbose: bool) {
    let mut executor = MockCommandExecutor::new();
    executor.expect_run().returning(|_, _, _| {
        Ok(Output {
            status: exit_status(0),
            stdout: b"Output: \"blast-2.15.0-win64.exe\"\n".to_vec(),
            stderr: Vec::new(),
        })
    });

    let compiler = InstallerCompiler::new("makensis", &executor, verbose);
    let mut out = Vec::new();
    compiler
        .compile(definition(), &mut out)
        .expect("compile should succeed");

    let text = String::from_utf8(out).expect("utf8");
    assert_eq!(text.contains("[makensis] Output:"), verbose);
}

#[test]
fn failure_reason_falls_back_to_stdout() {
    let output = Output {
        status: exit_status(1),
        stdout: b"!insertmacro: macro not found\n".to_vec(),
        stderr: Vec::new(),
    };
    assert!(failure_reason(&output).contains("macro not found"));
}

#[cfg(unix)]
mod system {
    use super::*;

    #[test]
    fn system_executor_reports_missing_program() {
        let executor = SystemCommandExecutor::new();
        let result = executor.run(
            "blast-win-packager-no-such-compiler",
            &[],
            Utf8Path::new("."),
        );
        assert!(matches!(result, Err(PackagerError::Io(_))));
    }

    #[test]
    fn system_executor_captures_output_within_timeout() {
        let executor = SystemCommandExecutor::with_timeout(Duration::from_secs(30));
        let output = executor
            .run("sh", &["-c".to_owned(), "echo staged".to_owned()], Utf8Path::new("."))
            .expect("sh should run");
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "staged");
    }

    #[test]
    fn system_executor_kills_command_after_timeout() {
        let executor = SystemCommandExecutor::with_timeout(Duration::from_millis(100));
        let err = executor
            .run("sh", &["-c".to_owned(), "sleep 5".to_owned()], Utf8Path::new("."))
            .expect_err("sleep should time out");
        assert!(matches!(
            err,
            PackagerError::BuildTool { ref reason, .. } if reason.contains("timed out")
        ));
    }
}

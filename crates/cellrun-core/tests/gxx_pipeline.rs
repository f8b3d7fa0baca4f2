//! Integration tests against a real g++.
//!
//! Every test returns early when g++ is not on PATH.

use std::fs;

use cellrun_core::{
    BufferSink, BuildOptions, CompilerKind, InvocationRequest, Invoker, InvokerConfig, Mode,
    Notice, Toolchain,
};
use tempfile::TempDir;

fn gxx_available() -> bool {
    match Toolchain::detect(CompilerKind::Gxx) {
        Ok(_) => true,
        Err(_) => {
            eprintln!("g++ not found, skipping");
            false
        }
    }
}

fn setup() -> (TempDir, Invoker) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let invoker = Invoker::new(InvokerConfig::in_dir(temp.path()));
    (temp, invoker)
}

#[test]
fn test_default_build_produces_executable_named_after_source() {
    if !gxx_available() {
        return;
    }
    let (temp, invoker) = setup();

    let request = InvocationRequest::new(
        Mode::CpuRun,
        "#include <cstdio>\nint main() { std::printf(\"hello from cell\\n\"); return 0; }\n",
    )
    .with_name("greet.cpp");
    let mut sink = BufferSink::new();
    let report = invoker.invoke(&request, &mut sink).unwrap();

    assert!(report.succeeded(), "output: {}", sink.text());
    assert!(temp.path().join("greet").is_file());
    assert!(!temp.path().join("greet.o").exists());
    assert_eq!(sink.text(), "hello from cell\n");
}

#[test]
fn test_syntax_error_surfaces_compiler_text() {
    if !gxx_available() {
        return;
    }
    let (temp, invoker) = setup();

    let request = InvocationRequest::new(Mode::CpuRun, "int main() { return 0 }\n");
    let mut sink = BufferSink::new();
    let report = invoker.invoke(&request, &mut sink).unwrap();

    assert!(!report.succeeded());
    assert!(report.run.is_none());
    assert_eq!(sink.notices(), vec![Notice::CompileFailed]);

    let failed = report.build.failed_step().unwrap();
    assert_eq!(sink.text(), failed.output.text);
    assert!(failed.output.text.contains("error"));
    assert!(!temp.path().join("src").exists());
}

#[test]
fn test_object_from_build_only_cell_links_into_runner() {
    if !gxx_available() {
        return;
    }
    let (temp, invoker) = setup();

    let header = "#ifndef MATRIX_LIB_H\n#define MATRIX_LIB_H\nint scale(int v);\n#endif\n";
    invoker
        .invoke(
            &InvocationRequest::new(Mode::Cpp, header).with_name("matrix_lib.h"),
            &mut BufferSink::new(),
        )
        .unwrap();

    let library = "#include \"matrix_lib.h\"\nint scale(int v) { return v * 3; }\n";
    let report = invoker
        .invoke(
            &InvocationRequest::new(Mode::Cpp, library).with_name("matrix_lib.cpp"),
            &mut BufferSink::new(),
        )
        .unwrap();
    assert!(report.succeeded());
    assert!(temp.path().join("matrix_lib.o").is_file());

    let main = "#include <cstdio>\n#include \"matrix_lib.h\"\nint main() { std::printf(\"%d\\n\", scale(14)); }\n";
    let options = BuildOptions::parse(Some("-O1"), None, None, Some("matrix_lib.o")).unwrap();
    let mut sink = BufferSink::new();
    let report = invoker
        .invoke(
            &InvocationRequest::new(Mode::CpuRun, main)
                .with_name("main.cpp")
                .with_options(options),
            &mut sink,
        )
        .unwrap();

    assert!(report.succeeded(), "output: {}", sink.text());
    assert!(temp.path().join("main.o").is_file());
    assert_eq!(sink.text(), "42\n");
}

#[test]
fn test_quoted_define_reaches_program() {
    if !gxx_available() {
        return;
    }
    let (_temp, invoker) = setup();

    let source = "#include <cstdio>\nint main() { std::puts(LABEL); }\n";
    let options =
        BuildOptions::parse(Some(r#"-DLABEL="\"two words\"""#), None, None, None).unwrap();
    let mut sink = BufferSink::new();
    let report = invoker
        .invoke(
            &InvocationRequest::new(Mode::CpuRun, source).with_options(options),
            &mut sink,
        )
        .unwrap();

    assert!(report.succeeded(), "output: {}", sink.text());
    assert_eq!(sink.text(), "two words\n");
}

#[test]
fn test_failing_program_is_reported() {
    if !gxx_available() {
        return;
    }
    let (_temp, invoker) = setup();

    let source = "#include <cstdio>\nint main() { std::fprintf(stderr, \"bad input\\n\"); return 4; }\n";
    let mut sink = BufferSink::new();
    let report = invoker
        .invoke(&InvocationRequest::new(Mode::CpuRun, source), &mut sink)
        .unwrap();

    let run = report.run.as_ref().unwrap();
    assert!(report.build.succeeded());
    assert!(!run.success);
    assert_eq!(run.exit_code, Some(4));
    assert_eq!(sink.notices(), vec![Notice::RunFailed]);
    assert_eq!(sink.text(), "bad input\n");
}

#[test]
fn test_rerun_overwrites_artifacts() {
    if !gxx_available() {
        return;
    }
    let (temp, invoker) = setup();

    for value in [1, 2] {
        let source = format!("#include <cstdio>\nint main() {{ std::printf(\"{value}\\n\"); }}\n");
        let mut sink = BufferSink::new();
        invoker
            .invoke(&InvocationRequest::new(Mode::CpuRun, source), &mut sink)
            .unwrap();
        assert_eq!(sink.text(), format!("{value}\n"));
    }

    let source = fs::read_to_string(temp.path().join("src.cpp")).unwrap();
    assert!(source.contains("\"2\\n\""));
}

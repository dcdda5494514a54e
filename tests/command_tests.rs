use rtlog_studio::commands::{execute_parse, validate_args, ParseArgs};
use rtlog_studio::ingest::ingest_str;
use rtlog_studio::output::read_trace;
use std::path::PathBuf;

#[test]
fn test_validate_args_valid() {
    let args = ParseArgs {
        log_path: PathBuf::from("run.rtlog"),
        ..Default::default()
    };

    assert!(validate_args(&args).is_ok());
}

#[test]
fn test_validate_args_empty_log_path() {
    assert!(validate_args(&ParseArgs::default()).is_err());
}

#[test]
fn test_execute_parse_writes_export() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("run.rtlog");
    std::fs::write(
        &log_path,
        "CPUdecl -> id:1 expl:true sys:\"S\" name:\"CPU1\" time:0\n\
         ThreadCreate -> id:2 cpunm:1 time:3\n",
    )
    .unwrap();

    let args = ParseArgs {
        log_path,
        output_json: dir.path().join("out/trace.json"),
        print_summary: false,
    };

    assert!(execute_parse(&args).unwrap());

    let export = read_trace(&args.output_json).unwrap();
    assert_eq!(export.trace.timelines.len(), 1);
    assert_eq!(export.trace.timelines[0].name, "CPU1");
}

#[test]
fn test_format_summary_lists_timelines() {
    let trace = ingest_str(
        "CPUdecl -> id:1 expl:true sys:\"S\" name:\"CPU1\" time:0\n\
         ThreadCreate -> id:2 cpunm:4 time:3\n",
        Some(r#"{"status":false,"name":"late","expression":"t < 3"}"#),
    )
    .unwrap();

    let summary = rtlog_studio::commands::format_summary(&trace);
    assert!(summary.contains("CPU1"));
    assert!(summary.contains("<undeclared>"));
    assert!(summary.contains("late: t < 3"));
}

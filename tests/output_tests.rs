use rtlog_studio::ingest::ingest_str;
use rtlog_studio::output::{read_trace, write_trace, TraceExport};
use rtlog_studio::parser::value::FieldValue;
use tempfile::NamedTempFile;

#[test]
fn test_export_round_trip() {
    let trace = ingest_str(
        "CPUdecl -> id:1 expl:true sys:\"S\" name:\"CPU1\" time:0\n\
         MessageRequest -> busid:0 fromcpu:1 tocpu:2 msgid:1 callthr:1 opname:\"op\" objref:3 clnm:\"C\" time:2\n\
         MessageCompleted -> msgid:1 time:4\n\
         Unknown -> time:5\n",
        Some(r#"{"status":true,"name":"n","expression":"e"}"#),
    )
    .unwrap();

    let export = TraceExport::new(&trace, "run.rtlog");
    let temp_file = NamedTempFile::new().unwrap();
    write_trace(&export, temp_file.path()).unwrap();

    let loaded = read_trace(temp_file.path()).unwrap();
    assert_eq!(loaded.trace, trace.model);
    assert_eq!(loaded.unknown_events.get("Unknown"), Some(&1));
    assert!(!loaded.generated_at.is_empty());
}

#[test]
fn test_read_trace_invalid_json() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "{ not json").unwrap();
    assert!(read_trace(temp_file.path()).is_err());
}

#[test]
fn test_export_round_trip_with_mistyped_and_reserved_fields() {
    let trace = ingest_str(
        "OpRequest -> id:\"x\" cpunm:1 expl:1 time:1\n\
         OpRequest -> id:1 kind:\"sync\" extra:3 cpunm:1 time:2\n",
        None,
    )
    .unwrap();

    let mistyped = &trace.model.events[0];
    assert_eq!(mistyped.id, None);
    assert_eq!(mistyped.extra.get("id"), Some(&FieldValue::Text("x".to_string())));
    assert_eq!(mistyped.extra.get("expl"), Some(&FieldValue::Integer(1)));
    let reserved = &trace.model.events[1];
    assert_eq!(reserved.extra.get("kind"), Some(&FieldValue::Text("sync".to_string())));

    let export = TraceExport::new(&trace, "run.rtlog");
    let temp_file = NamedTempFile::new().unwrap();
    write_trace(&export, temp_file.path()).unwrap();

    let loaded = read_trace(temp_file.path()).unwrap();
    assert_eq!(loaded.trace, trace.model);
}

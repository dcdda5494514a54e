use rtlog_studio::aggregator::build_trace_model;
use rtlog_studio::parser::event::EventKind;
use rtlog_studio::parser::value::FieldValue;

#[test]
fn test_global_timestamps_strictly_increasing() {
    let (model, _) = build_trace_model([
        "CPUdecl -> id:1 expl:true sys:\"S\" name:\"CPU1\" time:0",
        "ThreadCreate -> id:1 cpunm:1 time:0",
        "ThreadSwapIn -> id:1 objref:1 clnm:\"C\" cpunm:1 overhead:2 time:2",
        "OpRequest -> id:1 opname:\"C`op\" objref:1 clnm:\"C\" cpunm:1 async:false time:2",
        "OpActivate -> id:1 opname:\"C`op\" objref:1 clnm:\"C\" cpunm:1 async:false time:5",
        "OpCompleted -> id:1 opname:\"C`op\" objref:1 clnm:\"C\" cpunm:1 async:false time:9",
        "ThreadSwapOut -> id:1 objref:1 clnm:\"C\" cpunm:1 overhead:1 time:9",
        "ThreadKill -> id:1 cpunm:1 time:12",
    ]);

    assert_eq!(model.timestamps.as_slice(), &[0, 2, 5, 9, 12]);
    let cpu = model.timeline(1).unwrap();
    assert_eq!(cpu.name, "CPU1");
    assert_eq!(cpu.events.len(), 7);
    assert_eq!(cpu.timestamps.as_slice(), &[0, 2, 5, 9, 12]);
}

#[test]
fn test_completion_enriched_from_request() {
    let (model, diagnostics) = build_trace_model([
        "MessageRequest -> busid:1 fromcpu:1 tocpu:2 msgid:7 callthr:3 opname:\"A`f\" objref:11 clnm:\"A\" size:24 time:5",
        "MessageActivate -> msgid:7 time:6",
        "MessageCompleted -> msgid:7 time:9",
    ]);

    assert_eq!(diagnostics.orphaned_completions, 0);
    let completion = model.events_of(EventKind::MessageCompleted).next().unwrap();
    assert_eq!(completion.time, 9);
    assert_eq!(completion.busid, Some(1));
    assert_eq!(completion.callthr, Some(3));
    assert_eq!(completion.tocpu, Some(2));
    assert_eq!(completion.opname.as_deref(), Some("A`f"));
    assert_eq!(completion.objref, Some(FieldValue::Integer(11)));
    assert_eq!(completion.clnm.as_deref(), Some("A"));
    assert_eq!(completion.extra.get("size"), None);
}

#[test]
fn test_orphaned_completion_keeps_own_fields() {
    let (model, diagnostics) = build_trace_model([
        "MessageCompleted -> msgid:42 time:3",
        "ThreadKill -> id:1 cpunm:1 time:4",
    ]);

    assert_eq!(diagnostics.orphaned_completions, 1);
    assert_eq!(model.events.len(), 2);

    let completion = &model.events[0];
    assert_eq!(completion.msgid, Some(42));
    assert_eq!(completion.busid, None);
    assert_eq!(completion.tocpu, None);
    assert_eq!(completion.opname, None);
}

#[test]
fn test_second_completion_is_orphaned() {
    let (model, diagnostics) = build_trace_model([
        "MessageRequest -> busid:1 fromcpu:1 tocpu:2 msgid:7 callthr:3 opname:\"f\" objref:1 clnm:\"A\" time:1",
        "MessageCompleted -> msgid:7 time:2",
        "MessageCompleted -> msgid:7 time:3",
    ]);

    assert_eq!(diagnostics.orphaned_completions, 1);
    let completions: Vec<_> = model.events_of(EventKind::MessageCompleted).collect();
    assert_eq!(completions[0].tocpu, Some(2));
    assert_eq!(completions[1].tocpu, None);
}

#[test]
fn test_virtual_bus_from_direct_messages() {
    let (model, _) = build_trace_model([
        "MessageRequest -> busid:0 fromcpu:2 tocpu:5 msgid:1 callthr:1 opname:\"a\" objref:1 clnm:\"A\" time:1",
        "ReplyRequest -> busid:0 fromcpu:5 tocpu:2 msgid:2 origmsgid:1 callthr:1 calleethr:4 time:3",
        "MessageRequest -> busid:0 fromcpu:2 tocpu:5 msgid:3 callthr:1 opname:\"b\" objref:1 clnm:\"A\" time:4",
    ]);

    assert_eq!(model.buses.len(), 1);
    let bus = &model.buses[0];
    assert_eq!(bus.id, 0);
    assert_eq!(bus.name, "vBUS");
    assert_eq!(bus.topology, vec![2, 5]);
    assert!(bus.synthetic);
}

#[test]
fn test_unknown_kinds_counted_not_stored() {
    let (model, diagnostics) = build_trace_model([
        "ThreadCreate -> id:1 cpunm:1 time:0",
        "FancyNewEvent -> id:1 time:1",
        "FancyNewEvent -> id:2 time:2",
        "no separator here",
        "",
    ]);

    assert_eq!(model.events.len(), 1);
    assert_eq!(diagnostics.unknown_events.get("FancyNewEvent"), Some(&2));
    assert_eq!(diagnostics.unknown_events.len(), 1);
    assert_eq!(model.timestamps.as_slice(), &[0]);
}

#[test]
fn test_out_of_order_input_is_not_reordered() {
    let (model, _) = build_trace_model([
        "ThreadCreate -> id:1 cpunm:1 time:5",
        "ThreadCreate -> id:2 cpunm:1 time:3",
        "ThreadCreate -> id:3 cpunm:1 time:8",
    ]);

    let times: Vec<u64> = model.events.iter().map(|e| e.time).collect();
    assert_eq!(times, vec![5, 3, 8]);
    assert_eq!(model.timestamps.as_slice(), &[5, 8]);
}

use pretty_assertions::assert_eq;
use std::process::Command;

fn errinfo() -> Command {
    Command::new(env!("CARGO_BIN_EXE_errinfo"))
}

fn json(args: &[&str]) -> serde_json::Value {
    let out = errinfo()
        .args(args)
        .args(["--format", "json"])
        .output()
        .expect("failed to run errinfo");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    serde_json::from_slice(&out.stdout).expect("valid JSON")
}

// --- JSON output ---

#[test]
fn json_part_length_out_of_range() {
    let v = json(&["binary", "part", "[<<0,1,2,3,4,5,6,7,8,9>>, 9, 2]"]);
    assert_eq!(v["module"], "binary");
    assert_eq!(v["function"], "part");
    assert_eq!(v["arity"], 3);
    assert_eq!(v["errors"], serde_json::json!({"3": "out of range"}));
    assert_eq!(v["arguments"][2]["error"], "out of range");
    assert!(v["arguments"][0].get("error").is_none());
}

#[test]
fn json_valid_call_is_empty() {
    let v = json(&["binary", "part", "[<<0,1,2,3,4,5,6,7,8,9>>, 5, 2]"]);
    assert_eq!(v["errors"], serde_json::json!({}));
}

#[test]
fn json_rename_string_name() {
    let v = json(&["ets", "rename", "[tab, \"new\"]"]);
    assert_eq!(v["errors"], serde_json::json!({"2": "invalid table name (must be an atom)"}));
}

#[test]
fn json_update_with_fun_and_map() {
    let v = json(&["maps", "update_with", "[k, fun m:f/2, not_a_map]"]);
    assert_eq!(
        v["errors"],
        serde_json::json!({"2": "not a fun that takes one argument", "3": "not a map"})
    );
}

#[test]
fn json_cause_flag() {
    let v = json(&["ets", "lookup", "[tab, key]", "--cause", "id"]);
    assert_eq!(
        v["errors"],
        serde_json::json!({"1": "the table identifier does not refer to an existing ETS table"})
    );
}

#[test]
fn json_dead_pid_flag() {
    let v = json(&["ets", "give_away", "[tab, <0.42.0>, gift]", "--dead-pid", "<0.42.0>"]);
    assert_eq!(v["errors"], serde_json::json!({"2": "the pid refers to a terminated process"}));
    let v = json(&["ets", "give_away", "[tab, <0.42.0>, gift]"]);
    assert_eq!(v["errors"], serde_json::json!({}));
}

// --- Text output ---

#[test]
fn text_marks_failing_argument() {
    let out = errinfo()
        .args(["math", "sqrt", "[-4]", "--color", "never"])
        .output()
        .expect("failed to run errinfo");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("error: call to math:sqrt/1 failed"), "got: {stdout}");
    assert!(stdout.contains("1 | -4"), "got: {stdout}");
    assert!(stdout.contains("^ is outside the domain for this function"), "got: {stdout}");
    assert!(!stdout.contains("\x1b["));
}

#[test]
fn text_forced_color() {
    let out = errinfo()
        .args(["lists", "seq", "[1, 10, -1]", "--color", "always"])
        .output()
        .expect("failed to run errinfo");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("\x1b["));
}

#[test]
fn text_no_explanation() {
    let out = errinfo()
        .args(["lists", "flatten", "[x]", "--color", "never"])
        .output()
        .expect("failed to run errinfo");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("no argument-specific explanation"));
}

// --- Failures ---

#[test]
fn bad_argument_text_exits_nonzero() {
    let out = errinfo()
        .args(["binary", "part", "[<<1,2>>, 2"])
        .output()
        .expect("failed to run errinfo");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("cannot read arguments"));
}

#[test]
fn unsupported_module_exits_nonzero() {
    let out = errinfo()
        .args(["gen_server", "call", "[a, b]"])
        .output()
        .expect("failed to run errinfo");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("unsupported module"));
}

#[test]
fn bad_dead_pid_exits_nonzero() {
    let out = errinfo()
        .args(["ets", "give_away", "[t, <0.1.0>, g]", "--dead-pid", "self"])
        .output()
        .expect("failed to run errinfo");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn deeply_nested_argument_exits_nonzero() {
    let nested = format!("[{}{}]", "[".repeat(10_000), "]".repeat(10_000));
    let out = errinfo()
        .args(["lists", "reverse", &nested])
        .output()
        .expect("failed to run errinfo");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("nested deeper"));
}

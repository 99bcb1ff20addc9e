use crate::operation::Operation;
use crate::term::Term;
use super::ErrorMap;

pub fn render(op: &Operation, args: &[Term], errors: &ErrorMap) -> String {
    let arguments: Vec<serde_json::Value> = args.iter().enumerate().map(|(i, arg)| {
        let mut obj = serde_json::json!({
            "position": i + 1,
            "term": arg.to_string(),
        });
        if let Some(message) = errors.get(i + 1) {
            obj["error"] = serde_json::Value::String(message.to_string());
        }
        obj
    }).collect();

    let obj = serde_json::json!({
        "module": op.family.module(),
        "function": op.name,
        "arity": op.arity,
        "errors": errors,
        "arguments": arguments,
    });

    serde_json::to_string(&obj).unwrap_or_else(|_| r#"{"errors":{},"message":"internal error serializing result"}"#.to_string())
}

use serde_json::json;

pub fn conversation_body(id: &str, title: &str) -> String {
    return json!({ "id": id, "title": title }).to_string();
}

pub fn conversations_body(entries: &[(&str, &str)]) -> String {
    let list = entries
        .iter()
        .map(|(id, title)| {
            return json!({ "id": id, "title": title });
        })
        .collect::<Vec<_>>();

    return serde_json::Value::Array(list).to_string();
}

pub fn history_body(entries: &[(&str, &str)]) -> String {
    let list = entries
        .iter()
        .map(|(role, content)| {
            return json!({ "role": role, "content": content });
        })
        .collect::<Vec<_>>();

    return serde_json::Value::Array(list).to_string();
}

pub fn reply_body(reply: &str) -> String {
    return json!({ "reply": reply }).to_string();
}

pub fn error_body(error: &str) -> String {
    return json!({ "error": error }).to_string();
}

pub fn long_message_fixture() -> &'static str {
    return r#"
Hola! Here is a longer answer that keeps going for a while so that it has to be wrapped across several lines when it is rendered in a narrow chat bubble.

It also has a second paragraph.
"#
    .trim();
}

use serde_json::{json, Value};
use std::sync::LazyLock;

pub static CONFIG_SCHEMA: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "llm": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "model": { "type": "string", "minLength": 1 },
                    "api_key": { "type": "string" },
                    "base_url": { "type": "string", "format": "uri" }
                }
            },
            "prompt_file": { "type": "string", "minLength": 1 },
            "output": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "directory": { "type": "string" }
                }
            },
            "server": {
                "type": "object",
                "additionalProperties": false,
                "properties": {
                    "host": { "type": "string" },
                    "port": { "type": "integer", "minimum": 1, "maximum": 65535 }
                }
            }
        }
    })
});

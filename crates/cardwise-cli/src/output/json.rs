use std::io;

use cardwise_engine::contracts::envelope::failure_from_error;
use cardwise_engine::{EngineError, SuccessEnvelope};
use serde::Serialize;

pub fn render_success_json(success: &SuccessEnvelope) -> io::Result<String> {
    serialize_json_pretty(success)
}

pub fn render_error_json(error: &EngineError) -> io::Result<String> {
    serialize_json_pretty(&failure_from_error(error))
}

fn serialize_json_pretty<T>(value: &T) -> io::Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(value).map_err(io::Error::other)
}

#[cfg(test)]
mod tests {
    use cardwise_engine::EngineError;
    use serde_json::Value;

    use super::render_error_json;

    #[test]
    fn error_json_carries_code_and_recovery_steps() {
        let error = EngineError::invalid_argument("bad input");
        let rendered = render_error_json(&error);
        assert!(rendered.is_ok());
        if let Ok(rendered) = rendered {
            let value: Result<Value, _> = serde_json::from_str(&rendered);
            assert!(value.is_ok());
            if let Ok(value) = value {
                assert_eq!(value["ok"], Value::Bool(false));
                assert_eq!(
                    value["error"]["code"],
                    Value::String("invalid_argument".to_string())
                );
                assert!(value["error"]["recovery_steps"].is_array());
            }
        }
    }
}

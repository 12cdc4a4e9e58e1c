use serde::Serialize;
use serde_json::Value;

/// Serialize `value` to JSON, dropping every object key that starts with `_`.
///
/// View models keep display-only state (error messages, local keys) under
/// underscore names so it never reaches the server.
pub fn clean_json<T>(value: &T) -> Result<Value, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let mut value = serde_json::to_value(value)?;
    strip_private_fields(&mut value);
    Ok(value)
}

fn strip_private_fields(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|key, _| !key.starts_with('_'));
            for nested in map.values_mut() {
                strip_private_fields(nested);
            }
        }
        Value::Array(items) => items.iter_mut().for_each(strip_private_fields),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Form {
        name: String,
        #[serde(rename = "_errorMsg")]
        error_msg: String,
        rows: Vec<Row>,
    }

    #[derive(Serialize)]
    struct Row {
        memo: String,
        #[serde(rename = "_key")]
        key: u32,
    }

    #[test]
    fn strips_underscore_fields_at_every_depth() {
        let form = Form {
            name: "CASH".to_string(),
            error_msg: "Bad memo".to_string(),
            rows: vec![Row {
                memo: "lunch".to_string(),
                key: 7,
            }],
        };

        let cleaned = clean_json(&form).unwrap();
        assert_eq!(cleaned, json!({"name": "CASH", "rows": [{"memo": "lunch"}]}));
    }

    #[test]
    fn leaves_scalars_alone() {
        assert_eq!(clean_json(&5).unwrap(), json!(5));
        assert_eq!(clean_json("_x").unwrap(), json!("_x"));
    }
}

//! Conversions between JSON values and SQLite values

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rusqlite::types::{Value, ValueRef};
use serde_json::{Number, Value as JsonValue};

/// Convert a JSON parameter to the SQLite value it binds as
pub(crate) fn to_sql_value(value: &JsonValue) -> Value {
   match value {
      JsonValue::Null => Value::Null,
      JsonValue::Bool(b) => Value::Integer(i64::from(*b)),
      JsonValue::String(s) => Value::Text(s.clone()),
      JsonValue::Number(number) => {
         // Preserve integer precision by binding as i64 when possible
         if let Some(int_val) = number.as_i64() {
            Value::Integer(int_val)
         } else if let Some(uint_val) = number.as_u64() {
            // Too large for SQLite's INTEGER, falls back to REAL (loses precision)
            Value::Real(uint_val as f64)
         } else {
            Value::Real(number.as_f64().unwrap_or_default())
         }
      }
      // Arrays and objects are stored as their JSON text
      JsonValue::Array(_) | JsonValue::Object(_) => Value::Text(value.to_string()),
   }
}

/// Decode a column value to JSON.
///
/// BLOBs become base64 strings; non-finite REALs become null.
pub fn to_json(value: ValueRef<'_>) -> JsonValue {
   match value {
      ValueRef::Null => JsonValue::Null,
      ValueRef::Integer(i) => JsonValue::from(i),
      ValueRef::Real(f) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
      ValueRef::Text(bytes) => JsonValue::String(String::from_utf8_lossy(bytes).into_owned()),
      ValueRef::Blob(bytes) => JsonValue::String(STANDARD.encode(bytes)),
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use serde_json::json;

   #[test]
   fn test_integers_keep_precision() {
      let large_int: i64 = 9_007_199_254_740_993;
      assert_eq!(to_sql_value(&json!(large_int)), Value::Integer(large_int));
   }

   #[test]
   fn test_oversized_unsigned_binds_as_real() {
      assert_eq!(to_sql_value(&json!(u64::MAX)), Value::Real(u64::MAX as f64));
   }

   #[test]
   fn test_bool_binds_as_integer() {
      assert_eq!(to_sql_value(&json!(true)), Value::Integer(1));
      assert_eq!(to_sql_value(&json!(false)), Value::Integer(0));
   }

   #[test]
   fn test_object_binds_as_json_text() {
      let value = json!({"k": [1, 2]});
      assert_eq!(to_sql_value(&value), Value::Text(r#"{"k":[1,2]}"#.into()));
   }

   #[test]
   fn test_blob_decodes_as_base64() {
      assert_eq!(to_json(ValueRef::Blob(b"Hello")), json!("SGVsbG8="));
   }

   #[test]
   fn test_non_finite_real_decodes_as_null() {
      assert_eq!(to_json(ValueRef::Real(f64::NAN)), JsonValue::Null);
      assert_eq!(to_json(ValueRef::Real(1.5)), json!(1.5));
   }
}

use std::fmt::Display;

use axum::{http::StatusCode, Json};
use serde::{ser::SerializeStruct, Serialize};
use serde_json::{json, Value};
/// 响应数据，统一为 `{"success": ..., ...}` 结构
#[derive(Debug)]
pub struct Response {
    /// 响应状态码
    code: StatusCode,
    success: bool,
    /// 载荷字段名，成功时为 message 或 data，失败时为 error
    field: &'static str,
    value: Value,
}

impl axum::response::IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        let code = self.code;
        (code, Json(self)).into_response()
    }
}

impl Serialize for Response {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("Response", 2)?;
        s.serialize_field("success", &self.success)?;
        s.serialize_field(self.field, &self.value)?;
        s.end()
    }
}
impl Response {
    pub fn new(code: StatusCode, success: bool, field: &'static str, value: Value) -> Response {
        Self {
            code,
            success,
            field,
            value,
        }
    }
    /// 查询结果
    pub fn ok(data: Value) -> Self {
        Self::new(StatusCode::OK, true, "data", data)
    }
    /// 操作完成的提示信息
    pub fn message(msg: impl Display) -> Self {
        Self::new(StatusCode::OK, true, "message", json!(msg.to_string()))
    }
    /// 请求数据不合法
    pub fn invalid_data(e: impl Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST, false, "error", json!(e.to_string()))
    }
    /// 内部错误，数据库报错原样返回
    pub fn internal_server_error(e: impl Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            false,
            "error",
            json!(e.to_string()),
        )
    }
    pub fn code(&self) -> StatusCode {
        self.code
    }
    pub fn success(&self) -> bool {
        self.success
    }
}

impl From<mysql::Error> for Response {
    fn from(value: mysql::Error) -> Self {
        Self::internal_server_error(value)
    }
}

impl From<serde_json::Error> for Response {
    fn from(value: serde_json::Error) -> Self {
        Response::invalid_data(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_shape() {
        let value = serde_json::to_value(Response::message("3 records imported")).unwrap();
        assert_eq!(
            value,
            json!({"success": true, "message": "3 records imported"})
        );
    }

    #[test]
    fn data_shape() {
        let value = serde_json::to_value(Response::ok(json!([1, 2]))).unwrap();
        assert_eq!(value, json!({"success": true, "data": [1, 2]}));
    }

    #[test]
    fn error_shape_and_codes() {
        let invalid = Response::invalid_data("Missing target month");
        assert_eq!(invalid.code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            serde_json::to_value(&invalid).unwrap(),
            json!({"success": false, "error": "Missing target month"})
        );

        let internal = Response::internal_server_error("boom");
        assert_eq!(internal.code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!internal.success());
    }
}

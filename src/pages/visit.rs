use axum::{routing::post, Json, Router};
use mysql::{prelude::Queryable, Value};
use serde::Deserialize;

use crate::{
    database::get_conn,
    libs::{
        dser::{deser_duration, deser_empty_to_none},
        time::{parse_visit_time, DATETIME_FORMAT},
    },
    Response, ResponseResult,
};

pub fn visit_router() -> Router {
    Router::new().route(
        "/api/audit_visit/monthly_end_visits/uploadVisit",
        post(upload_visit),
    )
}

#[derive(Debug, Deserialize)]
struct VisitRecords {
    records: Vec<VisitRow>,
}

/// 上报的拜访记录行，缺失或空串的字段入库为 NULL
#[derive(Debug, Deserialize)]
struct VisitRow {
    #[serde(
        rename = "visitRecordId",
        default,
        deserialize_with = "deser_empty_to_none"
    )]
    record_id: Option<String>,
    #[serde(rename = "startTime", default, deserialize_with = "deser_empty_to_none")]
    start_time: Option<String>,
    #[serde(rename = "endTime", default, deserialize_with = "deser_empty_to_none")]
    end_time: Option<String>,
    #[serde(
        rename = "visitorName",
        default,
        deserialize_with = "deser_empty_to_none"
    )]
    visitor: Option<String>,
    #[serde(
        rename = "customerName",
        default,
        deserialize_with = "deser_empty_to_none"
    )]
    customer_name: Option<String>,
    #[serde(
        rename = "customerCode",
        default,
        deserialize_with = "deser_empty_to_none"
    )]
    customer_code: Option<String>,
    #[serde(
        rename = "durationMinutes",
        default,
        deserialize_with = "deser_duration"
    )]
    duration: i64,
}

/// 批量写入拜访记录，整批拼成一条多行 insert
async fn upload_visit(Json(value): Json<serde_json::Value>) -> ResponseResult {
    let Ok(data) = serde_json::from_value::<VisitRecords>(value) else {
        return Err(Response::invalid_data("Invalid Visit data provided"));
    };
    if data.records.is_empty() {
        return Err(Response::invalid_data("Invalid Visit data provided"));
    }
    let mut params = Vec::with_capacity(data.records.len() * 7);
    for row in &data.records {
        params.push(Value::from(row.record_id.as_deref()));
        params.push(datetime_value(&row.start_time)?);
        params.push(datetime_value(&row.end_time)?);
        params.push(Value::from(row.visitor.as_deref()));
        params.push(Value::from(row.customer_name.as_deref()));
        params.push(Value::from(row.customer_code.as_deref()));
        params.push(Value::from(row.duration));
    }
    let stmt = format!(
        "insert into visit
            (record_id, start_time, end_time, visitor, customer_name, customer_code, duration)
            values {}",
        vec!["(?,?,?,?,?,?,?)"; data.records.len()].join(",")
    );
    let mut conn = get_conn()?;
    let result = conn.exec_iter(stmt, params).map_err(|e| {
        tracing::error!("拜访记录写入失败: {e}");
        Response::from(e)
    })?;
    Ok(Response::message(format!(
        "{} records imported",
        result.affected_rows()
    )))
}

/// 时间字段入库前解析校验，无法解析的值整批拒绝
fn datetime_value(time: &Option<String>) -> Result<Value, Response> {
    match time {
        Some(text) => match parse_visit_time(text) {
            Some(time) => Ok(Value::from(time.format(DATETIME_FORMAT).to_string())),
            None => Err(Response::invalid_data(format!("invalid visit time: {text}"))),
        },
        None => Ok(Value::NULL),
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn datetime_value_normalizes() {
        let value = datetime_value(&Some("2024/03/26 10:00:00".to_string())).unwrap();
        assert_eq!(value, Value::from("2024-03-26 10:00:00"));
        assert_eq!(datetime_value(&None).unwrap(), Value::NULL);
    }

    #[test]
    fn datetime_value_rejects_malformed() {
        let err = datetime_value(&Some("2024.03.26".to_string())).unwrap_err();
        assert_eq!(err.code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn row_accepts_legacy_field_shapes() {
        let row: VisitRow = serde_json::from_str(
            r#"{
                "visitRecordId": "",
                "startTime": "2024/03/26 10:00:00",
                "visitorName": "Alice",
                "durationMinutes": "90"
            }"#,
        )
        .unwrap();
        assert_eq!(row.record_id, None);
        assert_eq!(row.visitor.as_deref(), Some("Alice"));
        assert_eq!(row.customer_code, None);
        assert_eq!(row.duration, 90);
    }
}

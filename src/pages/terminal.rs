use axum::{routing::post, Json, Router};
use mysql::{prelude::Queryable, Value};
use serde::Deserialize;

use crate::{database::get_conn, libs::dser::deser_empty_to_none, Response, ResponseResult};

pub fn terminal_router() -> Router {
    Router::new().route(
        "/api/audit_visit/monthly_end_visits/uploadTerminal",
        post(upload_terminal),
    )
}

/// 上报的终端客户行
#[derive(Debug, Deserialize)]
struct TerminalRow {
    #[serde(
        rename = "customerCode",
        default,
        deserialize_with = "deser_empty_to_none"
    )]
    customer_code: Option<String>,
    #[serde(
        rename = "customerName",
        default,
        deserialize_with = "deser_empty_to_none"
    )]
    customer_name: Option<String>,
    #[serde(default, deserialize_with = "deser_empty_to_none")]
    district: Option<String>,
    #[serde(default, deserialize_with = "deser_empty_to_none")]
    region: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TerminalRecords {
    records: Vec<TerminalRow>,
}

/// 批量写入终端客户，客户编码已存在的行被 insert ignore 丢弃，
/// 因此返回的行数可能小于上报条数
async fn upload_terminal(Json(value): Json<serde_json::Value>) -> ResponseResult {
    let Ok(data) = serde_json::from_value::<TerminalRecords>(value) else {
        return Err(Response::invalid_data("Invalid Terminal data provided"));
    };
    if data.records.is_empty() {
        return Err(Response::invalid_data("Invalid Terminal data provided"));
    }
    let mut params = Vec::with_capacity(data.records.len() * 4);
    for row in &data.records {
        params.push(Value::from(row.customer_code.as_deref()));
        params.push(Value::from(row.customer_name.as_deref()));
        params.push(Value::from(row.district.as_deref()));
        params.push(Value::from(row.region.as_deref()));
    }
    let stmt = format!(
        "insert ignore into terminal (customer_code, customer_name, district, region) values {}",
        vec!["(?,?,?,?)"; data.records.len()].join(",")
    );
    let mut conn = get_conn()?;
    let result = conn.exec_iter(stmt, params)?;
    Ok(Response::message(format!(
        "{} records imported",
        result.affected_rows()
    )))
}

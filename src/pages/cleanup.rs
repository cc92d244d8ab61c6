use axum::{routing::post, Router};
use mysql::prelude::Queryable;

use crate::{database::get_conn, do_if, Response, ResponseResult};

pub fn cleanup_router() -> Router {
    Router::new().route("/api/audit_visit/monthly_end_visits/cleanup", post(cleanup))
}

/// 清空两张表
///
/// TRUNCATE 属于隐式提交的 DDL，无法放进一个事务，
/// 两张表都会执行一遍，失败的表逐个汇报
async fn cleanup() -> ResponseResult {
    let mut conn = get_conn()?;
    let mut failed = Vec::new();
    for table in ["visit", "terminal"] {
        if let Err(e) = conn.query_drop(format!("TRUNCATE TABLE {table}")) {
            tracing::error!("清空 {table} 失败: {e}");
            failed.push(format!("{table}: {e}"));
        }
    }
    do_if!(failed.is_empty() =>
        Ok(Response::message("Data has been completely cleared.")),
        Err(Response::internal_server_error(failed.join("; ")))
    )
}

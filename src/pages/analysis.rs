use axum::{extract::Query, routing::get, Router};
use mysql::{prelude::Queryable, Value};
use mysql_common::prelude::FromRow;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{database::get_conn, libs::dser::deser_empty_to_none, Response, ResponseResult};

pub fn analysis_router() -> Router {
    Router::new().route(
        "/api/audit_visit/monthly_end_visits/getLateMonthVisits",
        get(late_month_visits),
    )
}

lazy_static::lazy_static! {
    /// 目标月份固定为 YYYY-MM
    static ref MONTH_FORMAT: Regex = Regex::new(r"^\d{4}-(0[1-9]|1[0-2])$").expect("月份正则不合法");
}

/// 月末拜访查询参数，空串一律按未传处理
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnalyzeParams {
    #[serde(rename = "targetMonth", deserialize_with = "deser_empty_to_none")]
    target_month: Option<String>,
    #[serde(rename = "minCount", deserialize_with = "deser_empty_to_none")]
    min_count: Option<String>,
    #[serde(deserialize_with = "deser_empty_to_none")]
    visitor: Option<String>,
    #[serde(deserialize_with = "deser_empty_to_none")]
    area: Option<String>,
    #[serde(deserialize_with = "deser_empty_to_none")]
    region: Option<String>,
}

impl AnalyzeParams {
    /// 月末拜访次数下限，解析失败或为 0 时取 1
    fn threshold(&self) -> i64 {
        self.min_count
            .as_deref()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|&v| v != 0)
            .unwrap_or(1)
    }
}

/// 查询结果行，对外字段名沿用线上接口
#[derive(Debug, Serialize, FromRow)]
struct LateMonthRow {
    #[serde(rename = "拜访人")]
    visitor: Option<String>,
    day_25: i64,
    day_26: i64,
    day_27: i64,
    day_28: i64,
    day_29: i64,
    day_30: i64,
    day_31: i64,
    #[serde(rename = "月末拜访总次数")]
    total_late_count: i64,
    #[serde(rename = "所属片区")]
    district: Option<String>,
    #[serde(rename = "所属大区")]
    region: Option<String>,
}

/// 月末突击拜访名单
///
/// 找出目标月份 25 号前零拜访、25 号起拜访次数达到下限的人员，
/// 带出每日次数和抽样客户所在的片区大区
async fn late_month_visits(Query(params): Query<AnalyzeParams>) -> ResponseResult {
    let Some(month) = params.target_month.as_deref() else {
        return Err(Response::invalid_data("Missing target month"));
    };
    if !MONTH_FORMAT.is_match(month) {
        return Err(Response::invalid_data(format!(
            "invalid target month: {month}"
        )));
    }
    let (stmt, values) = build_late_month_query(month, &params);
    let mut conn = get_conn()?;
    let rows = conn
        .exec_map(stmt, values, |row: LateMonthRow| row)
        .map_err(|e| {
            tracing::error!("月末拜访查询失败: {e}");
            Response::from(e)
        })?;
    Ok(Response::ok(json!(rows)))
}

/// 组装统计语句
///
/// monthly_check 统计每人当月 25 号前的拜访次数，late_month_stats 统计
/// 25 号起的每日次数并抽一个客户编码，内连接后只保留 25 号前为零且
/// 月末总数达到下限的人，再左连终端表补片区大区
fn build_late_month_query(month: &str, params: &AnalyzeParams) -> (String, Vec<Value>) {
    let mut values = vec![
        Value::from(month),
        Value::from(month),
        Value::from(params.threshold()),
    ];
    let mut stmt = String::from(
        "WITH monthly_check AS (
            SELECT visitor,
                COUNT(CASE WHEN DAY(start_time) < 25 THEN 1 END) AS before_25_count
            FROM visit
            WHERE DATE_FORMAT(start_time, '%Y-%m') = ?
            GROUP BY visitor
        ),
        late_month_stats AS (
            SELECT visitor,
                COUNT(CASE WHEN DAY(start_time) = 25 THEN 1 END) AS day_25,
                COUNT(CASE WHEN DAY(start_time) = 26 THEN 1 END) AS day_26,
                COUNT(CASE WHEN DAY(start_time) = 27 THEN 1 END) AS day_27,
                COUNT(CASE WHEN DAY(start_time) = 28 THEN 1 END) AS day_28,
                COUNT(CASE WHEN DAY(start_time) = 29 THEN 1 END) AS day_29,
                COUNT(CASE WHEN DAY(start_time) = 30 THEN 1 END) AS day_30,
                COUNT(CASE WHEN DAY(start_time) = 31 THEN 1 END) AS day_31,
                COUNT(*) AS total_late_count,
                MAX(customer_code) AS sample_customer_code
            FROM visit
            WHERE DATE_FORMAT(start_time, '%Y-%m') = ? AND DAY(start_time) >= 25
            GROUP BY visitor
        )
        SELECT f.visitor, f.day_25, f.day_26, f.day_27, f.day_28, f.day_29,
            f.day_30, f.day_31, f.total_late_count, t.district, t.region
        FROM late_month_stats f
        JOIN monthly_check c ON f.visitor = c.visitor
        LEFT JOIN terminal t ON f.sample_customer_code = t.customer_code
        WHERE c.before_25_count = 0 AND f.total_late_count >= ?",
    );
    for (column, filter) in [
        ("f.visitor", &params.visitor),
        ("t.district", &params.area),
        ("t.region", &params.region),
    ] {
        if let Some(text) = filter {
            stmt.push_str(&format!(" AND {column} LIKE ?"));
            values.push(Value::from(format!("%{text}%")));
        }
    }
    stmt.push_str(" ORDER BY f.total_late_count DESC");
    (stmt, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(min_count: Option<&str>) -> AnalyzeParams {
        AnalyzeParams {
            target_month: Some("2024-03".to_string()),
            min_count: min_count.map(|v| v.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn threshold_defaults_to_one() {
        assert_eq!(params(None).threshold(), 1);
        assert_eq!(params(Some("abc")).threshold(), 1);
        assert_eq!(params(Some("0")).threshold(), 1);
        assert_eq!(params(Some("3")).threshold(), 3);
    }

    #[test]
    fn month_format_is_strict() {
        assert!(MONTH_FORMAT.is_match("2024-03"));
        assert!(MONTH_FORMAT.is_match("1999-12"));
        assert!(!MONTH_FORMAT.is_match("2024-3"));
        assert!(!MONTH_FORMAT.is_match("2024-13"));
        assert!(!MONTH_FORMAT.is_match("2024/03"));
        assert!(!MONTH_FORMAT.is_match("2024-03-26"));
    }

    #[test]
    fn query_without_filters() {
        let (stmt, values) = build_late_month_query("2024-03", &params(None));
        assert_eq!(
            values,
            vec![
                Value::from("2024-03"),
                Value::from("2024-03"),
                Value::from(1i64)
            ]
        );
        assert!(stmt.contains("WHERE c.before_25_count = 0"));
        assert!(!stmt.contains("LIKE"));
        assert!(stmt.ends_with("ORDER BY f.total_late_count DESC"));
    }

    #[test]
    fn query_appends_each_filter() {
        let p = AnalyzeParams {
            target_month: Some("2024-03".to_string()),
            visitor: Some("ali".to_string()),
            area: Some("华东".to_string()),
            region: Some("东区".to_string()),
            ..Default::default()
        };
        let (stmt, values) = build_late_month_query("2024-03", &p);
        assert!(stmt.contains("f.visitor LIKE ?"));
        assert!(stmt.contains("t.district LIKE ?"));
        assert!(stmt.contains("t.region LIKE ?"));
        assert_eq!(values.len(), 6);
        assert_eq!(values[3], Value::from("%ali%"));
        assert_eq!(values[5], Value::from("%东区%"));
    }
}

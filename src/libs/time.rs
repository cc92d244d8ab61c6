use chrono::{NaiveDate, NaiveDateTime};

/// DATETIME 字面量格式，入库统一用这个
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 解析上报的拜访时间，日期分隔符 `/` 与 `-` 均可，时间部分可省略
///
/// `2024/03/26 10:00:00`、`2024-03-26` 都合法，解析失败返回 None
pub fn parse_visit_time(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim().replace('/', "-");
    for format in [DATETIME_FORMAT, "%Y-%m-%d %H:%M"] {
        if let Ok(time) = NaiveDateTime::parse_from_str(&text, format) {
            return Some(time);
        }
    }
    NaiveDate::parse_from_str(&text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn format(text: &str) -> String {
        parse_visit_time(text)
            .map(|t| t.format(DATETIME_FORMAT).to_string())
            .unwrap_or_default()
    }

    #[test]
    fn slash_separated_datetime() {
        assert_eq!(format("2024/03/26 10:00:00"), "2024-03-26 10:00:00");
    }

    #[test]
    fn dash_separated_datetime() {
        assert_eq!(format("2024-03-26 10:00:00"), "2024-03-26 10:00:00");
    }

    #[test]
    fn date_only_gets_midnight() {
        assert_eq!(format("2024/03/26"), "2024-03-26 00:00:00");
        assert_eq!(format("2024-12-01"), "2024-12-01 00:00:00");
    }

    #[test]
    fn minutes_without_seconds() {
        assert_eq!(format("2024/03/26 10:30"), "2024-03-26 10:30:00");
    }

    #[test]
    fn malformed_input_is_rejected() {
        assert_eq!(parse_visit_time("2024.03.26"), None);
        assert_eq!(parse_visit_time("26/03/2024"), None);
        assert_eq!(parse_visit_time("2024/13/01"), None);
        assert_eq!(parse_visit_time("下周三"), None);
        assert_eq!(parse_visit_time(""), None);
    }
}

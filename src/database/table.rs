pub struct Table;

// 时间列在入库时解析校验，库里存原生 DATETIME
impl Table {
    /// 拜访记录表，允许重复记录
    pub const VISIT_TABLE: &str = "CREATE TABLE IF NOT EXISTS visit(
            record_id VARCHAR(50),
            start_time DATETIME,
            end_time DATETIME,
            visitor VARCHAR(50),
            customer_name VARCHAR(100),
            customer_code VARCHAR(50),
            duration INT NOT NULL,
            INDEX idx_visit_visitor (visitor),
            INDEX idx_visit_customer (customer_code)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
    ";
    /// 终端客户表
    ///
    /// 客户编码唯一，重复上报的编码直接丢弃不合并
    pub const TERMINAL_TABLE: &str = "CREATE TABLE IF NOT EXISTS terminal(
            customer_code VARCHAR(50) NOT NULL,
            customer_name VARCHAR(100),
            district VARCHAR(100),
            region VARCHAR(100),
            UNIQUE INDEX idx_terminal_customer (customer_code)
        ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4
    ";
}

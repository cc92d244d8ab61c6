mod table;
use std::sync::RwLock;

use mysql::{prelude::Queryable, Pool, PooledConn};
pub use table::Table;

use crate::{Config, Response};

lazy_static::lazy_static! {
    /// 进程级连接池句柄，始终指向最近一次建好的数据库
    ///
    /// 写侧只有启动建库和退出清理两处，读侧拿到的要么是旧池要么是新池
    static ref DB_POOL: RwLock<Option<Pool>> = RwLock::new(None);
}

/// 建库建表并把新连接池装入进程级句柄
///
/// 被替换下来的旧池在丢弃时关闭连接，关闭出错无法观测也不处理
pub fn init_database(config: &Config) -> mysql::Result<String> {
    let name = config.database_name();
    let mut conn = Pool::new(config.server_url().as_str())?.get_conn()?;
    conn.query_drop(format!("CREATE DATABASE IF NOT EXISTS `{name}`"))?;
    drop(conn);

    let pool = Pool::new(config.database_url(&name).as_str())?;
    let mut conn = pool.get_conn()?;
    conn.query_drop(Table::VISIT_TABLE)?;
    conn.query_drop(Table::TERMINAL_TABLE)?;
    drop(conn);

    if let Ok(mut handle) = DB_POOL.write() {
        *handle = Some(pool);
    }
    Ok(name)
}

/// 连接数据库
pub fn get_conn() -> Result<PooledConn, Response> {
    let pool = {
        let handle = DB_POOL
            .read()
            .map_err(|_| Response::internal_server_error("数据库句柄已失效"))?;
        (*handle).clone()
    };
    match pool {
        Some(pool) => pool.get_conn().map_err(Response::from),
        None => Err(Response::internal_server_error("数据库未初始化")),
    }
}

/// 释放连接池，进程退出前调用
pub fn close_database() {
    if let Ok(mut handle) = DB_POOL.write() {
        handle.take();
    }
}

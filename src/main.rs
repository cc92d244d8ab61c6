use audit_visit_rust::{database, Config};
use axum::{extract::DefaultBodyLimit, http::Method, Router};
use tower_http::cors::{Any, CorsLayer};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
    let setting = Config::read();
    // 启动期建库失败直接退出
    match database::init_database(&setting) {
        Ok(name) => tracing::info!("数据库初始化完成: {name}"),
        Err(e) => {
            tracing::error!("数据库初始化失败: {e}");
            std::process::exit(1);
        }
    }
    tokio::spawn(async {
        wait_terminate().await;
        database::close_database();
        std::process::exit(0);
    });
    let router = Router::new()
        .merge(audit_visit_rust::pages::pages_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::POST, Method::DELETE])
                .allow_headers(Any),
        )
        .layer(DefaultBodyLimit::max(setting.body_limit()));
    tracing::info!("Server running on http://localhost:{}", setting.port());
    axum::serve(
        tokio::net::TcpListener::bind(format!("0.0.0.0:{}", setting.port()))
            .await
            .unwrap(),
        router,
    )
    .await
    .unwrap()
}

/// 等待终止信号，不等在途请求
async fn wait_terminate() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => (),
                    _ = term.recv() => (),
                }
            }
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

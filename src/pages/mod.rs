use axum::Router;

mod analysis;
mod cleanup;
mod terminal;
mod visit;

pub fn pages_router() -> Router {
    visit::visit_router()
        .merge(terminal::terminal_router())
        .merge(analysis::analysis_router())
        .merge(cleanup::cleanup_router())
}

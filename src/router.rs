use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::api;
use crate::db::DeckPool;

#[derive(Clone)]
pub struct DeckState {
    pub pool: DeckPool,
}

impl DeckState {
    pub fn new(pool: DeckPool) -> Self {
        Self { pool }
    }
}

pub fn deck_router(state: DeckState) -> Router {
    Router::new()
        .route(
            "/api/table",
            get(api::table::get_table)
                .post(api::table::create_table)
                .put(api::table::alter_table)
                .delete(api::table::drop_table),
        )
        .route("/api/table/filter", post(api::filter::filter_table))
        .route(
            "/api/constraint",
            get(api::constraint::get_constraints).post(api::constraint::add_constraints),
        )
        .route("/api/filter", post(api::filter::filter_rows))
        .route(
            "/api/row",
            get(api::row::get_rows)
                .post(api::row::insert_row)
                .put(api::row::update_row)
                .delete(api::row::delete_row),
        )
        .route(
            "/api/view",
            get(api::view::get_view)
                .post(api::view::create_view)
                .delete(api::view::drop_view),
        )
        .layer(TraceLayer::new_for_http())
        // The dashboard UI is served from its own dev origin.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

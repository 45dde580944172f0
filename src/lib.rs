pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod queue;
pub mod state;
pub mod store;
pub mod templates_structs;
pub mod tools;

use actix_web::web;

/// Register every route of the service.
pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{queue_handlers, tool_handlers};

    cfg
        // Queue items
        .route("/manage/queue/item/{id}", web::get().to(queue_handlers::display_item))
        .route(
            "/manage/queue/item/{id}/action/{action}",
            web::get().to(queue_handlers::item_action_get),
        )
        .route(
            "/manage/queue/item/{id}/action/{action}",
            web::post().to(queue_handlers::item_action_post),
        )
        // Tools
        .route(tool_handlers::TOOL_PATH, web::get().to(tool_handlers::form))
        .route(tool_handlers::TOOL_PATH, web::post().to(tool_handlers::run));
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn memory_app() -> axum::routing::RouterIntoService<axum::body::Body, ()> {
    let store = petcare_api::store::memory::InMemoryStore::new();
    let state = petcare_api::app::AppState::new(std::sync::Arc::new(store));
    petcare_api::app::build_router(state).into_service()
}

use crate::location::LocationResolver;
use crate::session::FlatTerrain;
use std::sync::Arc;

pub struct AppState {
    pub resolver: Arc<LocationResolver>,
    pub terrain: FlatTerrain,
}

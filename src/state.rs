use crate::models::Theme;
use crate::storage::Database;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub theme: Arc<Mutex<Theme>>,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            theme: Arc::new(Mutex::new(Theme::default())),
        }
    }

    pub async fn theme(&self) -> Theme {
        *self.theme.lock().await
    }

    pub async fn toggle_theme(&self) -> Theme {
        let mut theme = self.theme.lock().await;
        *theme = theme.toggled();
        *theme
    }
}

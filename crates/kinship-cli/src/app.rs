//! Services shared by the menu, the browser, and the one-shot commands.

use std::sync::Arc;

use kinship_graph::GraphStore;
use kinship_tree::{PersonRepository, SchemaStore};

use crate::error::Result;

#[derive(Clone)]
pub struct App {
    pub schema: SchemaStore,
    pub persons: PersonRepository,
}

impl App {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            schema: SchemaStore::new(store.clone()),
            persons: PersonRepository::new(store),
        }
    }

    /// Build the services and make sure the schema record exists.
    pub async fn start(store: Arc<dyn GraphStore>) -> Result<Self> {
        let app = Self::new(store);
        app.schema.ensure_initialized().await?;
        Ok(app)
    }
}

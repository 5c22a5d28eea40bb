use std::sync::Arc;

use surrealdb::{
    Surreal,
    engine::remote::ws::Ws,
    opt::auth::Root,
};

use crate::errors::Result;
use crate::stores::{InboxStores, SurrealStore};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn InboxStores>,
}

impl AppState {
    pub async fn init() -> Result<Self> {
        let address =
            std::env::var("SURREAL_ADDR").unwrap_or_else(|_| "localhost:8050".to_string());
        let username = std::env::var("SURREAL_USER").unwrap_or_else(|_| "root".to_string());
        let password = std::env::var("SURREAL_PASS").unwrap_or_else(|_| "secret".to_string());

        let sdb = Surreal::new::<Ws>(address).await?;
        sdb.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
        sdb.use_ns("campus").use_db("campus").await?;

        Ok(Self {
            store: Arc::new(SurrealStore::new(sdb)),
        })
    }
}

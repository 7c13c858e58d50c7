use std::{env, path::PathBuf, sync::Arc};

use aus_admin_server::AppBuilder;
use aus_permission_adapter_sqlite::PermissionAdapterSqlite;
use aus_types::error::ClResult;

pub struct Config {
	pub listen: String,
	pub db_dir: PathBuf,
	pub auth_header: Option<String>,
}

impl Config {
	fn from_env() -> Self {
		Config {
			listen: env::var("LISTEN").unwrap_or_else(|_| "127.0.0.1:8080".to_string()),
			db_dir: PathBuf::from(env::var("DB_DIR").unwrap_or_else(|_| "./data".to_string())),
			auth_header: env::var("AUTH_HEADER").ok(),
		}
	}
}

#[tokio::main]
async fn main() -> ClResult<()> {
	let config = Config::from_env();

	let mut builder = AppBuilder::new();
	builder.listen(config.listen);
	if let Some(auth_header) = config.auth_header {
		builder.auth_header(auth_header);
	}

	let permission_adapter = PermissionAdapterSqlite::new(&config.db_dir).await?;
	builder.permission_adapter(Arc::new(permission_adapter));

	builder.run().await
}

// vim: ts=4

//! Adapter that stores user permissions of the admin console.
//!
//! Reads can go straight to the adapter. Mutations always happen inside a
//! [`PermissionTransaction`] opened with [`PermissionAdapter::begin`], which
//! also offers the same reads so a view can check and modify consistently.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::prelude::*;

pub const ADMIN_PERMISSION: &str = "admin";

/// Every permission that can be granted, with the option keys it accepts.
pub const KNOWN_PERMISSIONS: &[(&str, &[&str])] = &[
	(ADMIN_PERMISSION, &[]),
	("/releases/:name", &["method", "product"]),
	("/releases/:name/read_only", &["method"]),
	("/rules", &["product"]),
	("/rules/:id", &["method", "product"]),
	("/users/:id/permissions/:permission", &["method"]),
];

/// Summary of a user having at least one permission. Serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct UserInfo {}

/// What a user holds for one permission
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PermissionData {
	pub options: Option<Value>,
	pub data_version: DataVersion,
}

/// A full permission row
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Permission {
	pub username: Box<str>,
	pub permission: Box<str>,
	pub options: Option<Value>,
	pub data_version: DataVersion,
}

pub type UserPermissions = BTreeMap<Box<str>, PermissionData>;

/// Values taken from the request URL that a permission's options may restrict
pub type UrlOptions = BTreeMap<Box<str>, Box<str>>;

/// Checks `options` against what `permission` accepts.
///
/// Null, missing and empty options are all stored as no options.
pub fn check_options(permission: &str, options: Option<&Value>) -> ClResult<Option<Map<String, Value>>> {
	let Some((_, allowed)) = KNOWN_PERMISSIONS.iter().find(|(name, _)| *name == permission) else {
		return Err(Error::ValidationError(format!("Unknown permission \"{}\"", permission)));
	};
	match options {
		None | Some(Value::Null) => Ok(None),
		Some(Value::Object(map)) => {
			if let Some(key) = map.keys().find(|key| !allowed.contains(&key.as_str())) {
				return Err(Error::ValidationError(format!(
					"Unknown option \"{}\" for permission \"{}\"",
					key, permission
				)));
			}
			Ok(if map.is_empty() { None } else { Some(map.clone()) })
		}
		Some(_) => Err(Error::ValidationError("Permission options must be a JSON object".into())),
	}
}

fn option_matches(option: &Value, wanted: &str) -> bool {
	match option {
		Value::String(s) => s == wanted,
		Value::Array(items) => items.iter().any(|item| item.as_str() == Some(wanted)),
		_ => false,
	}
}

/// Decides whether the holder of `perms` may use `url` with `method`.
///
/// Admins may do anything and GET is always allowed. Otherwise the exact
/// `url` permission is needed; a `method` option must match the request
/// method and a `product` option must list the product the URL refers to.
pub fn url_permission_granted(
	perms: &UserPermissions,
	url: &str,
	method: &str,
	url_options: &UrlOptions,
) -> bool {
	if perms.contains_key(ADMIN_PERMISSION) {
		return true;
	}
	if method == "GET" {
		return true;
	}
	let Some(perm) = perms.get(url) else {
		return false;
	};
	if let Some(Value::Object(options)) = &perm.options {
		if let Some(allowed_method) = options.get("method")
			&& !option_matches(allowed_method, method)
		{
			return false;
		}
		if let (Some(product), Some(allowed_products)) =
			(url_options.get("product"), options.get("product"))
			&& !option_matches(allowed_products, product)
		{
			return false;
		}
	}
	true
}

#[async_trait]
pub trait PermissionAdapter: Debug + Send + Sync {
	/// Opens a transaction. Dropping it without commit rolls back.
	async fn begin(&self) -> ClResult<Box<dyn PermissionTransaction>>;

	/// Every user holding at least one permission
	async fn list_users(&self) -> ClResult<BTreeMap<Box<str>, UserInfo>>;

	async fn list_user_permissions(&self, username: &str) -> ClResult<UserPermissions>;

	async fn read_permission(&self, username: &str, permission: &str) -> ClResult<Option<Permission>>;

	async fn has_url_permission(
		&self,
		username: &str,
		url: &str,
		method: &str,
		url_options: &UrlOptions,
	) -> ClResult<bool> {
		let perms = self.list_user_permissions(username).await?;
		Ok(url_permission_granted(&perms, url, method, url_options))
	}
}

#[async_trait]
pub trait PermissionTransaction: Send {
	async fn list_user_permissions(&mut self, username: &str) -> ClResult<UserPermissions>;

	async fn read_permission(&mut self, username: &str, permission: &str) -> ClResult<Option<Permission>>;

	/// Creates the permission with `data_version` 1.
	async fn grant_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		options: Option<&Value>,
	) -> ClResult<()>;

	/// Replaces the options if the stored version still equals
	/// `old_data_version`, failing with [`Error::OutdatedData`] otherwise.
	async fn update_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		old_data_version: DataVersion,
		options: Option<&Value>,
	) -> ClResult<()>;

	async fn revoke_permission(
		&mut self,
		changed_by: &str,
		username: &str,
		permission: &str,
		old_data_version: DataVersion,
	) -> ClResult<()>;

	async fn commit(self: Box<Self>) -> ClResult<()>;

	async fn rollback(self: Box<Self>) -> ClResult<()>;
}


// vim: ts=4

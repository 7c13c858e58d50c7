//! Admin console forms
//!
//! Every form that edits a stored row carries the row's `data_version`, so
//! updates can be checked for concurrent modification.

use serde_json::Value;

use aus_core::form::field::{empty_array, none_or_type, strict_type, text};
use aus_core::form::{
	Field, Form, FormData, IntegerField, JsonBlobField, JsonStringField, NullableStringField,
	SelectField, StringField, Validator, Widget,
};
use aus_types::types::DataVersion;

const UPDATE_TYPES: [(&str, &str); 2] = [("minor", "minor"), ("major", "major")];

fn data_version_field(required: bool) -> IntegerField {
	let field = IntegerField::new("data_version", "data_version").widget(Widget::HiddenInput);
	if required { field.validators(vec![Validator::Required]) } else { field }
}

fn nullable(name: &'static str, label: &'static str, optional: bool, max_len: usize) -> NullableStringField {
	let length = Validator::length(0, max_len);
	let validators = if optional { vec![Validator::Optional, length] } else { vec![length] };
	NullableStringField::new(name, label).validators(validators)
}

// Permissions //
//*************//
/// Form for granting a permission the user does not hold yet
#[derive(Debug)]
pub struct NewPermissionForm {
	pub data_version: IntegerField,
	pub options: JsonStringField,
	pub permission: StringField,
}

impl NewPermissionForm {
	pub fn new() -> Self {
		Self {
			data_version: data_version_field(true),
			options: JsonStringField::new("options", "Options"),
			permission: StringField::new("permission", "Permission")
				.validators(vec![Validator::Required]),
		}
	}

	pub fn from_data(data: &FormData) -> Self {
		Self::new().bind(data, None)
	}
}

impl Default for NewPermissionForm {
	fn default() -> Self {
		Self::new()
	}
}

impl Form for NewPermissionForm {
	fn fields(&self) -> Vec<&dyn Field> {
		vec![&self.data_version as &dyn Field, &self.options, &self.permission]
	}
	fn fields_mut(&mut self) -> Vec<&mut dyn Field> {
		vec![&mut self.data_version as &mut dyn Field, &mut self.options, &mut self.permission]
	}
}

/// Form for a permission the user already holds; the permission name is
/// rendered read-only.
#[derive(Debug)]
pub struct ExistingPermissionForm {
	pub data_version: IntegerField,
	pub options: JsonStringField,
	pub permission: StringField,
}

impl ExistingPermissionForm {
	pub fn new() -> Self {
		Self {
			data_version: data_version_field(true),
			options: JsonStringField::new("options", "Options"),
			permission: StringField::new("permission", "Permission")
				.validators(vec![Validator::Required])
				.widget(Widget::DisableableTextInput { disabled: true }),
		}
	}

	pub fn from_data(data: &FormData) -> Self {
		Self::new().bind(data, None)
	}

	/// Form prefilled from a stored permission, for rendering
	pub fn from_stored(
		prefix: &str,
		permission: &str,
		options: Option<&Value>,
		data_version: DataVersion,
	) -> Self {
		let mut form = Self::new();
		form.set_prefix(Some(prefix));
		form.permission.data = permission.to_owned();
		form.options.data = options.cloned();
		form.data_version.data = Some(data_version);
		form
	}
}

impl Default for ExistingPermissionForm {
	fn default() -> Self {
		Self::new()
	}
}

impl Form for ExistingPermissionForm {
	fn fields(&self) -> Vec<&dyn Field> {
		vec![&self.data_version as &dyn Field, &self.options, &self.permission]
	}
	fn fields_mut(&mut self) -> Vec<&mut dyn Field> {
		vec![&mut self.data_version as &mut dyn Field, &mut self.options, &mut self.permission]
	}
}

// Releases //
//**********//
/// Form for updating a release.
///
/// Releases can be created implicitly by the release views, so
/// `data_version` is not required here; the views check for it.
#[derive(Debug)]
pub struct ReleaseForm {
	pub data_version: IntegerField,
	pub product: StringField,
	pub version: StringField,
	pub hash_function: StringField,
	pub data: JsonStringField,
	pub schema_version: IntegerField,
	pub copy_to: JsonStringField,
	pub alias: JsonStringField,
}

impl ReleaseForm {
	pub fn new() -> Self {
		Self {
			data_version: data_version_field(false),
			product: StringField::new("product", "Product").validators(vec![Validator::Required]),
			version: StringField::new("version", "Version").validators(vec![Validator::Required]),
			hash_function: StringField::new("hashFunction", "Hash Function"),
			data: JsonStringField::new("data", "Data").validators(vec![Validator::Required]),
			schema_version: IntegerField::new("schema_version", "Schema Version"),
			copy_to: JsonStringField::new("copyTo", "Copy To").with_default(empty_array),
			alias: JsonStringField::new("alias", "Alias").with_default(empty_array),
		}
	}

	pub fn from_data(data: &FormData) -> Self {
		Self::new().bind(data, None)
	}
}

impl Default for ReleaseForm {
	fn default() -> Self {
		Self::new()
	}
}

impl Form for ReleaseForm {
	fn fields(&self) -> Vec<&dyn Field> {
		vec![
			&self.data_version as &dyn Field,
			&self.product,
			&self.version,
			&self.hash_function,
			&self.data,
			&self.schema_version,
			&self.copy_to,
			&self.alias,
		]
	}
	fn fields_mut(&mut self) -> Vec<&mut dyn Field> {
		vec![
			&mut self.data_version as &mut dyn Field,
			&mut self.product,
			&mut self.version,
			&mut self.hash_function,
			&mut self.data,
			&mut self.schema_version,
			&mut self.copy_to,
			&mut self.alias,
		]
	}
}

/// Form for uploading a brand new release blob
#[derive(Debug)]
pub struct NewReleaseForm {
	pub name: StringField,
	pub version: StringField,
	pub product: StringField,
	pub blob: JsonBlobField,
}

impl NewReleaseForm {
	pub fn new() -> Self {
		Self {
			name: StringField::new("name", "Name").validators(vec![Validator::Required]),
			version: StringField::new("version", "Version").validators(vec![Validator::Required]),
			product: StringField::new("product", "Product").validators(vec![Validator::Required]),
			blob: JsonBlobField::new("blob", "Data").validators(vec![Validator::Required]),
		}
	}

	pub fn from_data(data: &FormData) -> Self {
		Self::new().bind(data, None)
	}
}

impl Default for NewReleaseForm {
	fn default() -> Self {
		Self::new()
	}
}

impl Form for NewReleaseForm {
	fn fields(&self) -> Vec<&dyn Field> {
		vec![&self.name as &dyn Field, &self.version, &self.product, &self.blob]
	}
	fn fields_mut(&mut self) -> Vec<&mut dyn Field> {
		vec![&mut self.name as &mut dyn Field, &mut self.version, &mut self.product, &mut self.blob]
	}
}

// Rules //
//*******//
/// Matching conditions and targets shared by the rule forms
#[derive(Debug)]
pub struct RuleFields {
	pub background_rate: IntegerField,
	pub priority: IntegerField,
	pub mapping: SelectField<String>,
	pub product: NullableStringField,
	pub version: NullableStringField,
	pub build_id: NullableStringField,
	pub channel: NullableStringField,
	pub locale: NullableStringField,
	pub distribution: NullableStringField,
	pub build_target: NullableStringField,
	pub os_version: NullableStringField,
	pub dist_version: NullableStringField,
	pub comment: NullableStringField,
	pub update_type: SelectField<String>,
	pub header_arch: NullableStringField,
}

impl RuleFields {
	fn new(editing: bool) -> Self {
		let opt = |validators: Vec<Validator>| {
			if editing {
				let mut all = vec![Validator::Optional];
				all.extend(validators);
				all
			} else {
				validators
			}
		};
		let coerce = if editing { none_or_type(text) } else { strict_type(text) };
		let background_rate = if editing {
			vec![Validator::Optional, Validator::number_range(0, 100)]
		} else {
			vec![Validator::Required, Validator::number_range(0, 100)]
		};

		Self {
			background_rate: IntegerField::new("backgroundRate", "Background Rate")
				.validators(background_rate),
			priority: IntegerField::new("priority", "Priority").validators(if editing {
				vec![Validator::Optional]
			} else {
				vec![Validator::Required]
			}),
			mapping: SelectField::new("mapping", "Mapping", coerce.clone()).validators(opt(vec![])),
			product: nullable("product", "Product", editing, 15),
			version: nullable("version", "Version", editing, 10),
			build_id: nullable("build_id", "BuildID", editing, 20),
			channel: nullable("channel", "Channel", editing, 75),
			locale: nullable("locale", "Locale", editing, 10),
			distribution: nullable("distribution", "Distribution", editing, 100),
			build_target: nullable("build_target", "Build Target", editing, 75),
			os_version: nullable("os_version", "OS Version", editing, 1000),
			dist_version: nullable("dist_version", "Dist Version", editing, 100),
			comment: nullable("comment", "Comment", editing, 500),
			update_type: SelectField::new("update_type", "Update Type", coerce)
				.choices(UPDATE_TYPES)
				.validators(opt(vec![])),
			header_arch: nullable("header_arch", "Header Architecture", editing, 10),
		}
	}

	/// Offers `releases` as mapping targets
	pub fn set_mapping_choices<'a>(&mut self, releases: impl IntoIterator<Item = &'a str>) {
		self.mapping.set_choices(releases.into_iter().map(|name| (name, name)));
	}

	fn fields(&self) -> Vec<&dyn Field> {
		vec![
			&self.background_rate as &dyn Field,
			&self.priority,
			&self.mapping,
			&self.product,
			&self.version,
			&self.build_id,
			&self.channel,
			&self.locale,
			&self.distribution,
			&self.build_target,
			&self.os_version,
			&self.dist_version,
			&self.comment,
			&self.update_type,
			&self.header_arch,
		]
	}

	fn fields_mut(&mut self) -> Vec<&mut dyn Field> {
		vec![
			&mut self.background_rate as &mut dyn Field,
			&mut self.priority,
			&mut self.mapping,
			&mut self.product,
			&mut self.version,
			&mut self.build_id,
			&mut self.channel,
			&mut self.locale,
			&mut self.distribution,
			&mut self.build_target,
			&mut self.os_version,
			&mut self.dist_version,
			&mut self.comment,
			&mut self.update_type,
			&mut self.header_arch,
		]
	}
}

/// Form for creating a rule
#[derive(Debug)]
pub struct RuleForm {
	pub rule: RuleFields,
}

impl RuleForm {
	pub fn new() -> Self {
		Self { rule: RuleFields::new(false) }
	}

	pub fn from_data(data: &FormData) -> Self {
		Self::new().bind(data, None)
	}
}

impl Default for RuleForm {
	fn default() -> Self {
		Self::new()
	}
}

impl Form for RuleForm {
	fn fields(&self) -> Vec<&dyn Field> {
		self.rule.fields()
	}
	fn fields_mut(&mut self) -> Vec<&mut dyn Field> {
		self.rule.fields_mut()
	}
}

/// Form for editing a rule; every field may be left out.
#[derive(Debug)]
pub struct EditRuleForm {
	pub data_version: IntegerField,
	pub rule: RuleFields,
}

impl EditRuleForm {
	pub fn new() -> Self {
		Self { data_version: data_version_field(true), rule: RuleFields::new(true) }
	}

	pub fn from_data(data: &FormData) -> Self {
		Self::new().bind(data, None)
	}
}

impl Default for EditRuleForm {
	fn default() -> Self {
		Self::new()
	}
}

impl Form for EditRuleForm {
	fn fields(&self) -> Vec<&dyn Field> {
		let mut fields = vec![&self.data_version as &dyn Field];
		fields.extend(self.rule.fields());
		fields
	}
	fn fields_mut(&mut self) -> Vec<&mut dyn Field> {
		let mut fields = vec![&mut self.data_version as &mut dyn Field];
		fields.extend(self.rule.fields_mut());
		fields
	}
}


// vim: ts=4

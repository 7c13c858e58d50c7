//! Form handling
//!
//! A form is a struct of typed fields. Binding it to submitted [`FormData`]
//! coerces every field (recording coercion failures as process errors);
//! `validate` then runs each field's validator chain. Forms also render
//! their fields to HTML for the templates.

pub mod data;
pub mod field;
pub mod validators;
pub mod widget;

use std::collections::BTreeMap;

use serde_json::{Map, Value, json};

use crate::prelude::*;

pub use data::FormData;
pub use field::{
	Field, FieldMeta, IntegerField, JsonBlobField, JsonStringField, NullableStringField,
	SelectField, StringField,
};
pub use validators::Validator;
pub use widget::Widget;

pub trait Form {
	fn fields(&self) -> Vec<&dyn Field>;
	fn fields_mut(&mut self) -> Vec<&mut dyn Field>;

	fn set_prefix(&mut self, prefix: Option<&str>) {
		for field in self.fields_mut() {
			field.meta_mut().prefix = prefix.map(Box::from);
		}
	}

	fn process(&mut self, data: &FormData) {
		for field in self.fields_mut() {
			field.process(data);
		}
	}

	/// Prefixes the form and coerces `data` into it.
	fn bind(mut self, data: &FormData, prefix: Option<&str>) -> Self
	where
		Self: Sized,
	{
		self.set_prefix(prefix);
		self.process(data);
		self
	}

	fn validate(&mut self) -> bool {
		let mut ok = true;
		for field in self.fields_mut() {
			ok &= field.validate();
		}
		ok
	}

	/// Validation errors by field name, fields without errors omitted
	fn errors(&self) -> BTreeMap<&'static str, Vec<String>> {
		self.fields()
			.into_iter()
			.filter(|field| !field.meta().errors.is_empty())
			.map(|field| (field.meta().name, field.meta().errors.clone()))
			.collect()
	}

	/// Coercion failures as `"{name}: {message}"`
	fn process_errors(&self) -> Vec<String> {
		self.fields()
			.into_iter()
			.flat_map(|field| {
				let name = field.meta().name;
				field.meta().process_errors.iter().map(move |err| format!("{}: {}", name, err))
			})
			.collect()
	}

	/// Fails with a validation error when any field could not be coerced.
	fn ensure_processed(&self) -> ClResult<()> {
		let errors = self.process_errors();
		if errors.is_empty() { Ok(()) } else { Err(Error::ValidationError(errors.join("; "))) }
	}

	/// Fails with every validation error when the form does not validate.
	fn ensure_valid(&mut self) -> ClResult<()> {
		if self.validate() {
			return Ok(());
		}
		let errors = self
			.errors()
			.into_iter()
			.map(|(name, errs)| format!("{}: {}", name, errs.join(" ")))
			.collect::<Vec<_>>();
		Err(Error::ValidationError(errors.join("; ")))
	}

	/// Rendered fields by name, each with `id`, `label`, `widget` and `errors`
	fn render(&self) -> Value {
		let mut rendered = Map::new();
		for field in self.fields() {
			rendered.insert(
				field.meta().name.to_string(),
				json!({
					"id": field.meta().id(),
					"label": field.render_label(),
					"widget": field.render(),
					"errors": field.meta().errors,
				}),
			);
		}
		Value::Object(rendered)
	}
}


// vim: ts=4

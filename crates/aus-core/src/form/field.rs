//! Form fields and their coercion rules

use std::sync::Arc;

use handlebars::html_escape;
use serde_json::{Map, Value};

use super::data::FormData;
use super::validators::{Outcome, Validator};
use super::widget::Widget;
use aus_types::blob::{ReleaseBlob, create_blob};

/// State shared by every field kind
#[derive(Clone, Debug)]
pub struct FieldMeta {
	pub name: &'static str,
	pub label: &'static str,
	pub prefix: Option<Box<str>>,
	pub widget: Widget,
	pub validators: Vec<Validator>,
	pub errors: Vec<String>,
	pub process_errors: Vec<String>,
	/// Values exactly as submitted, `None` when the field was not submitted
	pub raw_data: Option<Vec<String>>,
}

impl FieldMeta {
	pub fn new(name: &'static str, label: &'static str, widget: Widget) -> Self {
		Self {
			name,
			label,
			prefix: None,
			widget,
			validators: Vec::new(),
			errors: Vec::new(),
			process_errors: Vec::new(),
			raw_data: None,
		}
	}

	/// Name used in submitted data and as the HTML id
	pub fn id(&self) -> String {
		match &self.prefix {
			Some(prefix) => format!("{}-{}", prefix, self.name),
			None => self.name.to_string(),
		}
	}
}

pub trait Field: Send + Sync {
	fn meta(&self) -> &FieldMeta;
	fn meta_mut(&mut self) -> &mut FieldMeta;

	/// Coerces the submitted values; `None` when nothing was submitted.
	fn process_formdata(&mut self, values: Option<&[String]>);

	/// Text representation used as the widget's value
	fn value(&self) -> String;

	/// Whether the coerced data counts as present for `Required`
	fn has_data(&self) -> bool;

	fn number(&self) -> Option<i64> {
		None
	}

	fn char_len(&self) -> usize {
		self.value().chars().count()
	}

	/// Checks run before the validator chain
	fn pre_validate(&self) -> Option<String> {
		None
	}

	fn render(&self) -> String {
		self.meta().widget.render_input(&self.meta().id(), &self.value())
	}

	fn render_label(&self) -> String {
		format!(r#"<label for="{}">{}</label>"#, html_escape(&self.meta().id()), html_escape(self.meta().label))
	}

	fn process(&mut self, data: &FormData) {
		let id = self.meta().id();
		let values = data.get(&id);
		self.meta_mut().raw_data = values.map(<[String]>::to_vec);
		self.meta_mut().process_errors.clear();
		self.process_formdata(values);
	}

	fn validate(&mut self) -> bool {
		let mut errors = self.meta().process_errors.clone();
		if errors.is_empty()
			&& let Some(err) = self.pre_validate()
		{
			errors.push(err);
		}
		let validators = self.meta().validators.clone();
		for validator in validators {
			match validator.check(&*self) {
				Outcome::Pass => {}
				Outcome::Fail(msg) => errors.push(msg),
				Outcome::Stop(msg) => {
					errors.push(msg);
					break;
				}
				Outcome::StopClear => {
					errors.clear();
					break;
				}
			}
		}
		let ok = errors.is_empty();
		self.meta_mut().errors = errors;
		ok
	}
}

macro_rules! field_builders {
	($typ:ident $(<$param:ident>)?) => {
		impl$(<$param: Clone + PartialEq + ToString + Send + Sync + 'static>)? $typ$(<$param>)? {
			pub fn validators(mut self, validators: Vec<Validator>) -> Self {
				self.meta.validators = validators;
				self
			}

			pub fn widget(mut self, widget: Widget) -> Self {
				self.meta.widget = widget;
				self
			}
		}
	};
}

fn first_value(values: Option<&[String]>) -> Option<&str> {
	values.and_then(<[String]>::first).map(String::as_str)
}

// StringField //
//*************//
#[derive(Clone, Debug)]
pub struct StringField {
	pub meta: FieldMeta,
	pub data: String,
}

impl StringField {
	pub fn new(name: &'static str, label: &'static str) -> Self {
		Self { meta: FieldMeta::new(name, label, Widget::TextInput), data: String::new() }
	}

	pub fn with_data(mut self, data: impl Into<String>) -> Self {
		self.data = data.into();
		self
	}
}
field_builders!(StringField);

impl Field for StringField {
	fn meta(&self) -> &FieldMeta {
		&self.meta
	}
	fn meta_mut(&mut self) -> &mut FieldMeta {
		&mut self.meta
	}

	fn process_formdata(&mut self, values: Option<&[String]>) {
		if let Some(value) = first_value(values) {
			self.data = value.to_owned();
		}
	}

	fn value(&self) -> String {
		self.data.clone()
	}

	fn has_data(&self) -> bool {
		!self.data.is_empty()
	}
}

// IntegerField //
//**************//
#[derive(Clone, Debug)]
pub struct IntegerField {
	pub meta: FieldMeta,
	pub data: Option<i64>,
}

impl IntegerField {
	pub fn new(name: &'static str, label: &'static str) -> Self {
		Self { meta: FieldMeta::new(name, label, Widget::TextInput), data: None }
	}

	pub fn with_data(mut self, data: Option<i64>) -> Self {
		self.data = data;
		self
	}
}
field_builders!(IntegerField);

impl Field for IntegerField {
	fn meta(&self) -> &FieldMeta {
		&self.meta
	}
	fn meta_mut(&mut self) -> &mut FieldMeta {
		&mut self.meta
	}

	fn process_formdata(&mut self, values: Option<&[String]>) {
		if let Some(value) = first_value(values) {
			let value = value.trim();
			if value.is_empty() {
				self.data = None;
				return;
			}
			match value.parse::<i64>() {
				Ok(n) => self.data = Some(n),
				Err(_) => {
					self.data = None;
					self.meta.process_errors.push("Not a valid integer value".into());
				}
			}
		}
	}

	fn value(&self) -> String {
		self.data.map(|n| n.to_string()).unwrap_or_default()
	}

	fn has_data(&self) -> bool {
		self.data.is_some_and(|n| n != 0)
	}

	fn number(&self) -> Option<i64> {
		self.data
	}
}

// SelectField //
//*************//
/// Turns an optional submitted value into typed data
pub type Coercer<T> = Arc<dyn Fn(Option<&str>) -> Result<Option<T>, String> + Send + Sync>;

/// Lifts `coerce` to optional input: a missing value stays missing instead
/// of being coerced.
pub fn none_or_type<T, F>(coerce: F) -> Coercer<T>
where
	F: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
{
	Arc::new(move |value: Option<&str>| value.map(&coerce).transpose())
}

/// Coerces present values only; a missing value cannot be coerced.
pub fn strict_type<T, F>(coerce: F) -> Coercer<T>
where
	F: Fn(&str) -> Result<T, String> + Send + Sync + 'static,
{
	Arc::new(move |value: Option<&str>| match value {
		Some(value) => coerce(value).map(Some),
		None => Err("No value to coerce".into()),
	})
}

pub fn text(value: &str) -> Result<String, String> {
	Ok(value.to_owned())
}

#[derive(Clone)]
pub struct SelectField<T> {
	pub meta: FieldMeta,
	pub data: Option<T>,
	pub choices: Vec<(String, String)>,
	coerce: Coercer<T>,
}

impl<T: Clone + PartialEq + ToString + Send + Sync + 'static> SelectField<T> {
	pub fn new(name: &'static str, label: &'static str, coerce: Coercer<T>) -> Self {
		let data = coerce(None).ok().flatten();
		Self { meta: FieldMeta::new(name, label, Widget::Select), data, choices: Vec::new(), coerce }
	}

	pub fn choices<I, V, L>(mut self, choices: I) -> Self
	where
		I: IntoIterator<Item = (V, L)>,
		V: Into<String>,
		L: Into<String>,
	{
		self.set_choices(choices);
		self
	}

	pub fn set_choices<I, V, L>(&mut self, choices: I)
	where
		I: IntoIterator<Item = (V, L)>,
		V: Into<String>,
		L: Into<String>,
	{
		self.choices = choices.into_iter().map(|(v, l)| (v.into(), l.into())).collect();
	}

	pub fn with_data(mut self, data: Option<T>) -> Self {
		self.data = data;
		self
	}
}
field_builders!(SelectField<T>);

impl<T: std::fmt::Debug> std::fmt::Debug for SelectField<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SelectField")
			.field("meta", &self.meta)
			.field("data", &self.data)
			.field("choices", &self.choices)
			.finish_non_exhaustive()
	}
}

impl<T: Clone + PartialEq + ToString + Send + Sync + 'static> Field for SelectField<T> {
	fn meta(&self) -> &FieldMeta {
		&self.meta
	}
	fn meta_mut(&mut self) -> &mut FieldMeta {
		&mut self.meta
	}

	fn process_formdata(&mut self, values: Option<&[String]>) {
		match first_value(values) {
			Some(value) => match (self.coerce)(Some(value)) {
				Ok(data) => self.data = data,
				Err(_) => {
					self.data = None;
					self.meta.process_errors.push("Invalid Choice: could not coerce".into());
				}
			},
			None => self.data = (self.coerce)(None).ok().flatten(),
		}
	}

	fn value(&self) -> String {
		self.data.as_ref().map(ToString::to_string).unwrap_or_default()
	}

	fn has_data(&self) -> bool {
		self.data.as_ref().is_some_and(|d| !d.to_string().is_empty())
	}

	fn pre_validate(&self) -> Option<String> {
		if self.choices.is_empty() {
			return None;
		}
		let selected = self.data.as_ref().map(ToString::to_string);
		if self.choices.iter().any(|(value, _)| Some(value) == selected.as_ref()) {
			None
		} else {
			Some("Not a valid choice".into())
		}
	}

	fn render(&self) -> String {
		Widget::render_select(&self.meta.id(), &self.choices, Some(self.value().as_str()))
	}
}

// NullableStringField //
//*********************//
/// String field that stores an empty or missing value as `None`
#[derive(Clone, Debug)]
pub struct NullableStringField {
	pub meta: FieldMeta,
	pub data: Option<String>,
}

impl NullableStringField {
	pub fn new(name: &'static str, label: &'static str) -> Self {
		Self { meta: FieldMeta::new(name, label, Widget::TextInput), data: None }
	}

	pub fn with_data(mut self, data: Option<String>) -> Self {
		self.data = data;
		self
	}
}
field_builders!(NullableStringField);

impl Field for NullableStringField {
	fn meta(&self) -> &FieldMeta {
		&self.meta
	}
	fn meta_mut(&mut self) -> &mut FieldMeta {
		&mut self.meta
	}

	fn process_formdata(&mut self, values: Option<&[String]>) {
		self.data = match first_value(values) {
			Some(value) if !value.is_empty() => Some(value.to_owned()),
			_ => {
				tracing::debug!(field = self.meta.name, "No value or empty string, setting it to NULL");
				None
			}
		};
	}

	fn value(&self) -> String {
		self.data.clone().unwrap_or_default()
	}

	fn has_data(&self) -> bool {
		self.data.as_ref().is_some_and(|d| !d.is_empty())
	}

	fn char_len(&self) -> usize {
		self.data.as_ref().map_or(0, |d| d.chars().count())
	}
}

// JsonStringField //
//*****************//
fn json_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(a) => !a.is_empty(),
		Value::Object(o) => !o.is_empty(),
	}
}

pub fn empty_object() -> Value {
	Value::Object(Map::new())
}

pub fn empty_array() -> Value {
	Value::Array(Vec::new())
}

/// String field holding parsed JSON
#[derive(Clone, Debug)]
pub struct JsonStringField {
	pub meta: FieldMeta,
	pub data: Option<Value>,
	default: fn() -> Value,
}

impl JsonStringField {
	pub fn new(name: &'static str, label: &'static str) -> Self {
		Self {
			meta: FieldMeta::new(name, label, Widget::TextInput),
			data: Some(empty_object()),
			default: empty_object,
		}
	}

	/// Value used when nothing (or an empty string) is submitted
	pub fn with_default(mut self, default: fn() -> Value) -> Self {
		self.default = default;
		self.data = Some(default());
		self
	}

	pub fn with_data(mut self, data: Option<Value>) -> Self {
		self.data = data;
		self
	}
}
field_builders!(JsonStringField);

impl Field for JsonStringField {
	fn meta(&self) -> &FieldMeta {
		&self.meta
	}
	fn meta_mut(&mut self) -> &mut FieldMeta {
		&mut self.meta
	}

	fn process_formdata(&mut self, values: Option<&[String]>) {
		match first_value(values) {
			Some(value) if !value.is_empty() => match serde_json::from_str(value) {
				Ok(data) => self.data = Some(data),
				Err(err) => {
					tracing::debug!(field = self.meta.name, "Invalid JSON submitted: {}", err);
					self.meta.process_errors.push(err.to_string());
				}
			},
			_ => {
				tracing::debug!(field = self.meta.name, "No value, setting data to default");
				self.data = Some((self.default)());
			}
		}
	}

	fn value(&self) -> String {
		match &self.data {
			Some(Value::Null) | None => String::new(),
			Some(data) => data.to_string(),
		}
	}

	fn has_data(&self) -> bool {
		self.data.as_ref().is_some_and(json_truthy)
	}
}

// JsonBlobField //
//***************//
/// Field parsing the submitted text into a validated release blob
#[derive(Clone, Debug)]
pub struct JsonBlobField {
	pub meta: FieldMeta,
	pub data: Option<ReleaseBlob>,
}

impl JsonBlobField {
	pub fn new(name: &'static str, label: &'static str) -> Self {
		Self { meta: FieldMeta::new(name, label, Widget::FileInput), data: None }
	}
}
field_builders!(JsonBlobField);

impl Field for JsonBlobField {
	fn meta(&self) -> &FieldMeta {
		&self.meta
	}
	fn meta_mut(&mut self) -> &mut FieldMeta {
		&mut self.meta
	}

	fn process_formdata(&mut self, values: Option<&[String]>) {
		if let Some(value) = first_value(values).filter(|v| !v.is_empty()) {
			match create_blob(value).and_then(|blob| blob.is_valid().map(|()| blob)) {
				Ok(blob) => self.data = Some(blob),
				Err(err) => {
					self.data = None;
					self.meta.process_errors.push(err.to_string());
				}
			}
		}
	}

	fn value(&self) -> String {
		self.data.as_ref().map(ToString::to_string).unwrap_or_default()
	}

	fn has_data(&self) -> bool {
		self.data.is_some()
	}
}


// vim: ts=4

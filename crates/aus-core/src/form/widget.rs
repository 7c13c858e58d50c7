//! HTML widgets rendering form fields

use handlebars::html_escape;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Widget {
	TextInput,
	HiddenInput,
	FileInput,
	Select,
	/// Text input that can be rendered read-only for the browser
	DisableableTextInput { disabled: bool },
}

impl Widget {
	fn input_type(self) -> &'static str {
		match self {
			Widget::HiddenInput => "hidden",
			Widget::FileInput => "file",
			Widget::TextInput | Widget::Select | Widget::DisableableTextInput { .. } => "text",
		}
	}

	pub fn render_input(self, id: &str, value: &str) -> String {
		let id = html_escape(id);
		let mut html = format!(r#"<input id="{}" name="{}" type="{}""#, id, id, self.input_type());
		if let Widget::DisableableTextInput { disabled: true } = self {
			html.push_str(r#" disabled="disabled""#);
		}
		// Browsers never prefill file inputs
		if self != Widget::FileInput {
			html.push_str(&format!(r#" value="{}""#, html_escape(value)));
		}
		html.push('>');
		html
	}

	pub fn render_select(id: &str, choices: &[(String, String)], selected: Option<&str>) -> String {
		let id = html_escape(id);
		let mut html = format!(r#"<select id="{}" name="{}">"#, id, id);
		for (value, label) in choices {
			let sel = if selected == Some(value.as_str()) { " selected" } else { "" };
			html.push_str(&format!(
				r#"<option{} value="{}">{}</option>"#,
				sel,
				html_escape(value),
				html_escape(label)
			));
		}
		html.push_str("</select>");
		html
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_disableable_text_input() {
		let enabled = Widget::DisableableTextInput { disabled: false }.render_input("p-permission", "/rules");
		assert_eq!(enabled, r#"<input id="p-permission" name="p-permission" type="text" value="/rules">"#);

		let disabled = Widget::DisableableTextInput { disabled: true }.render_input("permission", "admin");
		assert!(disabled.contains(r#"disabled="disabled""#));
	}

	#[test]
	fn test_inputs_escape_values() {
		let html = Widget::HiddenInput.render_input("data_version", r#""><script>"#);
		assert!(html.contains(r#"type="hidden""#));
		assert!(!html.contains("<script>"));

		let html = Widget::FileInput.render_input("blob", "ignored");
		assert!(!html.contains("value="));
	}

	#[test]
	fn test_select() {
		let choices = vec![("minor".to_string(), "minor".to_string()), ("major".to_string(), "major".to_string())];
		let html = Widget::render_select("update_type", &choices, Some("major"));
		assert!(html.contains(r#"<option value="minor">minor</option>"#));
		assert!(html.contains(r#"<option selected value="major">major</option>"#));
	}
}

// vim: ts=4

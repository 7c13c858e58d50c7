//! Field validators
//!
//! Validators run in order after coercion. A failing validator records its
//! message; `Required` and `Optional` can also stop the chain.

use super::field::Field;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validator {
	/// Coerced data must be truthy
	Required,
	/// Missing or blank input clears errors and skips the remaining validators
	Optional,
	NumberRange { min: Option<i64>, max: Option<i64> },
	/// Length in characters; missing data counts as zero
	Length { min: usize, max: Option<usize> },
}

pub(crate) enum Outcome {
	Pass,
	Fail(String),
	Stop(String),
	StopClear,
}

impl Validator {
	pub fn number_range(min: i64, max: i64) -> Self {
		Validator::NumberRange { min: Some(min), max: Some(max) }
	}

	pub fn length(min: usize, max: usize) -> Self {
		Validator::Length { min, max: Some(max) }
	}

	pub(crate) fn check<F: Field + ?Sized>(self, field: &F) -> Outcome {
		match self {
			Validator::Required => {
				if field.has_data() {
					Outcome::Pass
				} else {
					Outcome::Stop("This field is required.".into())
				}
			}
			Validator::Optional => {
				let blank = field
					.meta()
					.raw_data
					.as_ref()
					.and_then(|raw| raw.first())
					.is_none_or(|first| first.trim().is_empty());
				if blank { Outcome::StopClear } else { Outcome::Pass }
			}
			Validator::NumberRange { min, max } => {
				let in_range = field.number().is_some_and(|n| {
					min.is_none_or(|min| n >= min) && max.is_none_or(|max| n <= max)
				});
				if in_range {
					Outcome::Pass
				} else {
					Outcome::Fail(match (min, max) {
						(Some(min), Some(max)) => format!("Number must be between {} and {}.", min, max),
						(Some(min), None) => format!("Number must be at least {}.", min),
						(None, Some(max)) => format!("Number must be at most {}.", max),
						(None, None) => "Invalid number.".into(),
					})
				}
			}
			Validator::Length { min, max } => {
				let len = field.char_len();
				if len < min || max.is_some_and(|max| len > max) {
					Outcome::Fail(match max {
						Some(max) => {
							format!("Field must be between {} and {} characters long.", min, max)
						}
						None => format!("Field must be at least {} characters long.", min),
					})
				} else {
					Outcome::Pass
				}
			}
		}
	}
}

// vim: ts=4

//! Declaration entries and the import-line declaration syntax.
//!
//! Each line declares one name:
//!
//! ```text
//! import pkg.module01 as exmodule
//! from .module02 import function02 as exfunct
//! from module02 import ClassTwo
//! ```
//!
//! The bound name is always the last word of the line. Lines are parsed into
//! typed [`Recipe`]s and never executed as text.

use crate::error::DeclareError;
use crate::recipe::Recipe;

/// One `(name, recipe)` pair awaiting registration.
#[derive(Debug, Clone)]
pub struct Declaration<V> {
	pub name: String,
	pub recipe: Recipe<V>,
}

impl<V> Declaration<V> {
	pub fn new(name: impl Into<String>, recipe: Recipe<V>) -> Self {
		Self { name: name.into(), recipe }
	}
}

/// Parses a single import-style declaration line.
pub fn parse_import_line<V>(line: &str) -> Result<Declaration<V>, DeclareError> {
	let tokens: Vec<&str> = line.split_whitespace().collect();
	let owned = || line.trim().to_string();

	match tokens.as_slice() {
		["import", location, rest @ ..] => {
			let location = unit_location(line, location)?;
			let name = alias_or(line, rest, &location, true)?;
			Ok(Declaration::new(name, Recipe::unit(location)))
		}
		["from", location, "import", symbol, rest @ ..] => {
			let location = unit_location(line, location)?;
			check_identifier(line, symbol)?;
			let name = alias_or(line, rest, symbol, false)?;
			Ok(Declaration::new(name, Recipe::symbol(location, *symbol)))
		}
		["from", _, ..] => Err(DeclareError::MissingImport(owned())),
		_ => Err(DeclareError::UnknownForm(owned())),
	}
}

/// Parses a block of declaration lines, skipping blanks and `#` comments.
pub fn parse_import_block<V>(text: &str) -> Result<Vec<Declaration<V>>, DeclareError> {
	text.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty() && !line.starts_with('#'))
		.map(parse_import_line)
		.collect()
}

/// Strips a single package-relative `.` prefix and validates each dotted segment.
///
/// Parent-relative locations (`..unit`) are rejected rather than rebased.
fn unit_location(line: &str, raw: &str) -> Result<String, DeclareError> {
	let location = raw.strip_prefix('.').unwrap_or(raw);
	if location.is_empty() || !location.split('.').all(is_identifier) {
		return Err(DeclareError::InvalidName {
			line: line.trim().to_string(),
			name: raw.to_string(),
		});
	}
	Ok(location.to_string())
}

fn alias_or(line: &str, rest: &[&str], default: &str, dotted_default: bool) -> Result<String, DeclareError> {
	match rest {
		[] => {
			if !dotted_default {
				check_identifier(line, default)?;
			}
			Ok(default.to_string())
		}
		["as", alias] => {
			check_identifier(line, alias)?;
			Ok((*alias).to_string())
		}
		_ => Err(DeclareError::Trailing(line.trim().to_string())),
	}
}

fn check_identifier(line: &str, name: &str) -> Result<(), DeclareError> {
	if is_identifier(name) {
		Ok(())
	} else {
		Err(DeclareError::InvalidName {
			line: line.trim().to_string(),
			name: name.to_string(),
		})
	}
}

pub(crate) fn is_identifier(s: &str) -> bool {
	let mut chars = s.chars();
	match chars.next() {
		Some(c) if c == '_' || c.is_alphabetic() => chars.all(|c| c == '_' || c.is_alphanumeric()),
		_ => false,
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;

	use super::*;

	fn parse(line: &str) -> Declaration<()> {
		parse_import_line(line).unwrap()
	}

	#[rstest]
	#[case("import pkg.module01 as exmodule", "exmodule", "import pkg.module01")]
	#[case("import pkg.module01", "pkg.module01", "import pkg.module01")]
	#[case("from .module02 import function02 as exfunct", "exfunct", "from module02 import function02")]
	#[case("from module02 import ClassTwo as ExClass", "ExClass", "from module02 import ClassTwo")]
	#[case("from module02 import ClassTwo", "ClassTwo", "from module02 import ClassTwo")]
	#[case("  import   spaced   as   s  ", "s", "import spaced")]
	fn parses_declaration_forms(#[case] line: &str, #[case] name: &str, #[case] recipe: &str) {
		let decl = parse(line);
		assert_eq!(decl.name, name);
		assert_eq!(decl.recipe.to_string(), recipe);
	}

	#[rstest]
	#[case("", DeclareError::UnknownForm(String::new()))]
	#[case("export x", DeclareError::UnknownForm("export x".into()))]
	#[case("from pkg", DeclareError::MissingImport("from pkg".into()))]
	#[case("from pkg include x", DeclareError::MissingImport("from pkg include x".into()))]
	#[case("import a as b c", DeclareError::Trailing("import a as b c".into()))]
	#[case("from pkg import a, b", DeclareError::InvalidName { line: "from pkg import a, b".into(), name: "a,".into() })]
	#[case("import pkg as 9lives", DeclareError::InvalidName { line: "import pkg as 9lives".into(), name: "9lives".into() })]
	#[case("import .", DeclareError::InvalidName { line: "import .".into(), name: ".".into() })]
	#[case("import a..b", DeclareError::InvalidName { line: "import a..b".into(), name: "a..b".into() })]
	#[case("from ..sibling import x", DeclareError::InvalidName { line: "from ..sibling import x".into(), name: "..sibling".into() })]
	#[case("import ...deep", DeclareError::InvalidName { line: "import ...deep".into(), name: "...deep".into() })]
	fn rejects_malformed_lines(#[case] line: &str, #[case] expected: DeclareError) {
		assert_eq!(parse_import_line::<()>(line).unwrap_err(), expected);
	}

	#[test]
	fn block_skips_blanks_and_comments() {
		let decls: Vec<Declaration<()>> = parse_import_block(
			"
			# modules
			import pkg.module01 as exmodule

			from .module02 import function02 as exfunct
			",
		)
		.unwrap();
		let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
		assert_eq!(names, ["exmodule", "exfunct"]);
	}

	#[test]
	fn block_reports_first_bad_line() {
		let err = parse_import_block::<()>("import ok\nnonsense here\n").unwrap_err();
		assert_eq!(err, DeclareError::UnknownForm("nonsense here".into()));
	}
}

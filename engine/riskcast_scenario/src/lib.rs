//! Scenario text for the custom risk calculator.
//!
//! A scenario is a list of `factor = value` assignments separated by
//! commas, semicolons or newlines, with `#` comments:
//!
//! ```text
//! # riverside district after a wet week
//! infrastructure_strength = 8, soil_moisture_retention = 7
//! vegetation_density = 6; soil_type = "clay"
//! rainfall_mm = 50
//! ```
//!
//! Parsing is forgiving: malformed segments and unknown factors become
//! diagnostics while the rest of the scenario is still used.

pub mod build;
pub mod diagnostics;
pub mod parser;

pub use build::{build_input, load_scenario};
pub use diagnostics::{has_errors, render_snippet, Diagnostic, Severity, Span};
pub use parser::{parse_scenario, parse_scenario_recovering, Assignment, Literal};

//! The driver script the engine executes: it calls the target with purely
//! symbolic arguments and appends one JSON line per explored execution to
//! the log.

use crate::literal::escape_single_quoted;

/// Everything the driver script needs to know, with paths as seen from
/// inside the engine container.
#[derive(Debug, Clone)]
pub struct DriverSpec {
    /// Target file, relative to the project root.
    pub file_path: String,
    /// Expression evaluated with the symbolic arguments, e.g. `module.parse`.
    pub call_expression: String,
    /// Number of symbolic arguments passed to the call.
    pub args_number: usize,
    /// Mount point of the project root.
    pub project_mount: String,
    /// Log the driver appends its JSON lines to.
    pub log_path: String,
    /// The engine's cycle-safe JSON encoder module.
    pub safe_json_module: String,
}

impl DriverSpec {
    /// Names of the symbolic placeholders, `X0` through `X{n-1}`.
    pub fn symbol_names(&self) -> Vec<String> {
        (0..self.args_number).map(|i| format!("X{i}")).collect()
    }

    /// Path of the target module inside the container.
    pub fn module_path(&self) -> String {
        let file = self.file_path.trim_start_matches("./");
        format!("{}/{}", self.project_mount.trim_end_matches('/'), file)
    }
}

/// Render the driver script source.
pub fn render_driver(spec: &DriverSpec) -> String {
    let symbols = spec.symbol_names();
    let args = symbols.join(", ");
    let declarations: String = symbols
        .iter()
        .map(|name| format!("var {name} = S$.pureSymbol('{name}');\n"))
        .collect();
    let log_path = escape_single_quoted(&spec.log_path);

    format!(
        "var fs = require('fs');
var S$ = require('S$');
{declarations}var module = require('{module}');
var safeJson = require('{safe_json}');

try {{
  var result = {call}({args});
  fs.appendFileSync(
    '{log_path}',
    Buffer.from(safeJson.stringify({{ input: [{args}], result: result }}) + \"\\n\", 'utf-8')
  );
}} catch (e) {{
  fs.appendFileSync(
    '{log_path}',
    Buffer.from(safeJson.stringify({{ input: [{args}], error: e.message }}) + \"\\n\", 'utf-8')
  );
}}
",
        module = escape_single_quoted(&spec.module_path()),
        safe_json = escape_single_quoted(&spec.safe_json_module),
        call = spec.call_expression,
    )
}

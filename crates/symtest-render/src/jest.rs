//! Jest test-file generation from normalized test cases.

use symtest_ir::record::{TestCase, TestOutcome};

use crate::literal::{escape_single_quoted, render_literal};

/// Inputs for one generated test file.
#[derive(Debug, Clone, Copy)]
pub struct TestFile<'a> {
    /// Target file, relative to the directory the test file is written to.
    pub file_path: &'a str,
    pub call_expression: &'a str,
    pub cases: &'a [TestCase],
}

/// Render the call with literal arguments, e.g. `module.f("a", 1)`.
fn render_call(case: &TestCase, call_expression: &str) -> String {
    let args: Vec<String> = case.input.iter().map(render_literal).collect();
    format!("{call_expression}({})", args.join(", "))
}

/// Render the single assertion for one test case.
pub fn render_assertion(case: &TestCase, call_expression: &str) -> String {
    let call = render_call(case, call_expression);
    match &case.outcome {
        TestOutcome::Returns(expected) => {
            format!("expect({call}).toEqual({})", render_literal(expected))
        }
        TestOutcome::Throws(message) => {
            format!(
                "expect(() => {call}).toThrow('{}')",
                escape_single_quoted(message)
            )
        }
    }
}

/// Render the whole test module: default import of the target, one
/// `describe` per call expression, one assertion per case in order.
pub fn render_test_file(file: &TestFile<'_>) -> String {
    let call_name = escape_single_quoted(file.call_expression);
    let test_name = escape_single_quoted(&format!("{}{}", file.file_path, file.call_expression));

    let mut out = String::new();
    out.push_str(&format!(
        "import module from './{}'\n\n",
        escape_single_quoted(file.file_path)
    ));
    out.push_str(&format!("describe('{call_name}', () => {{\n"));
    out.push_str(&format!("  test('{test_name}', () => {{\n"));
    for case in file.cases {
        out.push_str("    ");
        out.push_str(&render_assertion(case, file.call_expression));
        out.push('\n');
    }
    out.push_str("  })\n");
    out.push_str("})\n");
    out
}

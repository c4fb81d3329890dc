use symtest_ir::parse::parse_test_cases;
use symtest_ir::record::{TestCase, TestOutcome};
use symtest_ir::value::ConcreteValue;
use symtest_render::jest::{render_assertion, render_test_file, TestFile};
use symtest_render::literal::{escape_single_quoted, render_literal};

fn returns(input: Vec<ConcreteValue>, result: ConcreteValue) -> TestCase {
    TestCase {
        input,
        outcome: TestOutcome::Returns(result),
    }
}

fn throws(input: Vec<ConcreteValue>, message: &str) -> TestCase {
    TestCase {
        input,
        outcome: TestOutcome::Throws(message.to_string()),
    }
}

#[test]
fn test_result_assertion_uses_deep_equality() {
    let case = returns(
        vec![ConcreteValue::from("a"), ConcreteValue::from(2)],
        ConcreteValue::object([("ok", ConcreteValue::from(true))]),
    );
    assert_eq!(
        render_assertion(&case, "module.check"),
        r#"expect(module.check("a", 2)).toEqual({"ok":true})"#
    );
}

#[test]
fn test_error_assertion_escapes_single_quotes() {
    let case = throws(vec![ConcreteValue::from("")], "Input can't be empty");
    assert_eq!(
        render_assertion(&case, "module.check"),
        r#"expect(() => module.check("")).toThrow('Input can\'t be empty')"#
    );
}

#[test]
fn test_empty_error_message_renders_bare_throw() {
    let case = throws(vec![ConcreteValue::from("")], "");
    assert_eq!(
        render_assertion(&case, "module.check"),
        r#"expect(() => module.check("")).toThrow('')"#
    );
}

#[test]
fn test_undefined_renders_as_keyword() {
    let case = returns(
        vec![ConcreteValue::object([("testProp", ConcreteValue::Undefined)])],
        ConcreteValue::Undefined,
    );
    assert_eq!(
        render_assertion(&case, "f"),
        r#"expect(f({"testProp":undefined})).toEqual(undefined)"#
    );
}

#[test]
fn test_no_arguments() {
    let case = returns(vec![], ConcreteValue::Null);
    assert_eq!(render_assertion(&case, "module.now"), "expect(module.now()).toEqual(null)");
}

#[test]
fn test_escape_single_quoted() {
    assert_eq!(escape_single_quoted("it's"), r"it\'s");
    assert_eq!(escape_single_quoted(r"a\b"), r"a\\b");
    assert_eq!(escape_single_quoted("two\nlines"), r"two\nlines");
    assert_eq!(escape_single_quoted("plain"), "plain");
}

#[test]
fn test_string_literals_are_json_encoded() {
    assert_eq!(render_literal(&ConcreteValue::from("say \"hi\"")), r#""say \"hi\"""#);
    assert_eq!(
        render_literal(&ConcreteValue::Array(vec![ConcreteValue::from("")])),
        r#"[""]"#
    );
}

#[test]
fn test_two_line_log_renders_two_ordered_assertions() {
    let log = concat!(
        r#"{"input":[{"concrete":"x","symbolic":{}}],"result":{"concrete":1}}"#,
        "\n",
        r#"{"input":[{"concrete":"","symbolic":{}}],"error":"Input can't be empty"}"#,
        "\n",
    );
    let cases = parse_test_cases(log).unwrap();
    let text = render_test_file(&TestFile {
        file_path: "src/validate.js",
        call_expression: "module.validate",
        cases: &cases,
    });

    let expected = "import module from './src/validate.js'

describe('module.validate', () => {
  test('src/validate.jsmodule.validate', () => {
    expect(module.validate(\"x\")).toEqual(1)
    expect(() => module.validate(\"\")).toThrow('Input can\\'t be empty')
  })
})
";
    assert_eq!(text, expected);
}

#[test]
fn test_empty_case_list_still_renders_block() {
    let text = render_test_file(&TestFile {
        file_path: "a.js",
        call_expression: "module",
        cases: &[],
    });
    assert!(text.contains("describe('module'"));
    assert!(!text.contains("expect("));
}

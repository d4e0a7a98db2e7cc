use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{RewriteRule, Replacement, brace};

/// Prefix carried by the name of a restricted-visibility member.
pub const PRIVACY_MARKER: &str = "#";

static PUBLIC_STATIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bpublic[ \t]+static[ \t]+").unwrap());
static PUBLIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bpublic[ \t]+").unwrap());
static PRIVATE_STATIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bprivate[ \t]+static[ \t]+").unwrap());
static PRIVATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bprivate[ \t]+").unwrap());

// One physical line: a multi-line argument list keeps its continuation lines.
static DECORATOR_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^([ \t]*)(@[A-Za-z_$][\w$]*\([^\r\n]*)(\r?\n|\z)").unwrap()
});

static PRIVATE_ACCESSOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"{}(get|set)[ \t]+([A-Za-z_$])",
        regex::escape(PRIVACY_MARKER)
    ))
    .unwrap()
});

static IMPORT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*import[ \t].*(?:\r?\n|\z)").unwrap());

static WRAPPER_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?m)^[ \t]*(?:export[ \t]+)?(?:declare[ \t]+)?(?:module|namespace)[ \t]+",
        r"[A-Za-z_$][\w$]*(?:\.[A-Za-z_$][\w$]*)*[ \t]*\{[ \t]*(?:\r?\n|\z)",
    ))
    .unwrap()
});

static TRAILING_BRACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\r?\n)?[ \t]*\}\s*\z").unwrap());

/// The adjust pipeline, in the order it must run.
pub fn default_rules() -> Vec<RewriteRule> {
    vec![
        public_static(),
        public(),
        private_static(),
        private(),
        decorator_line(),
        private_accessor(),
        import_line(),
        wrapper_open(),
        wrapper_close(),
    ]
}

/// [`default_rules`] with the wrapper's closing brace removed by an
/// end-of-file match instead of brace depth. Only correct when the wrapper's
/// brace is the last non-whitespace character and the file has a wrapper.
pub fn end_anchored_rules() -> Vec<RewriteRule> {
    let mut rules = default_rules();
    rules.pop();
    rules.push(wrapper_close_end_anchored());
    rules
}

pub fn public_static() -> RewriteRule {
    RewriteRule::regex("public-static", PUBLIC_STATIC.clone(), Replacement::Literal("static "))
}

pub fn public() -> RewriteRule {
    RewriteRule::regex("public", PUBLIC.clone(), Replacement::Literal(""))
}

pub fn private_static() -> RewriteRule {
    RewriteRule::regex(
        "private-static",
        PRIVATE_STATIC.clone(),
        Replacement::Captures(|_| format!("static {PRIVACY_MARKER}")),
    )
}

pub fn private() -> RewriteRule {
    RewriteRule::regex("private", PRIVATE.clone(), Replacement::Literal(PRIVACY_MARKER))
}

/// Drops a line holding only a decorator. When the argument list closes on
/// the same line and code follows it (`@Input() width: number;`), only the
/// decorator goes and the code keeps its indentation.
pub fn decorator_line() -> RewriteRule {
    RewriteRule::regex(
        "decorator-line",
        DECORATOR_LINE.clone(),
        Replacement::Captures(|caps: &Captures| {
            let rest = code_after_arguments(&caps[2]).trim();
            if rest.is_empty() {
                String::new()
            } else {
                format!("{}{rest}{}", &caps[1], &caps[3])
            }
        }),
    )
}

/// Text after the parenthesised argument list that opens in `decorator`, or
/// `""` when the list does not close on this line.
fn code_after_arguments(decorator: &str) -> &str {
    let mut depth = 0usize;
    for (i, b) in decorator.bytes().enumerate() {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &decorator[i + 1..];
                }
            }
            _ => {}
        }
    }
    ""
}

/// `#get X` → `get #X`, the shape left behind by [`private`] on an accessor.
pub fn private_accessor() -> RewriteRule {
    RewriteRule::regex(
        "private-accessor",
        PRIVATE_ACCESSOR.clone(),
        Replacement::Captures(|caps: &Captures| {
            format!("{} {PRIVACY_MARKER}{}", &caps[1], &caps[2])
        }),
    )
}

pub fn import_line() -> RewriteRule {
    RewriteRule::regex("import-line", IMPORT_LINE.clone(), Replacement::Literal(""))
}

pub fn wrapper_open() -> RewriteRule {
    RewriteRule::regex_first("wrapper-open", WRAPPER_OPEN.clone(), Replacement::Literal(""))
}

pub fn wrapper_close() -> RewriteRule {
    RewriteRule::structural("wrapper-close", brace::strip_wrapper_close)
}

pub fn wrapper_close_end_anchored() -> RewriteRule {
    RewriteRule::regex_first(
        "wrapper-close-end-anchored",
        TRAILING_BRACE.clone(),
        Replacement::Literal(""),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RuleEngine;

    fn run(rule: RewriteRule, input: &str) -> String {
        rule.apply(input).unwrap_or_else(|| input.to_string())
    }

    #[test]
    fn public_static_rule() {
        assert_eq!(run(public_static(), "  public static Offset(...)"), "  static Offset(...)");
        assert_eq!(run(public_static(), "republic static x"), "republic static x");
    }

    #[test]
    fn public_rule() {
        assert_eq!(run(public(), "public width: number;"), "width: number;");
        assert_eq!(
            run(public(), "constructor(public x: number) {}"),
            "constructor(x: number) {}"
        );
        assert!(public().apply("const publicKey = 1;").is_none());
    }

    #[test]
    fn private_static_rule() {
        assert_eq!(run(private_static(), "private static unit = 1;"), "static #unit = 1;");
    }

    #[test]
    fn private_rule() {
        assert_eq!(run(private(), "    private cache: number[];"), "    #cache: number[];");
    }

    #[test]
    fn decorator_rule_removes_whole_line() {
        let input = "class A {\n    @Input()\n    width: number;\n}\n";
        assert_eq!(run(decorator_line(), input), "class A {\n    width: number;\n}\n");

        let last = "x = 1;\n  @Output('changed')";
        assert_eq!(run(decorator_line(), last), "x = 1;\n");
    }

    #[test]
    fn decorator_rule_keeps_code_on_the_same_line() {
        assert_eq!(
            run(decorator_line(), "    @Input() width: number;\n"),
            "    width: number;\n"
        );
        assert_eq!(
            run(decorator_line(), "  @HostListener('click', fn(a)) onClick() {}\r\n"),
            "  onClick() {}\r\n"
        );
        assert_eq!(run(decorator_line(), "@Input()   \nx;\n"), "x;\n");
    }

    #[test]
    fn decorator_rule_ignores_inline_at_signs() {
        let input = "const email = 'a@b(c)';\n";
        assert!(decorator_line().apply(input).is_none());
    }

    #[test]
    fn multi_line_decorator_keeps_continuation_lines() {
        let input = concat!(
            "    @Component({\n",
            "        selector: 'offset',\n",
            "    })\n",
            "    width: number;\n",
        );
        assert_eq!(
            run(decorator_line(), input),
            "        selector: 'offset',\n    })\n    width: number;\n"
        );
    }

    #[test]
    fn accessor_rule_moves_marker() {
        assert_eq!(run(private_accessor(), "#get X(): number {"), "get #X(): number {");
        assert_eq!(run(private_accessor(), "#set X(v: number) {"), "set #X(v: number) {");
        assert_eq!(run(private_accessor(), "static #get Zero() {"), "static get #Zero() {");
        assert!(private_accessor().apply("#getter = 1;").is_none());
    }

    #[test]
    fn accessor_pattern_follows_marker() {
        assert!(PRIVATE_ACCESSOR.as_str().starts_with(&regex::escape(PRIVACY_MARKER)));
        let marked = format!("{PRIVACY_MARKER}set Width(v) {{");
        assert_eq!(
            run(private_accessor(), &marked),
            format!("set {PRIVACY_MARKER}Width(v) {{")
        );
    }

    #[test]
    fn import_rule() {
        let input = "import Foo.Bar;\n    import Baz = R3.Baz;\nlet x = importance;\n";
        assert_eq!(run(import_line(), input), "let x = importance;\n");
    }

    #[test]
    fn wrapper_open_rule_removes_first_header_only() {
        assert_eq!(run(wrapper_open(), "module R3.Geometry {\nx;\n}"), "x;\n}");
        assert_eq!(run(wrapper_open(), "export namespace A {\r\nx;\n}"), "x;\n}");
        assert_eq!(
            run(wrapper_open(), "module A {\n}\nmodule B {\n}\n"),
            "}\nmodule B {\n}\n"
        );
    }

    #[test]
    fn wrapper_close_rule_is_depth_aware() {
        assert_eq!(
            run(wrapper_close(), "class A {\n}\n}\n// trailer\n"),
            "class A {\n}\n// trailer\n"
        );
        assert!(wrapper_close().apply("class A {\n}\n").is_none());
    }

    #[test]
    fn end_anchored_close_strips_last_brace() {
        assert_eq!(run(wrapper_close_end_anchored(), "x;\n}"), "x;");
        assert_eq!(run(wrapper_close_end_anchored(), "x;\n}\n\n"), "x;");
    }

    // The end-anchored variant assumes the file's final brace belongs to the
    // wrapper. Both cases below break that assumption.
    #[test]
    fn end_anchored_close_breaks_on_trailing_nested_brace() {
        let engine = RuleEngine::new(end_anchored_rules());

        // No wrapper: the class's own closing brace is taken.
        let unwrapped = "class Offset {\n    x = 0;\n}";
        assert_eq!(engine.apply(unwrapped), "class Offset {\n    x = 0;");
        assert_eq!(RuleEngine::default().apply(unwrapped), unwrapped);

        // Content after the wrapper: nothing matches, the wrapper brace stays.
        let trailer = "module R3.Geometry {\nclass Offset {\n}\n}\n// end of Offset\n";
        assert_eq!(engine.apply(trailer), "class Offset {\n}\n}\n// end of Offset\n");
        assert_eq!(
            RuleEngine::default().apply(trailer),
            "class Offset {\n}\n// end of Offset\n"
        );
    }

    #[test]
    fn second_wrapper_block_is_left_unbalanced() {
        let input = "module A {\nlet a;\n}\nmodule B {\nlet b;\n}\n";
        assert_eq!(
            RuleEngine::default().apply(input),
            "let a;\nmodule B {\nlet b;\n}\n"
        );
    }
}

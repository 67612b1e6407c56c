//! Built-in security rules
//!
//! A small bandit-compatible rule set evaluated over the tree-sitter syntax
//! tree. Rule ids follow bandit's numbering so reports read the same whichever
//! scanner produced them.

use super::parser::{line_of, named_children, node_text, parse_python, string_value, visit};
use super::{Confidence, ScanError, SecurityFinding, SecurityScanner, Severity};
use tree_sitter::Node;

/// Extra requirement on a call's keyword arguments
#[derive(Debug, Clone, Copy)]
enum CallCondition {
    Always,
    /// keyword present and set to `True`
    KeywordTrue(&'static str),
    /// keyword present and set to `False`
    KeywordFalse(&'static str),
    /// keyword absent
    KeywordMissing(&'static str),
}

struct CallRule {
    id: &'static str,
    callees: &'static [&'static str],
    condition: CallCondition,
    severity: Severity,
    confidence: Confidence,
    text: &'static str,
}

const CALL_RULES: &[CallRule] = &[
    CallRule {
        id: "B102",
        callees: &["exec"],
        condition: CallCondition::Always,
        severity: Severity::Medium,
        confidence: Confidence::High,
        text: "Use of exec detected.",
    },
    CallRule {
        id: "B301",
        callees: &[
            "pickle.loads",
            "pickle.load",
            "pickle.Unpickler",
            "cPickle.loads",
            "cPickle.load",
            "dill.loads",
            "dill.load",
            "shelve.open",
        ],
        condition: CallCondition::Always,
        severity: Severity::Medium,
        confidence: Confidence::High,
        text: "Pickle and modules that wrap it can be unsafe when used to deserialize untrusted data, possible security issue.",
    },
    CallRule {
        id: "B302",
        callees: &["marshal.loads", "marshal.load"],
        condition: CallCondition::Always,
        severity: Severity::Medium,
        confidence: Confidence::High,
        text: "Deserialization with the marshal module is possibly dangerous.",
    },
    CallRule {
        id: "B307",
        callees: &["eval"],
        condition: CallCondition::Always,
        severity: Severity::Medium,
        confidence: Confidence::High,
        text: "Use of possibly insecure function - consider using safer ast.literal_eval.",
    },
    CallRule {
        id: "B311",
        callees: &[
            "random.random",
            "random.randint",
            "random.randrange",
            "random.choice",
            "random.choices",
            "random.uniform",
            "random.shuffle",
        ],
        condition: CallCondition::Always,
        severity: Severity::Low,
        confidence: Confidence::High,
        text: "Standard pseudo-random generators are not suitable for security/cryptographic purposes.",
    },
    CallRule {
        id: "B324",
        callees: &["hashlib.md5", "hashlib.sha1", "hashlib.md4"],
        condition: CallCondition::Always,
        severity: Severity::High,
        confidence: Confidence::High,
        text: "Use of weak MD4, MD5, or SHA1 hash for security. Consider usedforsecurity=False",
    },
    CallRule {
        id: "B501",
        callees: &[
            "requests.get",
            "requests.post",
            "requests.put",
            "requests.patch",
            "requests.delete",
            "requests.head",
            "requests.options",
            "requests.request",
        ],
        condition: CallCondition::KeywordFalse("verify"),
        severity: Severity::High,
        confidence: Confidence::High,
        text: "Call to requests with verify=False disabling SSL certificate checks, security issue.",
    },
    CallRule {
        id: "B506",
        callees: &["yaml.load"],
        condition: CallCondition::KeywordMissing("Loader"),
        severity: Severity::Medium,
        confidence: Confidence::High,
        text: "Use of unsafe yaml load. Allows instantiation of arbitrary objects. Consider yaml.safe_load().",
    },
    CallRule {
        id: "B602",
        callees: &[
            "subprocess.Popen",
            "subprocess.call",
            "subprocess.run",
            "subprocess.check_call",
            "subprocess.check_output",
        ],
        condition: CallCondition::KeywordTrue("shell"),
        severity: Severity::High,
        confidence: Confidence::High,
        text: "subprocess call with shell=True identified, security issue.",
    },
    CallRule {
        id: "B605",
        callees: &["os.system", "os.popen"],
        condition: CallCondition::Always,
        severity: Severity::High,
        confidence: Confidence::High,
        text: "Starting a process with a shell, possible injection detected, security issue.",
    },
];

struct ImportRule {
    id: &'static str,
    modules: &'static [&'static str],
    severity: Severity,
    text: &'static str,
}

const IMPORT_RULES: &[ImportRule] = &[
    ImportRule {
        id: "B401",
        modules: &["telnetlib"],
        severity: Severity::High,
        text: "A telnet-related module is being imported.  Telnet is considered insecure. Use SSH or some other encrypted protocol.",
    },
    ImportRule {
        id: "B402",
        modules: &["ftplib"],
        severity: Severity::High,
        text: "A FTP-related module is being imported.  FTP is considered insecure. Use SSH/SFTP/SCP or some other encrypted protocol.",
    },
    ImportRule {
        id: "B403",
        modules: &["pickle", "cPickle", "dill", "shelve"],
        severity: Severity::Low,
        text: "Consider possible security implications associated with pickle module.",
    },
    ImportRule {
        id: "B404",
        modules: &["subprocess"],
        severity: Severity::Low,
        text: "Consider possible security implications associated with the subprocess module.",
    },
];

const PASSWORD_NAMES: &[&str] = &["password", "passwd", "pwd", "secret", "token"];
const TEMP_DIRS: &[&str] = &["/tmp", "/var/tmp", "/dev/shm"];

/// Scanner evaluating the built-in rule set in-process
#[derive(Debug, Default, Clone)]
pub struct RuleScanner;

impl RuleScanner {
    pub fn new() -> Self {
        Self
    }
}

impl SecurityScanner for RuleScanner {
    fn name(&self) -> &str {
        "builtin"
    }

    fn scan(&self, code: &str) -> Result<Vec<SecurityFinding>, ScanError> {
        let tree = parse_python(code)
            .ok_or_else(|| ScanError::Failed("Python grammar unavailable".to_string()))?;

        let mut findings = Vec::new();
        visit(tree.root_node(), &mut |node| match node.kind() {
            "call" => check_call(node, code, &mut findings),
            "import_statement" | "import_from_statement" => {
                check_import(node, code, &mut findings)
            }
            "assert_statement" => findings.push(finding(
                node,
                "B101",
                Severity::Low,
                Confidence::High,
                "Use of assert detected. The enclosed code will be removed when compiling to optimised byte code.".to_string(),
            )),
            "assignment" => check_hardcoded_password(node, code, &mut findings),
            "string" => check_string(node, code, &mut findings),
            _ => {}
        });

        findings.sort_by(|a, b| (a.line, &a.rule_id).cmp(&(b.line, &b.rule_id)));
        Ok(findings)
    }
}

fn finding(
    node: Node,
    id: &str,
    severity: Severity,
    confidence: Confidence,
    description: String,
) -> SecurityFinding {
    SecurityFinding {
        severity,
        confidence,
        line: line_of(node),
        rule_id: id.to_string(),
        description,
    }
}

/// `(name, value)` of every keyword argument of a call
fn keyword_arguments<'t>(call: Node<'t>, src: &'t str) -> Vec<(&'t str, Node<'t>)> {
    let Some(args) = call.child_by_field_name("arguments") else {
        return Vec::new();
    };
    named_children(args)
        .into_iter()
        .filter(|a| a.kind() == "keyword_argument")
        .filter_map(|a| {
            let name = a.child_by_field_name("name")?;
            let value = a.child_by_field_name("value")?;
            Some((node_text(name, src), value))
        })
        .collect()
}

fn condition_holds(condition: CallCondition, call: Node, src: &str) -> bool {
    let kwargs = keyword_arguments(call, src);
    let value_of = |key: &str| kwargs.iter().find(|(k, _)| *k == key).map(|(_, v)| v.kind());
    match condition {
        CallCondition::Always => true,
        CallCondition::KeywordTrue(key) => value_of(key) == Some("true"),
        CallCondition::KeywordFalse(key) => value_of(key) == Some("false"),
        CallCondition::KeywordMissing(key) => value_of(key).is_none(),
    }
}

fn check_call(call: Node, src: &str, findings: &mut Vec<SecurityFinding>) {
    let Some(function) = call.child_by_field_name("function") else {
        return;
    };
    let callee = node_text(function, src);

    for rule in CALL_RULES {
        if rule.callees.contains(&callee) && condition_holds(rule.condition, call, src) {
            findings.push(finding(
                call,
                rule.id,
                rule.severity,
                rule.confidence,
                rule.text.to_string(),
            ));
        }
    }
}

fn imported_modules<'t>(node: Node<'t>, src: &'t str) -> Vec<&'t str> {
    if node.kind() == "import_from_statement" {
        return node
            .child_by_field_name("module_name")
            .map(|m| vec![node_text(m, src)])
            .unwrap_or_default();
    }

    let mut cursor = node.walk();
    node.children_by_field_name("name", &mut cursor)
        .map(|n| match n.kind() {
            "aliased_import" => n
                .child_by_field_name("name")
                .map(|inner| node_text(inner, src))
                .unwrap_or(""),
            _ => node_text(n, src),
        })
        .collect()
}

fn check_import(node: Node, src: &str, findings: &mut Vec<SecurityFinding>) {
    for module in imported_modules(node, src) {
        let root = module.split('.').next().unwrap_or(module);
        for rule in IMPORT_RULES {
            if rule.modules.contains(&root) {
                findings.push(finding(
                    node,
                    rule.id,
                    rule.severity,
                    Confidence::High,
                    rule.text.to_string(),
                ));
            }
        }
    }
}

fn check_hardcoded_password(node: Node, src: &str, findings: &mut Vec<SecurityFinding>) {
    let (Some(left), Some(right)) = (
        node.child_by_field_name("left"),
        node.child_by_field_name("right"),
    ) else {
        return;
    };
    if right.kind() != "string" {
        return;
    }

    let target = match left.kind() {
        "identifier" => node_text(left, src),
        "attribute" => left
            .child_by_field_name("attribute")
            .map(|a| node_text(a, src))
            .unwrap_or(""),
        _ => return,
    }
    .to_ascii_lowercase();

    let value = string_value(right, src);
    if value.is_empty() || !PASSWORD_NAMES.iter().any(|p| target.contains(p)) {
        return;
    }

    findings.push(finding(
        node,
        "B105",
        Severity::Low,
        Confidence::Medium,
        format!("Possible hardcoded password: '{}'", value),
    ));
}

fn check_string(node: Node, src: &str, findings: &mut Vec<SecurityFinding>) {
    let value = string_value(node, src);

    if value == "0.0.0.0" {
        findings.push(finding(
            node,
            "B104",
            Severity::Medium,
            Confidence::Medium,
            "Possible binding to all interfaces.".to_string(),
        ));
    }

    if TEMP_DIRS.iter().any(|dir| value.starts_with(dir)) {
        findings.push(finding(
            node,
            "B108",
            Severity::Medium,
            Confidence::Medium,
            "Probable insecure usage of temp file/directory.".to_string(),
        ));
    }
}

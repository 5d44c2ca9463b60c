//! Element descriptor and deterministic YAML serialization.

/// One entry under `sources:` — a BuildStream source plugin invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub kind: String,
    pub path: String,
}

/// An element descriptor: the in-memory shape that §4.6 renders to YAML.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    pub kind: Option<String>,
    pub depends: Vec<String>,
    pub sources: Vec<SourceEntry>,
    pub variables: Vec<(String, String)>,
    pub config: Vec<(String, String)>,
}

impl Element {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Default::default()
        }
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.variables.push((name.into(), value.into()));
    }

    pub fn set_config(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.config.push((name.into(), value.into()));
    }
}

const QUOTE_TRIGGERS: &[char] = &['{', '}', '[', ']', '#', '&', '*', '!', '|', '>', '\'', ',', '@', '%'];

fn render_scalar(out: &mut String, indent: &str, value: &str) {
    if value.contains('\n') {
        out.push_str(indent);
        out.push_str("|\n");
        for line in value.lines() {
            out.push_str(indent);
            out.push_str("    ");
            out.push_str(line);
            out.push('\n');
        }
        // remove the extra trailing newline the loop above leaves on top of
        // the final newline we still want.
        out.pop();
        out.push('\n');
        return;
    }
    if value.is_empty() || value.chars().any(|c| QUOTE_TRIGGERS.contains(&c)) {
        out.push_str(indent);
        out.push('"');
        out.push_str(&value.replace('"', "\\\""));
        out.push_str("\"\n");
    } else {
        out.push_str(indent);
        out.push_str(value);
        out.push('\n');
    }
}

/// Render an [`Element`] as deterministic YAML text following §4.6 field
/// ordering: `kind`, `depends`, `sources`, `variables`, `config`.
pub fn serialize(element: &Element) -> String {
    let mut out = String::new();

    if let Some(kind) = &element.kind {
        out.push_str("kind: ");
        out.push_str(kind);
        out.push('\n');
        out.push('\n');
    }

    if !element.depends.is_empty() {
        out.push_str("depends:\n");
        for dep in &element.depends {
            out.push_str("- ");
            let mut line = String::new();
            render_scalar(&mut line, "", dep);
            out.push_str(line.trim_end_matches('\n'));
            out.push('\n');
        }
        out.push('\n');
    }

    if !element.sources.is_empty() {
        out.push_str("sources:\n");
        for src in &element.sources {
            out.push_str("- kind: ");
            out.push_str(&src.kind);
            out.push('\n');
            out.push_str("  path: ");
            let mut line = String::new();
            render_scalar(&mut line, "", &src.path);
            out.push_str(line.trim_end_matches('\n'));
            out.push('\n');
        }
        out.push('\n');
    }

    if !element.variables.is_empty() {
        out.push_str("variables:\n");
        for (k, v) in &element.variables {
            out.push_str("  ");
            out.push_str(k);
            out.push_str(": ");
            let mut line = String::new();
            render_scalar(&mut line, "", v);
            out.push_str(line.trim_end_matches('\n'));
            out.push('\n');
        }
        out.push('\n');
    }

    if !element.config.is_empty() {
        out.push_str("config:\n");
        for (k, v) in &element.config {
            out.push_str("  ");
            out.push_str(k);
            out.push_str(": ");
            let mut line = String::new();
            render_scalar(&mut line, "", v);
            out.push_str(line.trim_end_matches('\n'));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_field_order_with_blank_lines() {
        let mut e = Element::new("aosp_cc");
        e.depends.push("base/aosp-sdk.bst".to_string());
        e.set_variable("lib-name", "libbz");
        let text = serialize(&e);
        assert_eq!(
            text,
            "kind: aosp_cc\n\ndepends:\n- base/aosp-sdk.bst\n\nvariables:\n  lib-name: libbz\n\n"
        );
    }

    #[test]
    fn quotes_scalars_with_special_characters() {
        let mut e = Element::new("aosp_cc");
        e.set_variable("src-files", "a.c, b.c");
        let text = serialize(&e);
        assert!(text.contains("\"a.c, b.c\""));
    }

    #[test]
    fn plain_scalars_are_unquoted() {
        let mut e = Element::new("aosp_cc");
        e.set_variable("src-files", "a.c b.c");
        let text = serialize(&e);
        assert!(text.contains("src-files: a.c b.c\n"));
    }

    #[test]
    fn deterministic_across_runs() {
        let mut e = Element::new("import");
        e.sources.push(SourceEntry {
            kind: "local_external".to_string(),
            path: "vendor/foo".to_string(),
        });
        assert_eq!(serialize(&e), serialize(&e));
    }
}

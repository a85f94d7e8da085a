// Tree rendering for dependency results

use chainscope_scanner::result::{CallOutcome, DependencyResult};
use colored::Colorize;
use tracing::debug;

pub const SUCCESS_CLASS: &str = "text-success";
pub const FAILURE_CLASS: &str = "text-danger";
pub const FAIL_TO_CONNECT: &str = "Fail to connect";

/// Status line for a call. A zero status code means the call never connected.
pub fn status_text(call: &CallOutcome) -> String {
    if call.failed_to_connect() {
        FAIL_TO_CONNECT.to_string()
    } else {
        format!("StatusCode: {}", call.status_code)
    }
}

/// Marker class, driven only by the success flag.
pub fn style_class(call: &CallOutcome) -> &'static str {
    if call.success {
        SUCCESS_CLASS
    } else {
        FAILURE_CLASS
    }
}

/// Render `node` as nested HTML, starting at `indent_level` (0 for the root).
///
/// Nodes without any calls contribute nothing. Each self-called entry gets
/// its nested result rendered inside its own list item at `indent_level + 2`.
pub fn render(node: &DependencyResult, indent_level: usize) -> String {
    let mut out = String::new();
    write_node(node, indent_level, &mut out);
    out
}

fn write_node(node: &DependencyResult, indent_level: usize, out: &mut String) {
    if node.is_empty() {
        return;
    }

    out.push_str(&format!(
        "<div style='padding-left: {}em;'>\n",
        indent_level
    ));

    if indent_level == 0 {
        out.push_str(&format!("<h4>{}</h4>\n", escape_html(&node.url)));
    }

    out.push_str("<label>External dependencies: </label>\n<ul>\n");
    for call in &node.external_dependencies {
        out.push_str("<li>");
        write_call(call, out);
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");

    out.push_str("<label>Recursive dependencies: </label>\n<ul>\n");
    for call in &node.self_called {
        out.push_str("<li>");
        write_call(call, out);
        match call.nested() {
            Ok(nested) => {
                if !nested.is_empty() {
                    out.push('\n');
                }
                write_node(nested, indent_level + 2, out);
            }
            Err(e) => debug!("Rendering {} as a leaf: {}", call.uri, e),
        }
        out.push_str("</li>\n");
    }
    out.push_str("</ul>\n");

    out.push_str("</div>\n");
}

fn write_call(call: &CallOutcome, out: &mut String) {
    out.push_str(&format!(
        "<p class=\"{}\"><i>{}</i><br>{}</p>",
        style_class(call),
        escape_html(&call.uri),
        status_text(call)
    ));
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Render `node` as an indented terminal tree, same order and skip rule as
/// [`render`].
pub fn render_text(node: &DependencyResult) -> String {
    let mut out = String::new();
    write_text_node(node, 0, &mut out);
    out
}

fn write_text_node(node: &DependencyResult, indent_level: usize, out: &mut String) {
    if node.is_empty() {
        return;
    }

    let pad = "  ".repeat(indent_level);
    if indent_level == 0 {
        out.push_str(&format!("{}\n", node.url.bold()));
    }

    if !node.external_dependencies.is_empty() {
        out.push_str(&format!("{}  External dependencies:\n", pad));
        for call in &node.external_dependencies {
            out.push_str(&format!("{}    {}\n", pad, text_line(call)));
        }
    }

    if !node.self_called.is_empty() {
        out.push_str(&format!("{}  Recursive dependencies:\n", pad));
        for call in &node.self_called {
            out.push_str(&format!("{}    {}\n", pad, text_line(call)));
            if let Ok(nested) = call.nested() {
                write_text_node(nested, indent_level + 2, out);
            }
        }
    }
}

fn text_line(call: &CallOutcome) -> String {
    let status = if call.failed_to_connect() {
        FAIL_TO_CONNECT.to_string()
    } else {
        call.status_code.to_string()
    };

    if call.success {
        format!("{} {}  [{}]", "✓".green(), call.uri, status.green())
    } else {
        format!("{} {}  [{}]", "✗".red(), call.uri, status.red())
    }
}

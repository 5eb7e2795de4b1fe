//! Prompt template rendering.
//!
//! Templates use a small handlebars-like syntax evaluated against the
//! serialized flow input:
//!
//! - `{{path.to.field}}` substitutes a value (`null` and missing fields render
//!   as nothing, arrays render comma separated)
//! - `{{#if field}} .. {{else}} .. {{/if}}`
//! - `{{#each list}} .. {{/each}}`, where `{{this}}`, `{{this.field}}` and
//!   `{{@index}}` refer to the current element. Bare names resolve against
//!   the element first, then the enclosing scopes.

use serde_json::Value;

use crate::domain::common::entities::app_errors::CoreError;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    If {
        path: String,
        then: Vec<Node>,
        otherwise: Vec<Node>,
    },
    Each {
        path: String,
        body: Vec<Node>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Text(&'a str),
    Tag(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Terminator {
    Else,
    End,
}

/// A parsed template, reusable across renders.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptTemplate {
    nodes: Vec<Node>,
}

impl PromptTemplate {
    pub fn parse(source: &str) -> Result<Self, CoreError> {
        let tokens = tokenize(source)?;
        let mut iter = tokens.into_iter();
        let (nodes, _) = parse_nodes(&mut iter, None)?;
        Ok(Self { nodes })
    }

    pub fn render(&self, context: &Value) -> String {
        let mut out = String::new();
        let scope = Scope {
            value: context,
            parent: None,
            index: None,
        };
        render_nodes(&self.nodes, &scope, &mut out);
        out
    }
}

/// Parse and render in one go.
pub fn render(source: &str, context: &Value) -> Result<String, CoreError> {
    Ok(PromptTemplate::parse(source)?.render(context))
}

fn tokenize(source: &str) -> Result<Vec<Token<'_>>, CoreError> {
    let mut tokens = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        if start > 0 {
            tokens.push(Token::Text(&rest[..start]));
        }
        let after = &rest[start + 2..];
        let end = after
            .find("}}")
            .ok_or_else(|| CoreError::Template("unclosed `{{` tag".to_string()))?;
        let tag = after[..end].trim();
        if tag.is_empty() {
            return Err(CoreError::Template("empty `{{}}` tag".to_string()));
        }
        tokens.push(Token::Tag(tag));
        rest = &after[end + 2..];
    }

    if !rest.is_empty() {
        tokens.push(Token::Text(rest));
    }

    Ok(tokens)
}

fn parse_nodes<'a, I>(
    tokens: &mut I,
    closing: Option<&str>,
) -> Result<(Vec<Node>, Option<Terminator>), CoreError>
where
    I: Iterator<Item = Token<'a>>,
{
    let mut nodes = Vec::new();

    while let Some(token) = tokens.next() {
        let tag = match token {
            Token::Text(text) => {
                nodes.push(Node::Text(text.to_string()));
                continue;
            }
            Token::Tag(tag) => tag,
        };

        if let Some(path) = tag.strip_prefix("#if ") {
            let path = block_path(path, "if")?;
            let (then, terminator) = parse_nodes(tokens, Some("if"))?;
            let otherwise = if terminator == Some(Terminator::Else) {
                let (otherwise, terminator) = parse_nodes(tokens, Some("if"))?;
                if terminator != Some(Terminator::End) {
                    return Err(CoreError::Template(
                        "`{{else}}` used twice in one `{{#if}}` block".to_string(),
                    ));
                }
                otherwise
            } else {
                Vec::new()
            };
            nodes.push(Node::If {
                path,
                then,
                otherwise,
            });
        } else if let Some(path) = tag.strip_prefix("#each ") {
            let path = block_path(path, "each")?;
            let (body, terminator) = parse_nodes(tokens, Some("each"))?;
            if terminator != Some(Terminator::End) {
                return Err(CoreError::Template(
                    "`{{else}}` is not supported inside `{{#each}}`".to_string(),
                ));
            }
            nodes.push(Node::Each { path, body });
        } else if tag == "else" {
            if closing == Some("if") {
                return Ok((nodes, Some(Terminator::Else)));
            }
            return Err(CoreError::Template(
                "`{{else}}` outside of an `{{#if}}` block".to_string(),
            ));
        } else if let Some(name) = tag.strip_prefix('/') {
            if closing == Some(name.trim()) {
                return Ok((nodes, Some(Terminator::End)));
            }
            return Err(CoreError::Template(format!(
                "unexpected closing tag `{{{{/{}}}}}`",
                name.trim()
            )));
        } else if tag.starts_with('#') {
            return Err(CoreError::Template(format!("unknown block `{{{{{tag}}}}}`")));
        } else {
            nodes.push(Node::Var(tag.to_string()));
        }
    }

    match closing {
        Some(name) => Err(CoreError::Template(format!(
            "missing `{{{{/{name}}}}}` closing tag"
        ))),
        None => Ok((nodes, None)),
    }
}

fn block_path(path: &str, block: &str) -> Result<String, CoreError> {
    let path = path.trim();
    if path.is_empty() {
        return Err(CoreError::Template(format!(
            "`{{{{#{block}}}}}` needs a field name"
        )));
    }
    Ok(path.to_string())
}

struct Scope<'a> {
    value: &'a Value,
    parent: Option<&'a Scope<'a>>,
    index: Option<usize>,
}

enum Resolved<'a> {
    Borrowed(&'a Value),
    Owned(Value),
    Missing,
}

impl Resolved<'_> {
    fn as_value(&self) -> Option<&Value> {
        match self {
            Resolved::Borrowed(v) => Some(v),
            Resolved::Owned(v) => Some(v),
            Resolved::Missing => None,
        }
    }
}

impl<'a> Scope<'a> {
    fn resolve(&self, path: &str) -> Resolved<'a> {
        if path == "@index" {
            return match self.index {
                Some(i) => Resolved::Owned(Value::from(i)),
                None => Resolved::Missing,
            };
        }
        if path == "this" {
            return Resolved::Borrowed(self.value);
        }
        if let Some(rest) = path.strip_prefix("this.") {
            return lookup(self.value, rest).map_or(Resolved::Missing, Resolved::Borrowed);
        }

        let mut scope = Some(self);
        while let Some(current) = scope {
            if let Some(found) = lookup(current.value, path) {
                return Resolved::Borrowed(found);
            }
            scope = current.parent;
        }
        Resolved::Missing
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, segment| match current {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
    }
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::String(s) => out.push_str(s),
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
        }
        Value::Object(_) => out.push_str(&value.to_string()),
    }
}

fn render_nodes(nodes: &[Node], scope: &Scope<'_>, out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(path) => {
                if let Some(value) = scope.resolve(path).as_value() {
                    write_value(value, out);
                }
            }
            Node::If {
                path,
                then,
                otherwise,
            } => {
                let resolved = scope.resolve(path);
                if is_truthy(resolved.as_value()) {
                    render_nodes(then, scope, out);
                } else {
                    render_nodes(otherwise, scope, out);
                }
            }
            Node::Each { path, body } => {
                if let Resolved::Borrowed(Value::Array(items)) = scope.resolve(path) {
                    for (index, item) in items.iter().enumerate() {
                        let child = Scope {
                            value: item,
                            parent: Some(scope),
                            index: Some(index),
                        };
                        render_nodes(body, &child, out);
                    }
                }
            }
        }
    }
}

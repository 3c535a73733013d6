//! Extraction of readable text from Confluence storage format.
//!
//! Storage format is XHTML-like markup with undeclared `ac:`/`ri:`
//! namespaces. The extractor wraps the snippet in a synthetic root that
//! declares every prefix it sees, parses it with roxmltree, and walks the
//! tree emitting compact Markdown suitable for chat consumption: headings,
//! paragraphs, lists, code blocks, links, and tables. Full-fidelity export
//! concerns (emoji, admonition panels, image downloads) are out of scope.

use anyhow::Result;
use roxmltree::{Document, Node};

/// Synthetic namespace base URL for Confluence namespaces.
const SYNTHETIC_NS_BASE: &str = "https://confluence.example/";

/// Named HTML entities that storage format uses but XML parsers reject.
/// XML's five predefined entities are deliberately absent.
const NAMED_ENTITIES: &[(&str, &str)] = &[
  ("&nbsp;", " "),
  ("&ndash;", "\u{2013}"),
  ("&mdash;", "\u{2014}"),
  ("&hellip;", "\u{2026}"),
  ("&lsquo;", "\u{2018}"),
  ("&rsquo;", "\u{2019}"),
  ("&ldquo;", "\u{201c}"),
  ("&rdquo;", "\u{201d}"),
  ("&bull;", "\u{2022}"),
  ("&middot;", "\u{b7}"),
  ("&copy;", "\u{a9}"),
  ("&reg;", "\u{ae}"),
  ("&trade;", "\u{2122}"),
  ("&deg;", "\u{b0}"),
  ("&times;", "\u{d7}"),
  ("&larr;", "\u{2190}"),
  ("&rarr;", "\u{2192}"),
];

/// Convert Confluence storage format markup to plain Markdown text.
///
/// # Arguments
/// * `storage_content` - Raw storage format snippet from the REST API.
///
/// # Returns
/// Markdown-flavored text with blocks separated by blank lines. Empty input
/// produces an empty string.
///
/// # Errors
/// Returns an error when the markup cannot be parsed as XML even after
/// namespace wrapping.
pub fn storage_to_text(storage_content: &str) -> Result<String> {
  if storage_content.trim().is_empty() {
    return Ok(String::new());
  }

  let preprocessed = preprocess_entities(storage_content);
  let wrapped = wrap_with_namespaces(&preprocessed);

  let document = Document::parse(&wrapped)
    .map_err(|e| anyhow::anyhow!("Failed to parse Confluence storage content: {e}"))?;

  let mut blocks = Vec::new();
  render_blocks(document.root_element(), 0, &mut blocks);

  Ok(clean_text(&blocks.join("\n\n")))
}

/// Replace named HTML entities with their literal characters so roxmltree,
/// which only understands XML's predefined entities, can parse the markup.
fn preprocess_entities(content: &str) -> String {
  let mut result = content.to_string();
  for (entity, replacement) in NAMED_ENTITIES {
    if result.contains(entity) {
      result = result.replace(entity, replacement);
    }
  }
  result
}

/// Wraps storage format markup with synthetic namespace declarations.
///
/// Confluence storage format references namespaces such as `ac:` or `ri:`
/// without declaring them; the wrapper element lets roxmltree resolve the
/// prefixes during parsing.
fn wrap_with_namespaces(storage_content: &str) -> String {
  let mut prefixes = std::collections::BTreeSet::new();

  for segment in storage_content.split('<').skip(1) {
    let mut segment = segment;
    if let Some(idx) = segment.find('>') {
      segment = &segment[..idx];
    }

    let segment = segment.trim_start_matches('/');

    if let Some((prefix, _)) = segment.split_once(':')
      && is_valid_prefix(prefix)
    {
      prefixes.insert(prefix.to_string());
    }

    for attr in segment.split_whitespace() {
      if let Some((name, _)) = attr.split_once('=')
        && let Some((prefix, _)) = name.split_once(':')
        && is_valid_prefix(prefix)
      {
        prefixes.insert(prefix.to_string());
      }
    }
  }

  let mut result = String::from("<cf-root");
  for prefix in prefixes {
    result.push_str(" xmlns:");
    result.push_str(&prefix);
    result.push_str("=\"");
    result.push_str(SYNTHETIC_NS_BASE);
    result.push_str(&prefix);
    result.push('"');
  }
  result.push('>');
  result.push_str(storage_content);
  result.push_str("</cf-root>");
  result
}

/// Check if a string is a valid XML namespace prefix.
fn is_valid_prefix(prefix: &str) -> bool {
  !prefix.is_empty()
    && prefix
      .chars()
      .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Qualified name of an element, `prefix:local` for namespaced elements.
fn tag_name(node: Node) -> String {
  let tag = node.tag_name();
  match tag.namespace() {
    Some(namespace) => {
      let prefix = namespace.strip_prefix(SYNTHETIC_NS_BASE).unwrap_or(namespace);
      format!("{prefix}:{}", tag.name())
    }
    None => tag.name().to_string(),
  }
}

/// Retrieve an attribute value, handling the synthetic namespaces.
fn get_attribute(node: Node, attr_name: &str) -> Option<String> {
  let (expected_prefix, expected_name) = match attr_name.split_once(':') {
    Some((prefix, name)) => (Some(prefix), name),
    None => (None, attr_name),
  };
  let expected_namespace = expected_prefix.map(|prefix| format!("{SYNTHETIC_NS_BASE}{prefix}"));

  node
    .attributes()
    .find(|attr| attr.name() == expected_name && attr.namespace() == expected_namespace.as_deref())
    .map(|attr| attr.value().to_string())
}

/// First child element with the given qualified tag name.
fn find_child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
  node.children().find(|child| child.is_element() && tag_name(*child) == name)
}

/// Value of an `ac:parameter` child with the given `ac:name`.
fn macro_parameter(node: Node, parameter: &str) -> Option<String> {
  node
    .children()
    .filter(|child| child.is_element() && tag_name(*child) == "ac:parameter")
    .find(|child| get_attribute(*child, "ac:name").as_deref() == Some(parameter))
    .map(element_text)
}

/// All descendant text of an element, concatenated verbatim.
fn element_text(node: Node) -> String {
  let mut text = String::new();
  collect_text(node, &mut text);
  text
}

fn collect_text(node: Node, out: &mut String) {
  for child in node.children() {
    match child.node_type() {
      roxmltree::NodeType::Text => {
        if let Some(value) = child.text() {
          out.push_str(value);
        }
      }
      roxmltree::NodeType::Element => collect_text(child, out),
      _ => {}
    }
  }
}

/// Elements treated as block-level during the walk. Everything else renders
/// inline.
fn is_block(name: &str) -> bool {
  matches!(
    name,
    "h1"
      | "h2"
      | "h3"
      | "h4"
      | "h5"
      | "h6"
      | "p"
      | "pre"
      | "hr"
      | "table"
      | "ul"
      | "ol"
      | "blockquote"
      | "div"
      | "ac:structured-macro"
      | "ac:rich-text-body"
      | "ac:layout"
      | "ac:layout-section"
      | "ac:layout-cell"
      | "ac:task-list"
  )
}

/// Walk the children of a container, grouping consecutive inline content into
/// paragraphs and dispatching block elements to their handlers.
fn render_blocks(node: Node, depth: usize, blocks: &mut Vec<String>) {
  let mut paragraph = String::new();

  for child in node.children() {
    let block_name = child.is_element().then(|| tag_name(child)).filter(|n| is_block(n));

    match block_name {
      Some(name) => {
        flush_paragraph(&mut paragraph, blocks);
        render_block(child, &name, depth, blocks);
      }
      None => paragraph.push_str(&inline_text(child)),
    }
  }

  flush_paragraph(&mut paragraph, blocks);
}

fn flush_paragraph(paragraph: &mut String, blocks: &mut Vec<String>) {
  let text = normalize_inline(paragraph);
  if !text.is_empty() {
    blocks.push(text);
  }
  paragraph.clear();
}

fn render_block(node: Node, name: &str, depth: usize, blocks: &mut Vec<String>) {
  match name {
    "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
      let level = name[1..].parse::<usize>().unwrap_or(1);
      let text = normalize_inline(&inline_children(node));
      if !text.is_empty() {
        blocks.push(format!("{} {}", "#".repeat(level), text));
      }
    }
    "p" => {
      let text = normalize_inline(&inline_children(node));
      if !text.is_empty() {
        blocks.push(text);
      }
    }
    "pre" => {
      let code = element_text(node);
      blocks.push(format!("```\n{}\n```", code.trim_end()));
    }
    "hr" => blocks.push("---".to_string()),
    "ul" | "ol" => {
      let mut lines = Vec::new();
      render_list(node, name == "ol", depth, &mut lines);
      if !lines.is_empty() {
        blocks.push(lines.join("\n"));
      }
    }
    "table" => {
      let mut lines = Vec::new();
      render_table(node, &mut lines);
      if !lines.is_empty() {
        blocks.push(lines.join("\n"));
      }
    }
    "blockquote" => {
      let mut inner = Vec::new();
      render_blocks(node, depth, &mut inner);
      if !inner.is_empty() {
        let quoted = inner
          .join("\n\n")
          .lines()
          .map(|line| format!("> {line}"))
          .collect::<Vec<_>>()
          .join("\n");
        blocks.push(quoted);
      }
    }
    "div" | "ac:rich-text-body" | "ac:layout" | "ac:layout-section" | "ac:layout-cell" => {
      render_blocks(node, depth, blocks);
    }
    "ac:structured-macro" => render_macro(node, depth, blocks),
    "ac:task-list" => render_task_list(node, blocks),
    _ => render_blocks(node, depth, blocks),
  }
}

/// Render an `ac:structured-macro` element. Code macros become fenced blocks;
/// anything with a rich-text body renders its contents; the rest is dropped.
fn render_macro(node: Node, depth: usize, blocks: &mut Vec<String>) {
  let name = get_attribute(node, "ac:name").unwrap_or_default();

  if name == "code" {
    let language = macro_parameter(node, "language").unwrap_or_default();
    let code = find_child(node, "ac:plain-text-body")
      .map(element_text)
      .unwrap_or_default();
    blocks.push(format!("```{}\n{}\n```", language.trim(), code.trim_matches('\n')));
    return;
  }

  if let Some(body) = find_child(node, "ac:rich-text-body") {
    render_blocks(body, depth, blocks);
  }
}

/// Render `ac:task-list` items as Markdown checkboxes.
fn render_task_list(node: Node, blocks: &mut Vec<String>) {
  let mut lines = Vec::new();

  for task in node.children().filter(|c| c.is_element() && tag_name(*c) == "ac:task") {
    let status = find_child(task, "ac:task-status").map(element_text).unwrap_or_default();
    let body = find_child(task, "ac:task-body")
      .map(|body| normalize_inline(&inline_children(body)))
      .unwrap_or_default();

    let marker = if status.trim() == "complete" { "x" } else { " " };
    lines.push(format!("- [{marker}] {body}"));
  }

  if !lines.is_empty() {
    blocks.push(lines.join("\n"));
  }
}

/// Render `ul`/`ol` items, nesting with two-space indentation.
fn render_list(node: Node, ordered: bool, depth: usize, lines: &mut Vec<String>) {
  let indent = "  ".repeat(depth);
  let mut index = 0usize;

  for item in node.children().filter(|c| c.is_element() && tag_name(*c) == "li") {
    index += 1;
    let marker = if ordered { format!("{index}.") } else { "-".to_string() };

    let mut text = String::new();
    for child in item.children() {
      let name = child.is_element().then(|| tag_name(child));
      if matches!(name.as_deref(), Some("ul") | Some("ol")) {
        continue;
      }
      text.push_str(&inline_text(child));
    }
    lines.push(format!("{indent}{marker} {}", normalize_inline(&text)));

    for nested in item
      .children()
      .filter(|c| c.is_element() && matches!(tag_name(*c).as_str(), "ul" | "ol"))
    {
      render_list(nested, tag_name(nested) == "ol", depth + 1, lines);
    }
  }
}

/// Render a table as pipe-separated rows, with a separator after a heading
/// row.
fn render_table(node: Node, lines: &mut Vec<String>) {
  let rows: Vec<Node> = node
    .descendants()
    .filter(|n| n.is_element() && tag_name(*n) == "tr")
    .collect();

  for (row_index, row) in rows.iter().enumerate() {
    let cells: Vec<String> = row
      .children()
      .filter(|c| c.is_element() && matches!(tag_name(*c).as_str(), "th" | "td"))
      .map(|cell| normalize_inline(&inline_children(cell)))
      .collect();

    if cells.is_empty() {
      continue;
    }

    let is_header = row
      .children()
      .any(|c| c.is_element() && tag_name(c) == "th");

    lines.push(format!("| {} |", cells.join(" | ")));

    if row_index == 0 && is_header {
      lines.push(format!("| {} |", vec!["---"; cells.len()].join(" | ")));
    }
  }
}

/// Inline rendering of all children of a node.
fn inline_children(node: Node) -> String {
  node.children().map(inline_text).collect()
}

/// Inline rendering of a single node: text, emphasis, code, links, breaks.
fn inline_text(node: Node) -> String {
  match node.node_type() {
    // Raw newlines in markup are formatting, not content; only <br/> breaks.
    roxmltree::NodeType::Text => return node.text().unwrap_or_default().replace(['\n', '\r', '\t'], " "),
    roxmltree::NodeType::Element => {}
    _ => return String::new(),
  }

  match tag_name(node).as_str() {
    "strong" | "b" => wrap_nonempty(&inline_children(node), "**"),
    "em" | "i" => wrap_nonempty(&inline_children(node), "_"),
    "s" | "del" | "strike" => wrap_nonempty(&inline_children(node), "~~"),
    "u" | "span" | "sub" | "sup" | "time" => inline_children(node),
    "code" => {
      let code = element_text(node);
      if code.is_empty() { String::new() } else { format!("`{code}`") }
    }
    "br" => "\n".to_string(),
    "a" => {
      let text = normalize_inline(&inline_children(node));
      match node.attribute("href") {
        Some(href) if !text.is_empty() => format!("[{text}]({href})"),
        Some(href) => href.to_string(),
        None => text,
      }
    }
    "ac:link" => confluence_link_text(node),
    "ac:image" => get_attribute(node, "ac:alt").unwrap_or_default(),
    _ => inline_children(node),
  }
}

/// Text for an `ac:link` element: explicit link body when present, otherwise
/// the referenced page title.
fn confluence_link_text(node: Node) -> String {
  let body = find_child(node, "ac:plain-text-link-body")
    .or_else(|| find_child(node, "ac:link-body"))
    .map(element_text)
    .map(|text| text.trim().to_string())
    .filter(|text| !text.is_empty());

  if let Some(body) = body {
    return body;
  }

  find_child(node, "ri:page")
    .and_then(|page| get_attribute(page, "ri:content-title"))
    .unwrap_or_default()
}

fn wrap_nonempty(text: &str, marker: &str) -> String {
  let trimmed = text.trim();
  if trimmed.is_empty() {
    String::new()
  } else {
    format!("{marker}{trimmed}{marker}")
  }
}

/// Collapse runs of whitespace into single spaces, preserving explicit line
/// breaks emitted for `<br/>`.
fn normalize_inline(text: &str) -> String {
  let mut result = String::with_capacity(text.len());

  for (line_index, line) in text.split('\n').enumerate() {
    if line_index > 0 {
      result.push('\n');
    }
    let mut last_was_space = false;
    for c in line.chars() {
      if c.is_whitespace() {
        if !last_was_space && !result.is_empty() && !result.ends_with('\n') {
          result.push(' ');
        }
        last_was_space = true;
      } else {
        result.push(c);
        last_was_space = false;
      }
    }
  }

  result.trim().to_string()
}

/// Final cleanup: no runs of three or more newlines, trimmed edges.
fn clean_text(content: &str) -> String {
  let mut result = content.to_string();
  while result.contains("\n\n\n") {
    result = result.replace("\n\n\n", "\n\n");
  }
  result.trim().to_string()
}

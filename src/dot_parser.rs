//! DOT graph parsing
//!
//! Reads the Graphviz text printed by `terraform graph` into a
//! [`TerraformGraph`]. Only the structural parts matter here: node names,
//! node attributes and edges. Graph, node and edge default attributes are
//! accepted and ignored, and subgraphs are flattened.
//!
//! Parsing runs in two passes. The text is first split into positioned
//! tokens, with comments, whitespace and `#` lines dropped. The grammar then
//! runs over the token slice, so every error maps back to a byte span of the
//! source for miette to highlight.

use std::collections::HashMap;

use miette::{NamedSource, SourceSpan};
use winnow::{
    Parser,
    ascii::{digit0, digit1},
    combinator::{alt, cut_err, empty, eof, opt, preceded, repeat, terminated},
    error::{ContextError, ErrMode},
    stream::{LocatingSlice, Location, Stream, TokenSlice},
    token::{any, take_till, take_until, take_while},
};

use crate::error::{DotParseError, TerramaidError};
use crate::graph::{RawEdge, RawNode, TerraformGraph};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Bare identifier or numeral
    Id(String),
    /// Quoted or HTML string, already unquoted
    Quoted(String),
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Equals,
    Semicolon,
    Comma,
    Colon,
    Plus,
    EdgeOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PositionedToken {
    token: Token,
    offset: usize,
    len: usize,
}

/// Attached to lexer errors for constructs that were opened but never closed
#[derive(Debug, Clone)]
struct Unterminated {
    what: &'static str,
    start: usize,
}

type Text<'a> = LocatingSlice<&'a str>;
type LexResult<O> = Result<O, ErrMode<ContextError<Unterminated>>>;

type Tokens<'t> = TokenSlice<'t, PositionedToken>;
type TokenError = ErrMode<ContextError<&'static str>>;
type ParseResult<O> = Result<O, TokenError>;

struct SyntaxError {
    message: String,
    offset: usize,
    len: usize,
}

impl SyntaxError {
    fn new(message: impl Into<String>, offset: usize, len: usize) -> Self {
        Self {
            message: message.into(),
            offset,
            len,
        }
    }

    fn into_error(self, name: &str, text: &str) -> TerramaidError {
        TerramaidError::DotParseError(Box::new(DotParseError {
            name: name.to_string(),
            message: self.message,
            source_code: NamedSource::new(name, text.to_string()),
            span: Some(SourceSpan::new(self.offset.into(), self.len)),
        }))
    }
}

fn at_line_start(text: &str, position: usize) -> bool {
    text[..position]
        .chars()
        .rev()
        .find(|c| *c != ' ' && *c != '\t')
        .is_none_or(|c| c == '\n')
}

/// Whitespace, `//` line comments and `/* */` block comments
fn trivia(input: &mut Text<'_>) -> LexResult<()> {
    let start = input.current_token_start();

    alt((
        take_while(1.., char::is_whitespace).void(),
        ("//", take_till(0.., '\n')).void(),
        preceded(
            "/*",
            cut_err(terminated(take_until(0.., "*/"), "*/")).context(Unterminated {
                what: "comment",
                start,
            }),
        )
        .void(),
    ))
    .parse_next(input)
}

/// C preprocessor output, only recognized at the start of a line
fn preprocessor_line(input: &mut Text<'_>) -> LexResult<()> {
    ('#', take_till(0.., '\n')).void().parse_next(input)
}

/// Backslash sequences inside a quoted string
///
/// `\"` is a quote and a backslash before a line break joins the lines.
/// `\\` is kept as a pair so the quote after it still closes the string.
/// Any other backslash is kept literally.
fn string_escape<'a>(input: &mut Text<'a>) -> LexResult<&'a str> {
    preceded(
        '\\',
        alt((
            '"'.value("\""),
            '\\'.value("\\\\"),
            alt(("\r\n", "\n")).value(""),
            empty.value("\\"),
        )),
    )
    .parse_next(input)
}

fn quoted_string(input: &mut Text<'_>) -> LexResult<String> {
    let start = input.current_token_start();

    preceded(
        '"',
        cut_err(terminated(
            repeat(0.., alt((string_escape, take_till(1.., ['"', '\\'])))).fold(
                String::new,
                |mut value, piece: &str| {
                    value.push_str(piece);
                    value
                },
            ),
            '"',
        ))
        .context(Unterminated {
            what: "string",
            start,
        }),
    )
    .parse_next(input)
}

/// Contents of an HTML string, with nested `<...>` kept verbatim
fn html_body(input: &mut Text<'_>) -> LexResult<String> {
    repeat(
        0..,
        alt((
            take_till(1.., ['<', '>']).map(str::to_string),
            ('<', html_body, '>').map(|(_, inner, _)| format!("<{inner}>")),
        )),
    )
    .fold(String::new, |mut value, piece: String| {
        value.push_str(&piece);
        value
    })
    .parse_next(input)
}

fn html_string(input: &mut Text<'_>) -> LexResult<String> {
    let start = input.current_token_start();

    preceded(
        '<',
        cut_err(terminated(html_body, '>')).context(Unterminated {
            what: "HTML string",
            start,
        }),
    )
    .parse_next(input)
}

/// `-`? followed by digits with at most one `.`
fn numeral<'a>(input: &mut Text<'a>) -> LexResult<&'a str> {
    (
        opt('-'),
        alt(((digit1, opt(('.', digit0))).void(), ('.', digit1).void())),
    )
        .take()
        .parse_next(input)
}

fn identifier<'a>(input: &mut Text<'a>) -> LexResult<&'a str> {
    take_while(1.., |c: char| c.is_alphanumeric() || c == '_' || !c.is_ascii()).parse_next(input)
}

fn token(input: &mut Text<'_>) -> LexResult<Token> {
    alt((
        quoted_string.map(Token::Quoted),
        html_string.map(Token::Quoted),
        alt(("->", "--")).value(Token::EdgeOp),
        numeral.map(|text: &str| Token::Id(text.to_string())),
        identifier.map(|text: &str| Token::Id(text.to_string())),
        alt((
            '{'.value(Token::LeftBrace),
            '}'.value(Token::RightBrace),
            '['.value(Token::LeftBracket),
            ']'.value(Token::RightBracket),
            '='.value(Token::Equals),
            ';'.value(Token::Semicolon),
            ','.value(Token::Comma),
            ':'.value(Token::Colon),
            '+'.value(Token::Plus),
        )),
    ))
    .parse_next(input)
}

fn lex_error(error: ErrMode<ContextError<Unterminated>>, text: &str, start: usize) -> SyntaxError {
    let unterminated = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().next().cloned(),
        _ => None,
    };

    match unterminated {
        Some(Unterminated { what, start }) => {
            SyntaxError::new(format!("unterminated {what}"), start, 1)
        }
        None => {
            let c = text[start..].chars().next().unwrap_or_default();
            SyntaxError::new(format!("unexpected character '{c}'"), start, c.len_utf8())
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<PositionedToken>, SyntaxError> {
    let mut input = LocatingSlice::new(text);
    let mut tokens = Vec::new();

    while input.eof_offset() > 0 {
        let start = input.current_token_start();
        let step = if text[start..].starts_with('#') && at_line_start(text, start) {
            preprocessor_line.map(|()| None).parse_next(&mut input)
        } else {
            alt((trivia.map(|()| None), token.map(Some))).parse_next(&mut input)
        };

        match step {
            Ok(Some(token)) => tokens.push(PositionedToken {
                token,
                offset: start,
                len: input.current_token_start() - start,
            }),
            Ok(None) => {}
            Err(error) => return Err(lex_error(error, text, start)),
        }
    }

    Ok(tokens)
}

/// One statement of a graph body, before it is applied to the graph
#[derive(Debug, Clone)]
enum Statement {
    /// Graph attributes and `graph|node|edge [...]` defaults
    Ignored,
    Node(RawNode),
    Subgraph(Vec<Statement>),
    Edges(Vec<Operand>),
}

#[derive(Debug, Clone)]
enum Operand {
    Node(String),
    Subgraph(Vec<Statement>),
}

fn punct<'t>(expected: Token) -> impl Parser<Tokens<'t>, (), TokenError> {
    any.verify(move |token: &PositionedToken| token.token == expected)
        .void()
}

/// Unquoted keyword, DOT keywords are case-insensitive
fn keyword<'t>(name: &'static str) -> impl Parser<Tokens<'t>, (), TokenError> {
    any.verify(move |token: &PositionedToken| {
        matches!(&token.token, Token::Id(value) if value.eq_ignore_ascii_case(name))
    })
    .void()
}

fn quoted(input: &mut Tokens<'_>) -> ParseResult<String> {
    any.verify_map(|token: &PositionedToken| match &token.token {
        Token::Quoted(value) => Some(value.clone()),
        _ => None,
    })
    .parse_next(input)
}

/// `"a" + "b"` joins quoted strings into one identifier
fn concatenated(input: &mut Tokens<'_>) -> ParseResult<String> {
    (
        quoted,
        repeat(
            0..,
            preceded(
                punct(Token::Plus),
                cut_err(quoted.context("quoted string after '+'")),
            ),
        ),
    )
        .map(|(mut value, rest): (String, Vec<String>)| {
            value.extend(rest);
            value
        })
        .parse_next(input)
}

fn id(input: &mut Tokens<'_>) -> ParseResult<String> {
    alt((
        any.verify_map(|token: &PositionedToken| match &token.token {
            Token::Id(value) => Some(value.clone()),
            _ => None,
        }),
        concatenated,
    ))
    .parse_next(input)
}

fn attribute(input: &mut Tokens<'_>) -> ParseResult<(String, String)> {
    (
        id,
        preceded(
            cut_err(punct(Token::Equals).context("'=' after attribute name")),
            cut_err(id.context("attribute value")),
        ),
    )
        .parse_next(input)
}

fn attribute_list(input: &mut Tokens<'_>) -> ParseResult<Vec<(String, String)>> {
    preceded(
        punct(Token::LeftBracket),
        cut_err(terminated(
            repeat(
                0..,
                terminated(
                    attribute,
                    opt(alt((punct(Token::Comma), punct(Token::Semicolon)))),
                ),
            ),
            punct(Token::RightBracket).context("']'"),
        )),
    )
    .parse_next(input)
}

/// Consecutive `[...]` lists merged in order, later keys win
fn attribute_lists(input: &mut Tokens<'_>) -> ParseResult<HashMap<String, String>> {
    repeat(0.., attribute_list)
        .fold(HashMap::new, |mut attributes, list: Vec<(String, String)>| {
            attributes.extend(list);
            attributes
        })
        .parse_next(input)
}

/// `{ statements }`
fn block(input: &mut Tokens<'_>) -> ParseResult<Vec<Statement>> {
    preceded(
        punct(Token::LeftBrace),
        cut_err(terminated(
            statements,
            punct(Token::RightBrace).context("'}'"),
        )),
    )
    .parse_next(input)
}

/// `subgraph name? { ... }` or an anonymous `{ ... }`
fn subgraph(input: &mut Tokens<'_>) -> ParseResult<Vec<Statement>> {
    alt((
        preceded(
            keyword("subgraph"),
            cut_err(preceded(
                opt(id),
                block.context("'{' to open the subgraph"),
            )),
        ),
        block,
    ))
    .parse_next(input)
}

/// Ports are irrelevant for the dependency structure
fn ports(input: &mut Tokens<'_>) -> ParseResult<()> {
    repeat(
        0..,
        preceded(punct(Token::Colon), cut_err(id.context("port"))),
    )
    .parse_next(input)
}

fn operand(input: &mut Tokens<'_>) -> ParseResult<Operand> {
    alt((
        subgraph.map(Operand::Subgraph),
        terminated(id, ports).map(Operand::Node),
    ))
    .parse_next(input)
}

fn attribute_statement(input: &mut Tokens<'_>) -> ParseResult<Statement> {
    preceded(
        alt((keyword("graph"), keyword("node"), keyword("edge"))),
        attribute_lists,
    )
    .value(Statement::Ignored)
    .parse_next(input)
}

/// Node, subgraph, edge chain or `id = id` graph attribute
fn operand_statement(input: &mut Tokens<'_>) -> ParseResult<Statement> {
    let first = operand(input)?;

    if matches!(first, Operand::Node(_)) && opt(punct(Token::Equals)).parse_next(input)?.is_some() {
        cut_err(id.context("attribute value")).parse_next(input)?;
        return Ok(Statement::Ignored);
    }

    let rest: Vec<Operand> = repeat(
        0..,
        preceded(
            punct(Token::EdgeOp),
            cut_err(operand.context("node identifier")),
        ),
    )
    .parse_next(input)?;
    let attributes = attribute_lists(input)?;

    if !rest.is_empty() {
        let mut chain = vec![first];
        chain.extend(rest);
        return Ok(Statement::Edges(chain));
    }

    Ok(match first {
        Operand::Node(name) => Statement::Node(RawNode { name, attributes }),
        Operand::Subgraph(inner) => Statement::Subgraph(inner),
    })
}

fn statements(input: &mut Tokens<'_>) -> ParseResult<Vec<Statement>> {
    repeat(
        0..,
        alt((
            punct(Token::Semicolon).value(Statement::Ignored),
            attribute_statement,
            operand_statement,
        )),
    )
    .parse_next(input)
}

/// `strict? (digraph|graph) id? { ... }` and nothing after it
fn dot_graph(input: &mut Tokens<'_>) -> ParseResult<Vec<Statement>> {
    preceded(
        (
            opt(keyword("strict")),
            alt((keyword("digraph"), keyword("graph"))).context("'digraph' or 'graph'"),
        ),
        cut_err(terminated(
            preceded(opt(id), block.context("'{'")),
            eof.context("end of input after the closing '}'"),
        )),
    )
    .parse_next(input)
}

fn parse_error(
    error: TokenError,
    tokens: &[PositionedToken],
    remaining: usize,
    end: usize,
) -> SyntaxError {
    let label = match &error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e.context().next().copied(),
        _ => None,
    };
    let message = label.map_or_else(|| "unexpected token".to_string(), |label| format!("expected {label}"));

    match tokens.get(tokens.len() - remaining) {
        Some(token) => SyntaxError::new(message, token.offset, token.len.max(1)),
        None => SyntaxError::new(message, end, 0),
    }
}

/// Apply statements to the graph, returning every node named in them
fn apply(statements: Vec<Statement>, graph: &mut TerraformGraph) -> Vec<String> {
    let mut members = Vec::new();

    for statement in statements {
        match statement {
            Statement::Ignored => {}
            Statement::Node(node) => {
                members.push(node.name.clone());
                graph.add_node(node);
            }
            Statement::Subgraph(inner) => members.extend(apply(inner, graph)),
            Statement::Edges(chain) => {
                // a subgraph operand stands for every node named inside it
                let groups: Vec<Vec<String>> = chain
                    .into_iter()
                    .map(|operand| match operand {
                        Operand::Node(name) => vec![name],
                        Operand::Subgraph(inner) => apply(inner, graph),
                    })
                    .collect();

                for pair in groups.windows(2) {
                    for src in &pair[0] {
                        for dst in &pair[1] {
                            graph.add_edge(RawEdge::new(src.clone(), dst.clone()));
                        }
                    }
                }
                members.extend(groups.into_iter().flatten());
            }
        }
    }

    members
}

/// Parse DOT text into a [`TerraformGraph`]
///
/// `name` identifies the source in diagnostics.
pub fn parse(name: &str, text: &str) -> Result<TerraformGraph, TerramaidError> {
    let statements = tokenize(text)
        .and_then(|tokens| {
            let mut input = TokenSlice::new(&tokens);
            dot_graph
                .parse_next(&mut input)
                .map_err(|error| parse_error(error, &tokens, input.eof_offset(), text.len()))
        })
        .map_err(|error| error.into_error(name, text))?;

    let mut graph = TerraformGraph::new();
    apply(statements, &mut graph);
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn node_names(graph: &TerraformGraph) -> Vec<&str> {
        graph.nodes().iter().map(RawNode::name).collect()
    }

    fn edge_pairs(graph: &TerraformGraph) -> Vec<(&str, &str)> {
        graph
            .edges()
            .iter()
            .map(|edge| (edge.src.as_str(), edge.dst.as_str()))
            .collect()
    }

    fn error_message(text: &str) -> (String, usize) {
        match parse("broken.dot", text).unwrap_err() {
            TerramaidError::DotParseError(parse_error) => {
                (parse_error.message, parse_error.span.unwrap().offset())
            }
            other => panic!("Expected DotParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_legacy_terraform_output() {
        let dot = r#"digraph {
	compound = "true"
	newrank = "true"
	subgraph "root" {
		"[root] aws_instance.web (expand)" [label = "aws_instance.web", shape = "box"]
		"[root] provider[\"registry.terraform.io/hashicorp/aws\"]" [label = "provider[\"registry.terraform.io/hashicorp/aws\"]", shape = "diamond"]
		"[root] aws_instance.web (expand)" -> "[root] provider[\"registry.terraform.io/hashicorp/aws\"]"
	}
}
"#;

        let graph = parse("legacy.dot", dot).unwrap();

        assert_eq!(
            node_names(&graph),
            vec![
                "[root] aws_instance.web (expand)",
                "[root] provider[\"registry.terraform.io/hashicorp/aws\"]",
            ]
        );
        assert_eq!(
            graph.label_of("[root] provider[\"registry.terraform.io/hashicorp/aws\"]"),
            "provider[\"registry.terraform.io/hashicorp/aws\"]"
        );
        assert_eq!(
            edge_pairs(&graph),
            vec![(
                "[root] aws_instance.web (expand)",
                "[root] provider[\"registry.terraform.io/hashicorp/aws\"]"
            )]
        );
    }

    #[test]
    fn test_parse_modern_terraform_output() {
        let dot = r#"digraph G {
  rankdir = "RL";
  node [shape = rect, fontname = "sans-serif"];
  "aws_instance.web" [label="aws_instance.web"];
  "aws_s3_bucket.log" [label="aws_s3_bucket.log"];
  "aws_instance.web" -> "aws_s3_bucket.log";
  /* comment */
  // another comment
}
"#;

        let graph = parse("modern.dot", dot).unwrap();

        assert_eq!(node_names(&graph), vec!["aws_instance.web", "aws_s3_bucket.log"]);
        assert_eq!(graph.label_of("aws_s3_bucket.log"), "aws_s3_bucket.log");
        assert_eq!(
            edge_pairs(&graph),
            vec![("aws_instance.web", "aws_s3_bucket.log")]
        );
    }

    #[test]
    fn test_edge_chains_and_subgraph_operands() {
        let dot = "strict digraph { a -> b -> c [color=red]; d -> { e f }; x:port:n -> y }";

        let graph = parse("chains.dot", dot).unwrap();

        assert_eq!(
            edge_pairs(&graph),
            vec![
                ("a", "b"),
                ("b", "c"),
                ("d", "e"),
                ("d", "f"),
                ("x", "y")
            ]
        );
        // only statements inside the anonymous subgraph declare nodes
        assert_eq!(node_names(&graph), vec!["e", "f"]);
    }

    #[test]
    fn test_string_concatenation_and_escapes() {
        let dot = "graph { \"long\" + \"name\" [label=\"multi\\\nline \\\"quoted\\\"\"]; n2 [label=<<b>bold</b>>] }";

        let graph = parse("strings.dot", dot).unwrap();

        assert_eq!(node_names(&graph), vec!["longname", "n2"]);
        assert_eq!(graph.label_of("longname"), "multiline \"quoted\"");
        assert_eq!(graph.label_of("n2"), "<b>bold</b>");
    }

    #[test]
    fn test_escaped_backslash_before_closing_quote() {
        // `\\` pairs up, so the following quote ends the string as in Graphviz
        let graph = parse("backslash.dot", r#"digraph { a [label="a\\"] }"#).unwrap();

        assert_eq!(graph.label_of("a"), r"a\\");

        let (message, offset) = error_message(r#"digraph { a [label="a\"] }"#);
        assert_eq!(message, "unterminated string");
        assert_eq!(offset, 19);
    }

    #[test]
    fn test_numerals_and_repeated_declarations() {
        let dot = "digraph { 1 [weight=-2.5]; 1 [label=\"one\"]; 2 -> 1 }";

        let graph = parse("numbers.dot", dot).unwrap();

        assert_eq!(node_names(&graph), vec!["1"]);
        let one = graph.node("1").unwrap();
        assert_eq!(one.label(), "one");
        assert_eq!(one.attributes.get("weight").map(String::as_str), Some("-2.5"));
    }

    #[test]
    fn test_preprocessor_lines_are_skipped() {
        let dot = "# generated\ndigraph {\n  # note\n  a [label=\"a\"]\n}\n";

        let graph = parse("hash.dot", dot).unwrap();

        assert_eq!(node_names(&graph), vec!["a"]);
    }

    #[test]
    fn test_malformed_input_reports_span() {
        let error = parse("broken.dot", "digraph { a -> }").unwrap_err();

        match error {
            TerramaidError::DotParseError(parse_error) => {
                assert_eq!(parse_error.message, "expected node identifier");
                let span = parse_error.span.unwrap();
                assert_eq!(span.offset(), 15);
            }
            other => panic!("Expected DotParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_lexer_errors() {
        assert_eq!(
            error_message("digraph { a /* open"),
            ("unterminated comment".to_string(), 12)
        );
        assert_eq!(
            error_message("digraph { a ? b }"),
            ("unexpected character '?'".to_string(), 12)
        );
        assert_eq!(
            error_message("digraph { a [label=<x] }"),
            ("unterminated HTML string".to_string(), 19)
        );
    }

    #[test]
    fn test_rejects_unterminated_input() {
        assert!(parse("open.dot", "digraph { \"unterminated").is_err());
        assert!(parse("brace.dot", "digraph { a").is_err());
        assert!(parse("trailing.dot", "digraph { } extra").is_err());
        assert!(parse("keyword.dot", "tree { }").is_err());
        assert!(parse("attrs.dot", "digraph { a [label=\"x\" }").is_err());

        assert_eq!(error_message("digraph { a"), ("expected '}'".to_string(), 11));
        assert_eq!(
            error_message("tree { }"),
            ("expected 'digraph' or 'graph'".to_string(), 0)
        );
        assert_eq!(
            error_message("digraph { a [label=\"x\" }"),
            ("expected ']'".to_string(), 23)
        );
    }
}

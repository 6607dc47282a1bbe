use crate::renderer::SyntaxCache;
use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};
use std::fmt::Write;
use textwrap::{wrap, Options};

const BODY_INDENT: &str = "  ";
const CODE_INDENT: &str = "    ";

/// Turns assistant replies into wrapped, coloured terminal text.
///
/// Line breaks in the source are kept as line breaks: search replies are
/// line-oriented and read badly when reflowed into one paragraph.
pub struct MarkdownRenderer {
    width: usize,
}

#[derive(Default)]
struct RenderState {
    output: String,
    paragraph: String,
    code_language: Option<String>,
    /// One entry per open list; `Some(n)` is the next number of an ordered list.
    lists: Vec<Option<u64>>,
    item_marker: Option<String>,
}

impl MarkdownRenderer {
    pub fn new(width: usize) -> Self {
        Self { width: width.max(20) }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn render(&self, text: &str) -> String {
        let mut state = RenderState {
            output: String::with_capacity(text.len() * 2),
            ..RenderState::default()
        };

        for event in Parser::new(text) {
            self.apply(event, &mut state);
        }
        self.flush_paragraph(&mut state);

        state.output.trim_end().to_string()
    }

    fn apply(&self, event: Event, state: &mut RenderState) {
        match event {
            Event::Start(Tag::Heading(..)) => {
                self.flush_paragraph(state);
                state.paragraph.push_str("\x1B[1;4m");
            }
            Event::End(Tag::Heading(..)) => {
                state.paragraph.push_str("\x1B[22;24m");
                self.flush_paragraph(state);
                state.output.push('\n');
            }
            Event::Start(Tag::Paragraph) => self.flush_paragraph(state),
            Event::End(Tag::Paragraph) => {
                self.flush_paragraph(state);
                if state.lists.is_empty() {
                    state.output.push('\n');
                }
            }
            Event::Start(Tag::List(start)) => {
                self.flush_paragraph(state);
                state.lists.push(start);
            }
            Event::End(Tag::List(_)) => {
                self.flush_paragraph(state);
                state.lists.pop();
                if state.lists.is_empty() {
                    state.output.push('\n');
                }
            }
            Event::Start(Tag::Item) => {
                self.flush_paragraph(state);
                let marker = match state.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{}. ", n);
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                state.item_marker = Some(marker);
            }
            Event::End(Tag::Item) => self.flush_paragraph(state),
            Event::Start(Tag::CodeBlock(kind)) => {
                self.flush_paragraph(state);
                let language = match kind {
                    CodeBlockKind::Fenced(lang) if !lang.is_empty() => lang.to_string(),
                    _ => "txt".to_string(),
                };
                state.code_language = Some(language);
                state.output.push('\n');
            }
            Event::End(Tag::CodeBlock(_)) => {
                state.code_language = None;
                state.output.push_str("\x1B[0m\n");
            }
            Event::Start(Tag::Emphasis) => state.paragraph.push_str("\x1B[3m"),
            Event::End(Tag::Emphasis) => state.paragraph.push_str("\x1B[23m"),
            Event::Start(Tag::Strong) => state.paragraph.push_str("\x1B[1m"),
            Event::End(Tag::Strong) => state.paragraph.push_str("\x1B[22m"),
            Event::Code(code) => {
                state.paragraph.push('`');
                state.paragraph.push_str(&code);
                state.paragraph.push('`');
            }
            Event::Text(text) => match &state.code_language {
                Some(language) => {
                    let highlighted = SyntaxCache::global().highlight(&text, language, CODE_INDENT);
                    state.output.push_str(&highlighted);
                }
                None => state.paragraph.push_str(&text),
            },
            Event::Html(html) => state.paragraph.push_str(&html),
            Event::SoftBreak | Event::HardBreak => self.flush_paragraph(state),
            Event::Rule => {
                self.flush_paragraph(state);
                let rule = "─".repeat(self.width.saturating_sub(BODY_INDENT.len()));
                writeln!(state.output, "{}{}", BODY_INDENT, rule).unwrap();
            }
            _ => {}
        }
    }

    fn flush_paragraph(&self, state: &mut RenderState) {
        if state.paragraph.trim().is_empty() {
            state.paragraph.clear();
            return;
        }

        let depth = state.lists.len();
        let nesting = "  ".repeat(depth.saturating_sub(1));
        let (initial, subsequent) = match (depth, state.item_marker.take()) {
            (0, _) => (BODY_INDENT.to_string(), BODY_INDENT.to_string()),
            (_, Some(marker)) => (
                format!("{}{}{}", BODY_INDENT, nesting, marker),
                format!("{}{}    ", BODY_INDENT, nesting),
            ),
            (_, None) => {
                let continuation = format!("{}{}    ", BODY_INDENT, nesting);
                (continuation.clone(), continuation)
            }
        };

        let options = Options::new(self.width)
            .initial_indent(&initial)
            .subsequent_indent(&subsequent);

        for line in wrap(state.paragraph.trim(), &options) {
            writeln!(state.output, "{}", line).unwrap();
        }
        state.paragraph.clear();
    }
}

//! Per-merge renderer.
//!
//! One `Renderer` exists per top-level [`Engine::merge`](super::Engine::merge)
//! call and owns that call's [`ScopeChain`]. Block bodies and partials are
//! rendered by recursive calls on the same renderer, each with its own
//! [`Frame`] (scanner plus output buffer), so every nested render shares the
//! scope chain, the function registry and the remaining partial budget.

use stencil_lexer::{
    is_identifier, match_block, split_assignment, trim_line_end, trim_line_start, Scanner, Tag,
    TagKind, Token,
};
use stencil_stack::ensure_sufficient_stack;
use stencil_value::{
    invalid_tag, non_enumerable, partial_not_string, stack_depth_exceeded, Breadcrumb,
    MemberResolver, MergeResult, Value,
};

use crate::environment::ScopeChain;
use crate::function::FunctionRegistry;
use crate::options::MergeOptions;
use crate::resolver::BindContext;

pub(super) struct Renderer<'e> {
    scopes: ScopeChain,
    functions: &'e FunctionRegistry,
    members: &'e dyn MemberResolver,
    options: MergeOptions,
}

/// Scan state for one template being rendered.
struct Frame<'s> {
    scanner: Scanner<'s>,
    out: String,
    /// Trim the start of the next literal run.
    trim_next: bool,
    /// End of the last tag output in `out`. Left trims never cut below it.
    trim_floor: usize,
    last: Option<Breadcrumb>,
}

impl<'s> Frame<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            scanner: Scanner::new(source),
            out: String::with_capacity(source.len()),
            trim_next: false,
            trim_floor: 0,
            last: None,
        }
    }

    /// Where this frame was when it failed.
    fn breadcrumb(&self) -> Breadcrumb {
        self.last.clone().unwrap_or_else(|| Breadcrumb {
            line: self.scanner.line(),
            column: self.scanner.column(),
            offset: self.scanner.pos(),
            tag: String::new(),
        })
    }
}

impl<'e> Renderer<'e> {
    pub(super) fn new(
        functions: &'e FunctionRegistry,
        members: &'e dyn MemberResolver,
        options: MergeOptions,
    ) -> Self {
        Self {
            scopes: ScopeChain::new(),
            functions,
            members,
            options,
        }
    }

    /// Render `source` in a new frame bound to `value`.
    pub(super) fn merge(&mut self, source: &str, value: Value, depth: usize) -> MergeResult<String> {
        self.scopes.push(value);
        let result = self.render(source, depth);
        self.scopes.pop();
        result
    }

    /// Render `source` in the current frame; its declarations end with it.
    fn render_scoped(&mut self, source: &str, depth: usize) -> MergeResult<String> {
        self.scopes.mark_scope();
        let result = self.render(source, depth);
        self.scopes.unwind_to_mark();
        result
    }

    fn render(&mut self, source: &str, depth: usize) -> MergeResult<String> {
        let mut frame = Frame::new(source);
        match self.render_frame(&mut frame, depth) {
            Ok(()) => Ok(frame.out),
            Err(err) => Err(err.with_breadcrumb(frame.breadcrumb())),
        }
    }

    fn render_frame(&mut self, frame: &mut Frame<'_>, depth: usize) -> MergeResult<()> {
        let global = self.options.trim_whitespace;
        while let Some(token) = frame.scanner.next_token()? {
            let trim_start = std::mem::take(&mut frame.trim_next);
            let raw = match token {
                Token::Text(text) => {
                    let text: &str = &text;
                    frame
                        .out
                        .push_str(if trim_start { trim_line_start(text) } else { text });
                    continue;
                }
                Token::Tag(raw) => raw,
            };

            frame.last = Some(Breadcrumb {
                line: raw.line,
                column: raw.column,
                offset: raw.offset,
                tag: raw.source.to_string(),
            });
            let tag = Tag::parse(raw.text)?;
            tracing::trace!(kind = ?tag.kind(), tag = tag.raw(), "tag");

            if tag.discards_left(global) {
                let floor = frame.trim_floor;
                let keep = floor + trim_line_end(&frame.out[floor..]).len();
                frame.out.truncate(keep);
            }
            frame.trim_next = self.dispatch(frame, &tag, depth)?;
            frame.trim_floor = frame.out.len();
        }
        Ok(())
    }

    /// Handle one tag. Returns whether the content after it is trimmed.
    fn dispatch(&mut self, frame: &mut Frame<'_>, tag: &Tag, depth: usize) -> MergeResult<bool> {
        let global = self.options.trim_whitespace;
        match tag.kind() {
            TagKind::Simple => {
                let value = self.resolve(tag.bind_as())?;
                frame.out.push_str(&value.to_string());
            }
            TagKind::Comment => {}
            TagKind::If => {
                let (body, trim_after) = open_block(&mut frame.scanner, tag, global)?;
                let rendered = self.render_if(tag, body, depth)?;
                frame.out.push_str(&rendered);
                return Ok(trim_after);
            }
            TagKind::Each => {
                let (body, trim_after) = open_block(&mut frame.scanner, tag, global)?;
                let rendered = self.render_each(tag, body, depth)?;
                frame.out.push_str(&rendered);
                return Ok(trim_after);
            }
            TagKind::With => {
                let (body, trim_after) = open_block(&mut frame.scanner, tag, global)?;
                let value = self.resolve(tag.bind_as())?;
                let rendered = ensure_sufficient_stack(|| self.merge(body, value, depth))?;
                frame.out.push_str(&rendered);
                return Ok(trim_after);
            }
            TagKind::Partial => {
                let rendered = self.render_partial(tag, depth)?;
                frame.out.push_str(&rendered);
            }
            TagKind::VarDeclare => self.declare(tag, &mut frame.out)?,
            TagKind::VarAssign => self.assign(tag)?,
            TagKind::EndIf | TagKind::EndEach | TagKind::EndWith => {
                return Err(invalid_tag(tag.raw(), "end tag without an open block"));
            }
        }
        Ok(tag.discards_right(global))
    }

    fn resolve(&self, expr: &str) -> MergeResult<Value> {
        BindContext::new(
            &self.scopes,
            self.functions,
            self.members,
            self.options.members,
        )?
        .resolve(expr)
    }

    fn render_if(&mut self, tag: &Tag, body: &str, depth: usize) -> MergeResult<String> {
        let expr = tag.bind_as();
        let (negate, expr) = match expr.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, expr),
        };
        let value = self.resolve(expr)?;
        if value.is_truthy() == negate {
            return Ok(String::new());
        }
        ensure_sufficient_stack(|| self.render_scoped(body, depth))
    }

    /// One child merge per item, each in a fresh frame.
    fn render_each(&mut self, tag: &Tag, body: &str, depth: usize) -> MergeResult<String> {
        let value = self.resolve(tag.bind_as())?;
        if value.is_null() {
            return Ok(String::new());
        }
        let Some(items) = value.items() else {
            return Err(non_enumerable(tag.bind_as(), value.type_name()));
        };
        let mut out = String::new();
        for item in items {
            let rendered = ensure_sufficient_stack(|| self.merge(body, item, depth))?;
            out.push_str(&rendered);
        }
        Ok(out)
    }

    fn render_partial(&mut self, tag: &Tag, depth: usize) -> MergeResult<String> {
        let value = self.resolve(tag.bind_as())?;
        let Some(template) = value.as_str() else {
            return Err(partial_not_string(tag.raw(), value.type_name(), &value.to_string()));
        };
        let Some(remaining) = depth.checked_sub(1) else {
            return Err(stack_depth_exceeded(self.options.max_depth));
        };
        tracing::debug!(partial = tag.bind_as(), remaining, "expand partial");
        ensure_sufficient_stack(|| self.render_scoped(template, remaining))
    }

    /// `{name=expr}` declares; `{?name}` renders the variable.
    fn declare(&mut self, tag: &Tag, out: &mut String) -> MergeResult<()> {
        let bind = tag.bind_as();
        let Some((name, expr)) = split_assignment(bind) else {
            expect_identifier(tag, bind)?;
            out.push_str(&self.scopes.access(bind)?.to_string());
            return Ok(());
        };
        expect_identifier(tag, name)?;
        let value = self.resolve_assigned(tag, expr)?;
        tracing::trace!(name, "declare");
        self.scopes.declare(name, value);
        Ok(())
    }

    /// `{:name=expr}` updates the nearest declaration.
    fn assign(&mut self, tag: &Tag) -> MergeResult<()> {
        let Some((name, expr)) = split_assignment(tag.bind_as()) else {
            return Err(invalid_tag(tag.raw(), "missing `=`"));
        };
        expect_identifier(tag, name)?;
        let value = self.resolve_assigned(tag, expr)?;
        tracing::trace!(name, "update");
        self.scopes.update(name, value)
    }

    fn resolve_assigned(&self, tag: &Tag, expr: &str) -> MergeResult<Value> {
        if expr.trim().is_empty() {
            return Err(invalid_tag(tag.raw(), "missing value after `=`"));
        }
        self.resolve(expr)
    }
}

/// Match the block `open` starts and apply the trim markers that face its body.
///
/// Returns the body and whether content after the end tag is trimmed.
fn open_block<'s>(
    scanner: &mut Scanner<'s>,
    open: &Tag,
    global: bool,
) -> MergeResult<(&'s str, bool)> {
    let block = match_block(scanner, open)?;
    let mut body = block.body;
    if open.discards_right(global) {
        body = trim_line_start(body);
    }
    if block.close.discards_left(global) {
        body = trim_line_end(body);
    }
    Ok((body, block.close.discards_right(global)))
}

fn expect_identifier(tag: &Tag, name: &str) -> MergeResult<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(invalid_tag(tag.raw(), "variable name must be an identifier"))
    }
}

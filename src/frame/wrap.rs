use std::rc::Rc;

use tracing::trace;

use crate::{
    eval_origin::map_eval_origin,
    mapper::{map_source_position, SourceMapCache},
    position::Position,
};

use super::CallSite;

#[derive(Debug, Clone)]
enum Mapped {
    Position(Position),
    EvalOrigin(String),
}

/**
    A call site with its location mapped back to original sources.

    Every accessor that is not related to the mapped location
    is forwarded to the original call site, unchanged.
*/
pub struct MappedCallSite {
    inner: Rc<dyn CallSite>,
    mapped: Mapped,
}

impl MappedCallSite {
    fn position(&self) -> Option<&Position> {
        match &self.mapped {
            Mapped::Position(position) => Some(position),
            Mapped::EvalOrigin(_) => None,
        }
    }
}

impl CallSite for MappedCallSite {
    fn file_name(&self) -> Option<&str> {
        match self.position() {
            Some(position) => Some(&position.source),
            None => self.inner.file_name(),
        }
    }

    fn line_number(&self) -> Option<u32> {
        match self.position() {
            Some(position) => Some(position.line),
            None => self.inner.line_number(),
        }
    }

    fn column_number(&self) -> Option<u32> {
        match self.position() {
            Some(position) => Some(position.column),
            None => self.inner.column_number(),
        }
    }

    fn eval_origin(&self) -> Option<&str> {
        match &self.mapped {
            Mapped::EvalOrigin(origin) => Some(origin),
            Mapped::Position(_) => self.inner.eval_origin(),
        }
    }

    fn script_name_or_source_url(&self) -> Option<&str> {
        match self.position() {
            Some(position) => Some(&position.source),
            None => self.inner.script_name_or_source_url(),
        }
    }

    fn function_name(&self) -> Option<&str> {
        self.inner.function_name()
    }

    fn type_name(&self) -> Option<&str> {
        self.inner.type_name()
    }

    fn method_name(&self) -> Option<&str> {
        self.inner.method_name()
    }

    fn is_toplevel(&self) -> bool {
        self.inner.is_toplevel()
    }

    fn is_eval(&self) -> bool {
        self.inner.is_eval()
    }

    fn is_native(&self) -> bool {
        self.inner.is_native()
    }

    fn is_constructor(&self) -> bool {
        self.inner.is_constructor()
    }
}

/**
    Maps the location of a call site back to original sources.

    - Call sites with a file name (or a source url, for evaluated code) get
      their file name, line, and column replaced with the mapped position.
    - Call sites that only know where they were evaluated from get their
      eval origin mapped instead.
    - Anything else is returned as-is, without wrapping.

    Frames that can not be mapped are never an error, at
    worst the mapped call site reports the same location.
*/
pub fn wrap_call_site(cache: &mut SourceMapCache<'_>, frame: &Rc<dyn CallSite>) -> Rc<dyn CallSite> {
    // Code passed to eval and ending with a "//# sourceURL=..." comment
    // has no file name, only a script name / source url
    let source = frame
        .file_name()
        .or_else(|| frame.script_name_or_source_url())
        .filter(|source| !source.is_empty());

    if let (Some(source), Some(line)) = (source, frame.line_number()) {
        let generated = Position::new(source, line, frame.column_number().unwrap_or_default());
        let position = map_source_position(cache, &generated);
        trace!(%generated, mapped = %position, "wrapped call site");
        return Rc::new(MappedCallSite {
            inner: Rc::clone(frame),
            mapped: Mapped::Position(position),
        });
    }

    if let Some(origin) = frame.eval_origin() {
        let origin = map_eval_origin(cache, origin);
        return Rc::new(MappedCallSite {
            inner: Rc::clone(frame),
            mapped: Mapped::EvalOrigin(origin),
        });
    }

    Rc::clone(frame)
}

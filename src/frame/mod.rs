use std::fmt;

mod stack_frame;
mod wrap;


pub use self::stack_frame::{ParseFrameError, StackFrame};
pub use self::wrap::{wrap_call_site, MappedCallSite};

/**
    A single frame of a captured call stack, as exposed by a runtime.

    Only the accessors needed to locate the frame are required, the
    rest have defaults suitable for frames that don't know any better.

    Note that formatting a call site using [`fmt::Display`] goes through
    these accessors, so a wrapper that overrides some of them will also
    be rendered using the overridden values.
*/
pub trait CallSite {
    /// Name of the file the frame is executing, if any.
    fn file_name(&self) -> Option<&str>;

    /// 1-based line number, if known.
    fn line_number(&self) -> Option<u32>;

    /// Column number, if known.
    fn column_number(&self) -> Option<u32>;

    /// Description of where the frame's code was passed to `eval`, if it was.
    fn eval_origin(&self) -> Option<&str>;

    /**
        Name of the script, or the url given in a `//# sourceURL=` comment
        for code passed to `eval`. Defaults to [`CallSite::file_name`].
    */
    fn script_name_or_source_url(&self) -> Option<&str> {
        self.file_name()
    }

    fn function_name(&self) -> Option<&str> {
        None
    }

    fn type_name(&self) -> Option<&str> {
        None
    }

    fn method_name(&self) -> Option<&str> {
        None
    }

    fn is_toplevel(&self) -> bool {
        true
    }

    fn is_eval(&self) -> bool {
        self.eval_origin().is_some()
    }

    fn is_native(&self) -> bool {
        false
    }

    fn is_constructor(&self) -> bool {
        false
    }
}

fn write_location(f: &mut fmt::Formatter<'_>, site: &dyn CallSite) -> fmt::Result {
    if site.is_native() {
        return write!(f, "native");
    }

    let script_name = site.script_name_or_source_url();
    if script_name.is_none() && site.is_eval() {
        if let Some(origin) = site.eval_origin() {
            write!(f, "{origin}, ")?;
        }
    }
    write!(f, "{}", script_name.unwrap_or("<anonymous>"))?;

    if let Some(line) = site.line_number() {
        write!(f, ":{line}")?;
        if let Some(column) = site.column_number().filter(|c| *c != 0) {
            write!(f, ":{column}")?;
        }
    }
    Ok(())
}

fn has_method_alias(function_name: &str, method_name: &str) -> bool {
    // Matches V8: "Foo.bar" called as "bar" needs no alias, and
    // neither does a bare function that is named like the method
    let expected = function_name.len() as isize - method_name.len() as isize - 1;
    let found = function_name
        .find(&format!(".{method_name}"))
        .map_or(-1, |index| index as isize);
    found != expected
}

impl fmt::Display for dyn CallSite + '_ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let function_name = self.function_name().filter(|name| !name.is_empty());
        let is_constructor = self.is_constructor();
        let is_method_call = !(self.is_toplevel() || is_constructor);

        if is_method_call {
            let type_name = self.type_name();
            let method_name = self.method_name().filter(|name| !name.is_empty());
            if let Some(function_name) = function_name {
                if let Some(type_name) = type_name.filter(|t| !function_name.starts_with(t)) {
                    write!(f, "{type_name}.")?;
                }
                write!(f, "{function_name}")?;
                if let Some(method_name) =
                    method_name.filter(|m| has_method_alias(function_name, m))
                {
                    write!(f, " [as {method_name}]")?;
                }
            } else {
                if let Some(type_name) = type_name {
                    write!(f, "{type_name}.")?;
                }
                write!(f, "{}", method_name.unwrap_or("<anonymous>"))?;
            }
        } else if is_constructor {
            write!(f, "new {}", function_name.unwrap_or("<anonymous>"))?;
        } else if let Some(function_name) = function_name {
            write!(f, "{function_name}")?;
        } else {
            return write_location(f, self);
        }

        write!(f, " (")?;
        write_location(f, self)?;
        write!(f, ")")
    }
}

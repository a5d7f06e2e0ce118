use std::{fmt, rc::Rc};

use tracing::debug;

use crate::{
    frame::CallSite,
    fs::{FileSystem, OsFileSystem},
    report::{uncaught_handler, ThrownError, UncaughtHandler},
    trace::{default_stack_trace, prepare_stack_trace},
};

/**
    Formatter called whenever a runtime materializes a stack trace.
*/
pub type TraceFormatter = Box<dyn Fn(&dyn fmt::Display, &[Rc<dyn CallSite>]) -> String>;

/**
    A runtime that stack trace mapping can be installed into.

    Setting a hook replaces any previously set hook, hooks never stack.
*/
pub trait Host {
    fn set_trace_formatter(&mut self, formatter: TraceFormatter);
    fn set_uncaught_handler(&mut self, handler: UncaughtHandler);
}

/**
    Installs source-mapped stack traces into a host, reading files from disk.

    See [`install_with`] for more information.
*/
pub fn install(host: &mut dyn Host) {
    install_with(host, Rc::new(OsFileSystem));
}

/**
    Installs source-mapped stack traces into a host.

    This sets both hooks of the host:

    - The trace formatter, which maps every frame of every stack trace.
    - The uncaught-exception handler, which prints the original source line of
      the top frame along with the stack, and then exits the process.

    The trace formatter is installed first, so errors reaching the uncaught
    handler already carry a mapped stack. Installing more than once is
    harmless, the hooks from the latest call replace the earlier ones.
*/
pub fn install_with(host: &mut dyn Host, fs: Rc<dyn FileSystem>) {
    let formatter_fs = Rc::clone(&fs);
    host.set_trace_formatter(Box::new(
        move |error: &dyn fmt::Display, frames: &[Rc<dyn CallSite>]| {
            prepare_stack_trace(&*formatter_fs, error, frames)
        },
    ));
    host.set_uncaught_handler(uncaught_handler(fs));
    debug!("installed source-mapped stack traces");
}

/**
    An error captured by a [`Hooks`] host, with its stack already formatted.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedError {
    message: String,
    stack: String,
}

impl CapturedError {
    /**
        Returns the error message, without the stack.
    */
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CapturedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ThrownError for CapturedError {
    fn stack(&self) -> Option<&str> {
        Some(&self.stack)
    }
}

/**
    A minimal host, holding the hooks installed into it.

    Runtimes embedding this crate can drive it directly: capture errors
    with [`Hooks::capture`] whenever an error is thrown, and hand errors
    that escape everything to [`Hooks::handle_uncaught`].
*/
#[derive(Default)]
pub struct Hooks {
    trace_formatter: Option<TraceFormatter>,
    uncaught_handler: Option<UncaughtHandler>,
}

impl Hooks {
    /**
        Creates a new host with no hooks installed.
    */
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Returns `true` if a trace formatter has been installed.
    */
    #[must_use]
    pub fn has_trace_formatter(&self) -> bool {
        self.trace_formatter.is_some()
    }

    /**
        Returns `true` if an uncaught-exception handler has been installed.
    */
    #[must_use]
    pub fn has_uncaught_handler(&self) -> bool {
        self.uncaught_handler.is_some()
    }

    /**
        Formats a stack trace using the installed trace formatter,
        or the default unmapped format if there is none.
    */
    #[must_use]
    pub fn format_stack_trace(&self, error: &dyn fmt::Display, frames: &[Rc<dyn CallSite>]) -> String {
        match &self.trace_formatter {
            Some(formatter) => formatter(error, frames),
            None => default_stack_trace(error, frames),
        }
    }

    /**
        Captures an error being thrown from the given frames, innermost first.
    */
    #[must_use]
    pub fn capture(&self, message: impl Into<String>, frames: &[Rc<dyn CallSite>]) -> CapturedError {
        let message = message.into();
        let stack = self.format_stack_trace(&message, frames);
        CapturedError { message, stack }
    }

    /**
        Hands an error that escaped all other handling to the installed handler.

        Returns `false` if there was no handler to hand the error to.
        Note that the handler installed by [`install`] never returns.
    */
    pub fn handle_uncaught(&self, error: Option<&dyn ThrownError>) -> bool {
        match &self.uncaught_handler {
            Some(handler) => {
                handler(error);
                true
            }
            None => false,
        }
    }
}

impl Host for Hooks {
    fn set_trace_formatter(&mut self, formatter: TraceFormatter) {
        self.trace_formatter = Some(formatter);
    }

    fn set_uncaught_handler(&mut self, handler: UncaughtHandler) {
        self.uncaught_handler = Some(handler);
    }
}

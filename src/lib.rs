#![deny(clippy::all)]
#![warn(clippy::cargo, clippy::pedantic)]
#![allow(
    clippy::cargo_common_metadata,
    clippy::module_name_repetitions,
    clippy::multiple_crate_versions,
    clippy::cast_possible_wrap
)]

/*!
    Source-mapped stack traces.

    Rewrites stack traces reported by a runtime for generated code (bundled,
    minified, or transpiled) so that every frame points back at the original
    sources, using the source maps referenced by `//# sourceMappingURL=` comments.

    Runtimes install the mapping into their own hooks using [`install`], or
    embedders can call the individual pieces directly:

    - [`map_source_position`] for a single position
    - [`map_eval_origin`] for eval origin descriptions
    - [`wrap_call_site`] for a single stack frame
    - [`prepare_stack_trace`] for a whole stack trace
    - [`report_uncaught`] for errors that escaped all other handling
*/

mod eval_origin;
mod frame;
mod hooks;
mod mapper;
mod position;
mod report;
mod trace;

pub mod fs;


pub use self::eval_origin::map_eval_origin;
pub use self::frame::{wrap_call_site, CallSite, MappedCallSite, ParseFrameError, StackFrame};
pub use self::hooks::{install, install_with, CapturedError, Host, Hooks, TraceFormatter};
pub use self::mapper::{
    find_source_mapping_url, map_source_position, resolve_source_mapping_url, MapLoadError,
    SourceMapCache, SourceMapHandle, SourceMapLocation,
};
pub use self::position::{ParsePositionError, Position};
pub use self::report::{report_uncaught, uncaught_handler, ThrownError, UncaughtHandler};
pub use self::trace::{default_stack_trace, prepare_stack_trace, rewrite_stack_trace};

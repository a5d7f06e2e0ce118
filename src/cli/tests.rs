use std::{fs::read_to_string, process::ExitCode};

use console::set_colors_enabled;

use sourcetrace::fs::OsFileSystem;

use super::{
    map::write_mapped_positions, report::write_report, trace::write_rewritten_trace,
    utils::input::read_input_from,
};

const ORIGINAL: &str = "tests/fixtures/src/greet.ts";
const TRACE: &str = "tests/fixtures/trace.txt";

fn output(f: impl FnOnce(&mut Vec<u8>)) -> String {
    set_colors_enabled(false);
    let mut out = Vec::new();
    f(&mut out);
    String::from_utf8(out).unwrap()
}

fn positions(positions: &[&str]) -> Vec<String> {
    positions.iter().map(ToString::to_string).collect()
}

mod map {
    use super::*;

    #[test]
    fn prints_mapped_positions() {
        let positions = positions(&["tests/fixtures/bundle.js:3:5", "tests/fixtures/bundle.js:5:1"]);
        let out = output(|out| write_mapped_positions(&OsFileSystem, &positions, false, out).unwrap());
        assert_eq!(out, format!("{ORIGINAL}:2:4\n{ORIGINAL}:5:0\n"));
    }

    #[test]
    fn prints_json_objects() {
        let positions = positions(&["tests/fixtures/bundle.js:3:5"]);
        let out = output(|out| write_mapped_positions(&OsFileSystem, &positions, true, out).unwrap());
        assert_eq!(
            out,
            format!("{{\"source\":\"{ORIGINAL}\",\"line\":2,\"column\":4}}\n")
        );
    }

    #[test]
    fn unmapped_positions_pass_through() {
        let positions = positions(&["tests/fixtures/missing.js:1:2"]);
        let out = output(|out| write_mapped_positions(&OsFileSystem, &positions, false, out).unwrap());
        assert_eq!(out, "tests/fixtures/missing.js:1:2\n");
    }

    #[test]
    fn rejects_invalid_positions() {
        let positions = positions(&["tests/fixtures/bundle.js:3:5", "bundle.js"]);
        let mut out = Vec::new();
        let err = write_mapped_positions(&OsFileSystem, &positions, false, &mut out).unwrap_err();
        assert!(err.to_string().contains("'bundle.js'"), "{err}");
        // Positions before the invalid one are still written
        assert_eq!(String::from_utf8(out).unwrap(), format!("{ORIGINAL}:2:4\n"));
    }
}

mod trace {
    use super::*;

    #[test]
    fn rewrites_trace_file() {
        let text = read_to_string(TRACE).unwrap();
        let out = output(|out| write_rewritten_trace(&OsFileSystem, &text, out).unwrap());
        assert_eq!(
            out,
            format!(
                "Error: cannot greet world\
                \n    at greet ({ORIGINAL}:2:4)\
                \n    at {ORIGINAL}:5\
                \n    at Module._compile (node:internal/modules/cjs/loader:1105:14)\n"
            )
        );
    }
}

mod report {
    use super::*;

    #[test]
    fn reports_original_source_line() {
        let text = read_to_string(TRACE).unwrap();
        let mut code = ExitCode::SUCCESS;
        let out = output(|out| code = write_report(&OsFileSystem, &text, out).unwrap());

        let expected_header =
            format!("\n{ORIGINAL}:2\n    throw new Error(`cannot greet ${{name}}`);\n   ^\n");
        assert!(out.starts_with(&expected_header), "{out}");
        assert!(out.contains(&format!("\nError: cannot greet world\n    at greet ({ORIGINAL}:2:4)\n")));
        assert!(out.ends_with("(node:internal/modules/cjs/loader:1105:14)\n"), "{out}");
        assert_eq!(code, ExitCode::FAILURE);
    }

    #[test]
    fn trace_without_frames_has_no_header() {
        let mut code = ExitCode::SUCCESS;
        let out = output(|out| code = write_report(&OsFileSystem, "Error: oh no\n", out).unwrap());
        assert_eq!(out, "Error: oh no\n");
        assert_eq!(code, ExitCode::FAILURE);
    }
}

mod input {
    use super::*;

    #[test]
    fn reads_stdin_without_path() {
        let text = read_input_from(None, &mut "Error: from stdin".as_bytes()).unwrap();
        assert_eq!(text, "Error: from stdin");
    }

    #[test]
    fn reads_stdin_for_dash() {
        let text = read_input_from(Some("-"), &mut "Error: from stdin".as_bytes()).unwrap();
        assert_eq!(text, "Error: from stdin");
    }

    #[test]
    fn reads_files() {
        let text = read_input_from(Some(TRACE), &mut "ignored".as_bytes()).unwrap();
        assert!(text.starts_with("Error: cannot greet world\n"));
    }

    #[test]
    fn missing_files_are_errors() {
        let err = read_input_from(Some("tests/fixtures/missing.txt"), &mut "".as_bytes()).unwrap_err();
        assert!(err.to_string().contains("missing.txt"), "{err}");
    }
}

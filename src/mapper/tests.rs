use crate::fs::MemoryFileSystem;
use crate::position::Position;

use super::{map_source_position, SourceMapCache};

const GENERATED: &str = "\
function main() {
  return helper();
}
//@ sourceMappingURL=out.js.map
";

// out.js 1:0 -> src/main.ts 1:0
// out.js 2:2 -> src/main.ts 5:6
// out.js 3:4 -> src/main.ts 10:2
const MAP: &str = r#"{
    "version": 3,
    "file": "out.js",
    "sources": ["src/main.ts"],
    "names": [],
    "mappings": "AAAA;EAIM;IAKJ"
}"#;

fn project() -> MemoryFileSystem {
    MemoryFileSystem::new()
        .with_file("/app/out.js", GENERATED)
        .with_file("/app/out.js.map", MAP)
}

fn map(fs: &MemoryFileSystem, source: &str, line: u32, column: u32) -> Position {
    let mut cache = SourceMapCache::new(fs);
    map_source_position(&mut cache, &Position::new(source, line, column))
}

// Tests for resolving positions through a source map
mod mapping {
    use super::*;

    #[test]
    fn exact_token() {
        let fs = project();
        assert_eq!(
            map(&fs, "/app/out.js", 2, 2),
            Position::new("src/main.ts", 5, 6)
        );
        assert_eq!(
            map(&fs, "/app/out.js", 3, 4),
            Position::new("src/main.ts", 10, 2)
        );
    }

    #[test]
    fn closest_preceding_token() {
        let fs = project();
        assert_eq!(
            map(&fs, "/app/out.js", 2, 9),
            Position::new("src/main.ts", 5, 6)
        );
    }

    #[test]
    fn first_line() {
        let fs = project();
        assert_eq!(
            map(&fs, "/app/out.js", 1, 0),
            Position::new("src/main.ts", 1, 0)
        );
    }

    #[test]
    fn unmapped_line_passes_through() {
        let fs = project();
        let position = Position::new("/app/out.js", 4, 0);
        let mut cache = SourceMapCache::new(&fs);
        assert_eq!(map_source_position(&mut cache, &position), position);
    }

    #[test]
    fn relative_map_url() {
        let fs = MemoryFileSystem::new()
            .with_file(
                "/app/dist/out.js",
                "x();\n//@ sourceMappingURL=../maps/out.js.map\n",
            )
            .with_file("/app/maps/out.js.map", MAP);
        assert_eq!(
            map(&fs, "/app/dist/out.js", 2, 2),
            Position::new("src/main.ts", 5, 6)
        );
    }

    #[test]
    fn data_url_map() {
        let fs = MemoryFileSystem::new().with_file(
            "/app/util.js",
            "util();\n//# sourceMappingURL=data:application/json;base64,\
            eyJ2ZXJzaW9uIjozLCJzb3VyY2VzIjpbImxpYi91dGlsLnRzIl0sIm5hbWVzIjpbXSwibWFwcGluZ3MiOiJBQUFBLElBQUkifQ==\n",
        );
        assert_eq!(
            map(&fs, "/app/util.js", 1, 6),
            Position::new("lib/util.ts", 1, 4)
        );
    }
}

// Tests for positions that can not be mapped
mod pass_through {
    use super::*;

    fn assert_unchanged(fs: &MemoryFileSystem, source: &str) {
        let position = Position::new(source, 2, 2);
        let mut cache = SourceMapCache::new(fs);
        assert_eq!(map_source_position(&mut cache, &position), position);
    }

    #[test]
    fn no_directive() {
        let fs = MemoryFileSystem::new().with_file("/app/plain.js", "console.log(1);\n");
        assert_unchanged(&fs, "/app/plain.js");
    }

    #[test]
    fn missing_generated_file() {
        let fs = MemoryFileSystem::new();
        assert_unchanged(&fs, "/app/missing.js");
        assert_eq!(fs.reads(), 0);
    }

    #[test]
    fn missing_map_file() {
        let fs = MemoryFileSystem::new().with_file("/app/out.js", GENERATED);
        assert_unchanged(&fs, "/app/out.js");
    }

    #[test]
    fn corrupt_map() {
        let fs = MemoryFileSystem::new()
            .with_file("/app/out.js", GENERATED)
            .with_file("/app/out.js.map", "this is not a source map");
        assert_unchanged(&fs, "/app/out.js");
    }

    #[test]
    fn corrupt_data_url() {
        let fs = MemoryFileSystem::new().with_file(
            "/app/out.js",
            "x();\n//@ sourceMappingURL=data:application/json;base64,!!!!\n",
        );
        assert_unchanged(&fs, "/app/out.js");
    }
}

// Tests for the per-call source map cache
mod caching {
    use super::*;

    #[test]
    fn second_lookup_does_not_read() {
        let fs = project();
        let mut cache = SourceMapCache::new(&fs);

        let first = map_source_position(&mut cache, &Position::new("/app/out.js", 2, 2));
        let reads_after_first = fs.reads();
        let second = map_source_position(&mut cache, &Position::new("/app/out.js", 3, 4));

        assert_eq!(reads_after_first, 2); // Generated file + source map
        assert_eq!(fs.reads(), reads_after_first);
        assert_eq!(first.line, 5);
        assert_eq!(second.line, 10);
    }

    #[test]
    fn negative_entries_are_cached() {
        let fs = MemoryFileSystem::new().with_file("/app/plain.js", "console.log(1);\n");
        let mut cache = SourceMapCache::new(&fs);
        let position = Position::new("/app/plain.js", 1, 0);

        let _ = map_source_position(&mut cache, &position);
        let _ = map_source_position(&mut cache, &position);

        assert_eq!(fs.reads(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn corrupt_maps_are_not_reparsed() {
        let fs = MemoryFileSystem::new()
            .with_file("/app/out.js", GENERATED)
            .with_file("/app/out.js.map", "{ corrupt");
        let mut cache = SourceMapCache::new(&fs);
        let position = Position::new("/app/out.js", 2, 2);

        let _ = map_source_position(&mut cache, &position);
        let _ = map_source_position(&mut cache, &position);

        assert_eq!(fs.reads(), 2);
    }

    #[test]
    fn shared_map_file_is_read_once() {
        let fs = project().with_file("/app/copy.js", GENERATED);
        let mut cache = SourceMapCache::new(&fs);

        let a = map_source_position(&mut cache, &Position::new("/app/out.js", 2, 2));
        let b = map_source_position(&mut cache, &Position::new("/app/copy.js", 2, 2));

        assert_eq!(a, b);
        assert_eq!(fs.reads(), 3); // Two generated files, one source map
    }

    #[test]
    fn fresh_cache_sees_changes() {
        let mut fs = MemoryFileSystem::new().with_file("/app/out.js", "x();\n");
        let position = Position::new("/app/out.js", 2, 2);

        assert_eq!(map(&fs, "/app/out.js", 2, 2), position);

        fs.insert("/app/out.js", GENERATED);
        fs.insert("/app/out.js.map", MAP);
        assert_eq!(
            map(&fs, "/app/out.js", 2, 2),
            Position::new("src/main.ts", 5, 6)
        );
    }
}

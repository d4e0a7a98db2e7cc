#![cfg(not(target_os = "windows"))]

use recast_test_utils::assert_snapshot;
use recast_test_utils::dir_manifest;
use recast_test_utils::sandbox::Sandbox;

const OFFSET_TS: &str = r#"module R3.Geometry {
    import Vector = R3.Math.Vector;

    export class Offset {
        @Input()
        public width: number;

        private cache: Vector[];

        public static Zero() {
            return new Offset();
        }

        private static unit = 1;

        private get Length(): number {
            return this.cache.length;
        }
    }
}
"#;

const VECTOR_TS: &str = r#"module R3.Math {
    export class Vector {
        public isInfiniteVector(): boolean {
            return false;
        }

        public isInfiniteNumber(n: number): boolean {
            return !isFinite(n);
            return false;
        }
    }
}
"#;

#[test]
fn test_adjust_default_root() {
    let mut sb = Sandbox::new();
    sb.write("translated/R3/Geometry/Offset.ts", OFFSET_TS)
        .write("translated/R3/Math/Vector.ts", VECTOR_TS)
        .write("translated/README.md", "public notes\n");

    assert_snapshot!(sb.snapshot_run("recast", ["adjust"]), @r"
    Exit Code: 0

    --- STDOUT ---

    --- STDERR ---
    ✓ R3/Geometry/Offset.ts
    ✓ R3/Math/Vector.ts

    ✓ Adjusted 2 files in translated
    ");

    assert_eq!(
        dir_manifest(sb.root_path().join("translated")),
        r#"=== R3/Geometry/Offset.ts

    export class Offset {
        width: number;

        #cache: Vector[];

        static Zero() {
            return new Offset();
        }

        static #unit = 1;

        get #Length(): number {
            return this.cache.length;
        }
    }
=== R3/Math/Vector.ts
    export class Vector {
        isInfiniteVector(): boolean {
            return false;
        }

        isInfiniteNumber(n: number): boolean {
            return !isFinite(n);
            return false;
        }
    }
=== README.md
public notes
"#
    );
}

#[test]
fn test_adjust_explicit_root_and_extension() {
    let mut sb = Sandbox::new();
    sb.write("src/a.js", "module A {\npublic x = 1;\n}\n")
        .write("src/b.ts", "module B {\npublic y = 2;\n}\n");

    sb.run("recast", ["adjust", "src", "--ext", "js"], None)
        .expect("adjust should succeed");

    assert_eq!(sb.read("src/a.js"), "x = 1;\n");
    assert_eq!(sb.read("src/b.ts"), "module B {\npublic y = 2;\n}\n");
}

#[test]
fn test_adjust_missing_root() {
    let sb = Sandbox::new();

    assert_snapshot!(sb.snapshot_run("recast", ["adjust"]), @r"
    Exit Code: 1

    --- STDOUT ---

    --- STDERR ---
    Error: Failed to discover files in translated
      translated does not exist or is not a directory
    ");
}

#[test]
fn test_adjust_no_matching_files() {
    let mut sb = Sandbox::new();
    sb.write("translated/notes.md", "nothing here\n");

    let out = sb.snapshot_run("recast", ["adjust"]);
    assert!(out.starts_with("Exit Code: 1"), "{out}");
    assert!(out.contains("Error: No *.ts files found in translated"), "{out}");
}

#[test]
fn test_adjust_rerun_is_flagged() {
    let mut sb = Sandbox::new();
    sb.write("translated/Offset.ts", "module R3 {\nclass Offset {\n}\n}\n");

    sb.run("recast", ["adjust"], None).expect("first adjust");
    assert_eq!(sb.read("translated/Offset.ts"), "class Offset {\n}\n");

    let second = sb.snapshot_run("recast", ["adjust"]);
    assert!(second.starts_with("Exit Code: 0"), "{second}");
    assert!(
        second.contains("Offset.ts: no wrapper block found"),
        "{second}"
    );
    // Nothing left for the wrapper rules to take.
    assert_eq!(sb.read("translated/Offset.ts"), "class Offset {\n}\n");
}

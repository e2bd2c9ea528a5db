//! Virtual module synthesis.

use std::fmt;

/// Identifier user code imports to pull in every fakepoint.
pub const VIRTUAL_MODULE_ID: &str = "virtual:fakepoints";

/// Resolved form of [`VIRTUAL_MODULE_ID`]. The `\0` prefix keeps other
/// plugins from trying to read it from disk.
pub const RESOLVED_VIRTUAL_MODULE_ID: &str = "\0virtual:fakepoints";

const HEADER: &str = "// Auto-generated by fakepoints. Do not edit.";

/// Generated source of the virtual module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualModuleSource {
    /// Module text.
    pub code: String,

    /// Advisory for the caller; never part of `code`.
    pub warning: Option<EmptyResultWarning>,
}

/// Nothing was discovered, which usually means the root is wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyResultWarning {
    /// Suffix that matched nothing.
    pub file_pattern: String,
}

impl fmt::Display for EmptyResultWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "no fakepoint files matching \"{}\" were found; check that workspaceRoot points at your project",
            self.file_pattern
        )
    }
}

/// Render the module: a header, then one side-effect import per file.
///
/// `files` are root-relative with `/` separators; each import is prefixed
/// with `/` so the host resolves it from the workspace root.
pub fn synthesize(files: &[String], file_pattern: &str, debug: bool) -> VirtualModuleSource {
    let mut code = String::from(HEADER);
    code.push('\n');

    for file in files {
        code.push_str(&format!("import \"/{}\";\n", escape(file)));
    }

    if debug {
        code.push_str(&format!(
            "console.log(\"[fakepoints] imported {} fakepoint file(s)\");\n",
            files.len()
        ));
    }

    let warning = files.is_empty().then(|| EmptyResultWarning {
        file_pattern: file_pattern.to_string(),
    });

    VirtualModuleSource { code, warning }
}

fn escape(path: &str) -> String {
    path.replace('\\', "\\\\").replace('"', "\\\"")
}

//! Module specifier resolution
//!
//! Relative specifiers resolve against the importing file, bare specifiers
//! only against `baseUrl`. Packages under `node_modules` are never looked
//! up.

use super::config::CompilerOptions;
use path_clean::PathClean;
use std::path::{Path, PathBuf};

const TS_EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts"];
const JS_EXTENSIONS: &[&str] = &["js", "jsx"];

/// Lexically normalize a path, dropping `.` and folding `..`
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize_path(path: &Path) -> PathBuf {
    path.clean()
}

/// Make `path` absolute against the current directory and normalize it
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        normalize_path(path)
    } else {
        let cwd = std::env::current_dir().unwrap_or_default();
        normalize_path(&cwd.join(path))
    }
}

fn is_relative(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../") || specifier == "." || specifier == ".."
}

/// Resolve `specifier` imported from `from` to an existing file
pub fn resolve_specifier(
    from: &Path,
    specifier: &str,
    options: &CompilerOptions,
    exists: impl Fn(&Path) -> bool,
) -> Option<PathBuf> {
    let base = if is_relative(specifier) {
        from.parent()?.join(specifier)
    } else if specifier.starts_with('/') {
        PathBuf::from(specifier)
    } else {
        options.base_url.as_ref()?.join(specifier)
    };
    let base = normalize_path(&base);

    candidates(&base, options.allow_js)
        .into_iter()
        .find(|candidate| exists(candidate))
}

/// Candidate files for a base path, in lookup order
fn candidates(base: &Path, allow_js: bool) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let raw = base.to_string_lossy();

    if TS_EXTENSIONS.iter().any(|ext| raw.ends_with(&format!(".{}", ext))) {
        out.push(base.to_path_buf());
    }

    // `./button.js` written for ESM output points at `./button.ts`
    if let Some(stem) = raw.strip_suffix(".js") {
        for ext in TS_EXTENSIONS {
            out.push(PathBuf::from(format!("{}.{}", stem, ext)));
        }
    } else if let Some(stem) = raw.strip_suffix(".jsx") {
        out.push(PathBuf::from(format!("{}.tsx", stem)));
    }
    if allow_js && JS_EXTENSIONS.iter().any(|ext| raw.ends_with(&format!(".{}", ext))) {
        out.push(base.to_path_buf());
    }

    let mut extensions: Vec<&str> = TS_EXTENSIONS.to_vec();
    if allow_js {
        extensions.extend_from_slice(JS_EXTENSIONS);
    }
    for ext in &extensions {
        out.push(PathBuf::from(format!("{}.{}", raw, ext)));
    }
    for ext in &extensions {
        out.push(base.join(format!("index.{}", ext)));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn files(paths: &[&str]) -> HashSet<PathBuf> {
        paths.iter().map(PathBuf::from).collect()
    }

    fn resolve(from: &str, specifier: &str, options: &CompilerOptions, set: &HashSet<PathBuf>) -> Option<PathBuf> {
        resolve_specifier(Path::new(from), specifier, options, |p| set.contains(p))
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(
            normalize_path(Path::new("/a/b/./c/../d.ts")),
            PathBuf::from("/a/b/d.ts")
        );
    }

    #[test]
    fn test_normalize_stops_at_root() {
        assert_eq!(normalize_path(Path::new("/a/../../b.ts")), PathBuf::from("/b.ts"));
        assert_eq!(normalize_path(Path::new("../x/./y")), PathBuf::from("../x/y"));
    }

    #[test]
    fn test_parent_specifier_climbing_to_root() {
        let set = files(&["/x.ts"]);
        assert_eq!(
            resolve("/src/p.ts", "../../x", &CompilerOptions::default(), &set),
            Some(PathBuf::from("/x.ts"))
        );
    }

    #[test]
    fn test_relative_extension_lookup() {
        let set = files(&["/src/button.tsx", "/src/types.d.ts", "/src/icons/index.ts"]);
        let options = CompilerOptions::default();

        assert_eq!(
            resolve("/src/app.ts", "./button", &options, &set),
            Some(PathBuf::from("/src/button.tsx"))
        );
        assert_eq!(
            resolve("/src/app.ts", "./types", &options, &set),
            Some(PathBuf::from("/src/types.d.ts"))
        );
        assert_eq!(
            resolve("/src/app.ts", "./icons", &options, &set),
            Some(PathBuf::from("/src/icons/index.ts"))
        );
        assert_eq!(resolve("/src/app.ts", "./missing", &options, &set), None);
    }

    #[test]
    fn test_js_specifier_maps_to_ts() {
        let set = files(&["/src/kid-icon.ts"]);
        assert_eq!(
            resolve("/src/nested/../app.ts", "./kid-icon.js", &CompilerOptions::default(), &set),
            Some(PathBuf::from("/src/kid-icon.ts"))
        );
    }

    #[test]
    fn test_bare_specifier_needs_base_url() {
        let set = files(&["/project/src/shared/theme.ts"]);
        let mut options = CompilerOptions::default();
        assert_eq!(resolve("/project/src/app.ts", "shared/theme", &options, &set), None);

        options.base_url = Some(PathBuf::from("/project/src"));
        assert_eq!(
            resolve("/project/src/app.ts", "shared/theme", &options, &set),
            Some(PathBuf::from("/project/src/shared/theme.ts"))
        );
    }

    #[test]
    fn test_js_files_only_with_allow_js() {
        let set = files(&["/src/legacy.js"]);
        let mut options = CompilerOptions::default();
        assert_eq!(resolve("/src/app.ts", "./legacy", &options, &set), None);

        options.allow_js = true;
        assert_eq!(
            resolve("/src/app.ts", "./legacy", &options, &set),
            Some(PathBuf::from("/src/legacy.js"))
        );
    }
}

use std::path::{Path, PathBuf};

/// File names looked for next to (or inside) the given path.
pub const WELL_KNOWN: [&str; 2] = ["schema.json", "dmmf.json"];

/// Find a schema document for `path`: the path itself when it is a file,
/// otherwise one of the well-known names in its directory.
pub fn find_schema(path: &Path) -> Result<PathBuf, crate::Error> {
    let mut searched = Vec::new();

    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    searched.push(path.to_path_buf());

    let dir = if path.is_dir() {
        path
    } else {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };

    for name in WELL_KNOWN {
        let candidate = dir.join(name);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using schema found next to input");
            return Ok(candidate);
        }
        searched.push(candidate);
    }

    Err(crate::Error::NoSchemaFound { searched })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("prisma-uml-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_existing_file_wins() {
        let dir = scratch_dir("direct");
        let file = dir.join("custom.json");
        std::fs::write(&file, "{}").unwrap();

        assert_eq!(find_schema(&file).unwrap(), file);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_falls_back_to_well_known_name() {
        let dir = scratch_dir("fallback");
        std::fs::write(dir.join("dmmf.json"), "{}").unwrap();

        assert_eq!(find_schema(&dir.join("missing.json")).unwrap(), dir.join("dmmf.json"));
        assert_eq!(find_schema(&dir).unwrap(), dir.join("dmmf.json"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_nothing_found() {
        let dir = scratch_dir("empty");
        let err = find_schema(&dir.join("missing.json")).unwrap_err();

        match err {
            crate::Error::NoSchemaFound { searched } => {
                assert_eq!(searched.len(), 3);
                assert_eq!(searched[1], dir.join("schema.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
        let _ = std::fs::remove_dir_all(&dir);
    }
}

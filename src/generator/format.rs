use crate::error::{GenError, Result};

/// Validate rendered text as a Rust source file and pretty-print it.
///
/// Output that fails to parse is never written: it means a template or the
/// model builder produced something broken, not that the schema is unusual.
///
/// Plain `//` comments do not survive formatting; templates use doc comments.
pub fn format_source(artifact: &str, source: &str) -> Result<String> {
    let file = syn::parse_file(source).map_err(|e| GenError::Format {
        artifact: artifact.to_string(),
        message: e.to_string(),
    })?;
    Ok(prettyplease::unparse(&file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_valid_source() {
        let out = format_source("model/user.rs", "pub struct User{pub id:i32,}").unwrap();
        assert_eq!(out, "pub struct User {\n    pub id: i32,\n}\n");
    }

    #[test]
    fn test_rejects_invalid_source() {
        let err = format_source("model/user.rs", "pub struct User { id: }").unwrap_err();
        match err {
            GenError::Format { artifact, .. } => assert_eq!(artifact, "model/user.rs"),
            other => panic!("expected Format error, got {other:?}"),
        }
    }
}

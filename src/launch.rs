/// Hand-off to the operating system: web searches and local documents
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::state::settings::NAME_PLACEHOLDER;

/// Fill the search template with the URL-encoded component name
pub fn search_url(template: &str, component: &str) -> String {
    template.replace(NAME_PLACEHOLDER, &urlencoding::encode(component.trim()))
}

/// Resolve a stored path, failing if it no longer points at a file
pub fn existing_file(filepath: &str) -> Result<PathBuf, AppError> {
    let path = PathBuf::from(filepath);
    if path.exists() {
        Ok(path)
    } else {
        Err(AppError::FileNotFound(path))
    }
}

/// Open a URL in the default browser
pub fn open_url(url: &str) -> Result<(), AppError> {
    log::info!("Opening {}", url);
    open::that(url).map_err(|source| AppError::Launch {
        target: url.to_string(),
        source,
    })
}

/// Open a document with its default handler
pub fn open_file(path: &Path) -> Result<(), AppError> {
    log::info!("Opening {}", path.display());
    open::that(path).map_err(|source| AppError::Launch {
        target: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::settings::DEFAULT_SEARCH_URL;
    use tempfile::TempDir;

    #[test]
    fn test_search_url_substitutes_name() {
        assert_eq!(
            search_url(DEFAULT_SEARCH_URL, "LM317"),
            "https://www.datasheetarchive.com/LM317-datasheet.html"
        );
    }

    #[test]
    fn test_search_url_encodes_name() {
        assert_eq!(
            search_url("https://example.com/?q={name}", " 74HC595 N/A "),
            "https://example.com/?q=74HC595%20N%2FA"
        );
    }

    #[test]
    fn test_existing_file() {
        let dir = TempDir::new().unwrap();
        let pdf = dir.path().join("lm317.pdf");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();

        assert_eq!(existing_file(pdf.to_str().unwrap()).unwrap(), pdf);

        let missing = dir.path().join("gone.pdf");
        let err = existing_file(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::FileNotFound(p) if p == missing));
    }
}

//! # Naming — On-Disk Package Filename Convention
//!
//! A persisted package archive or document is named
//! `{packageName with '/' replaced by '_'}_{version}_{mediaType}`, plus an
//! extension chosen by the writer (`.yaml` for documents, `.tar.gz` for
//! archives).

/// Build the base filename for a package's on-disk artifacts.
pub fn package_filename(name: &str, version: &str, media_type: &str) -> String {
    format!("{}_{version}_{media_type}", name.replace('/', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_name() {
        assert_eq!(package_filename("cookieapp", "0.4.5", "helm"), "cookieapp_0.4.5_helm");
    }

    #[test]
    fn test_slashes_become_underscores() {
        assert_eq!(
            package_filename("quay.io/ant31/cookieapp", "1.0.0", "helm"),
            "quay.io_ant31_cookieapp_1.0.0_helm"
        );
    }
}

//! 密钥加载
//! 优先使用环境变量，其次 secrets.toml

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::core::error::SecretsError;
use crate::core::models::{CredentialSource, Credentials};

pub const EMAIL_ENV: &str = "STORAGE_EMAIL";
pub const PASSWORD_ENV: &str = "STORAGE_PASSWORD";
const SECRETS_FILE_NAME: &str = "secrets.toml";
const APP_DIR_NAME: &str = "cloud-cad-viewer";

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    storage_email: Option<String>,
    storage_password: Option<String>,
}

/// 密钥存储服务
pub struct SecretsStorage;

impl SecretsStorage {
    /// 启动用: 加载失败不终止进程，记录错误并在交互时显示
    pub fn resolve(explicit: Option<&Path>) -> CredentialSource {
        Self::resolve_with(explicit, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(explicit: Option<&Path>, env: F) -> CredentialSource
    where
        F: Fn(&str) -> Option<String>,
    {
        match Self::load_with(explicit, env) {
            Ok(credentials) => credentials.into(),
            Err(e) => {
                tracing::error!("{}", e);
                CredentialSource::Invalid(e.to_string())
            }
        }
    }

    /// 加载凭据; 任一项缺失时返回 `Ok(None)`
    pub fn load_with<F>(explicit: Option<&Path>, env: F) -> Result<Option<Credentials>, SecretsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = match Self::locate(explicit) {
            Some(path) => {
                tracing::info!("Reading storage secrets from {:?}", path);
                Self::read_file(&path)?
            }
            None => SecretsFile::default(),
        };

        let email = non_empty(env(EMAIL_ENV)).or_else(|| non_empty(file.storage_email));
        let password = non_empty(env(PASSWORD_ENV)).or_else(|| non_empty(file.storage_password));

        match (email, password) {
            (Some(email), Some(password)) => Ok(Some(Credentials::new(email, password))),
            (email, password) => {
                tracing::warn!(
                    "Storage secrets incomplete (email: {}, password: {})",
                    if email.is_some() { "set" } else { "missing" },
                    if password.is_some() { "set" } else { "missing" },
                );
                Ok(None)
            }
        }
    }

    /// 查找顺序: 显式路径 → ./secrets.toml → <config_dir>/cloud-cad-viewer/secrets.toml
    fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            if path.exists() {
                return Some(path.to_path_buf());
            }
            tracing::warn!("Secrets file {:?} does not exist", path);
            return None;
        }

        let local = PathBuf::from(SECRETS_FILE_NAME);
        if local.exists() {
            return Some(local);
        }

        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR_NAME).join(SECRETS_FILE_NAME))
            .filter(|path| path.exists())
    }

    fn read_file(path: &Path) -> Result<SecretsFile, SecretsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SecretsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| SecretsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn reads_both_keys_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_email = \"a@b.c\"\nstorage_password = \"pw\"").unwrap();

        let creds = SecretsStorage::load_with(Some(file.path()), no_env)
            .unwrap()
            .unwrap();
        assert_eq!(creds, Credentials::new("a@b.c", "pw"));
    }

    #[test]
    fn environment_overrides_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_email = \"file@b.c\"\nstorage_password = \"pw\"").unwrap();

        let creds = SecretsStorage::load_with(Some(file.path()), |key| {
            (key == EMAIL_ENV).then(|| "env@b.c".to_string())
        })
        .unwrap()
        .unwrap();
        assert_eq!(creds.email, "env@b.c");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn missing_password_yields_none() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_email = \"a@b.c\"\nstorage_password = \"  \"").unwrap();

        let creds = SecretsStorage::load_with(Some(file.path()), no_env).unwrap();
        assert!(creds.is_none());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_email = ").unwrap();

        let result = SecretsStorage::load_with(Some(file.path()), no_env);
        assert!(matches!(result, Err(SecretsError::Parse { .. })));
    }

    #[test]
    fn malformed_file_resolves_to_invalid_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_email = ").unwrap();

        match SecretsStorage::resolve_with(Some(file.path()), no_env) {
            CredentialSource::Invalid(message) => {
                assert!(message.starts_with("failed to parse secrets file"));
            }
            other => panic!("unexpected source {:?}", other),
        }
    }

    #[test]
    fn resolve_reports_missing_and_loaded() {
        assert_eq!(
            SecretsStorage::resolve_with(Some(Path::new("/nonexistent/secrets.toml")), no_env),
            CredentialSource::Missing
        );

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "storage_email = \"a@b.c\"\nstorage_password = \"pw\"").unwrap();
        assert_eq!(
            SecretsStorage::resolve_with(Some(file.path()), no_env),
            CredentialSource::Loaded(Credentials::new("a@b.c", "pw"))
        );
    }

    #[test]
    fn missing_explicit_file_falls_back_to_env() {
        let creds = SecretsStorage::load_with(Some(Path::new("/nonexistent/secrets.toml")), |key| {
            match key {
                EMAIL_ENV => Some("e@x.y".to_string()),
                PASSWORD_ENV => Some("p".to_string()),
                _ => None,
            }
        })
        .unwrap();
        assert_eq!(creds, Some(Credentials::new("e@x.y", "p")));
    }
}

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// JWT persisted between CLI invocations.
pub struct TokenManager {
    token_path: PathBuf,
}

impl TokenManager {
    pub fn new(custom_path: Option<PathBuf>) -> Result<Self> {
        let token_path = match custom_path {
            Some(path) => path,
            None => {
                let home = dirs::home_dir().context("Failed to get home directory")?;
                home.join(".forum_token")
            }
        };

        Ok(Self { token_path })
    }

    pub fn path(&self) -> &Path {
        &self.token_path
    }

    pub fn save_token(&self, token: &str) -> Result<()> {
        fs::write(&self.token_path, token)
            .with_context(|| format!("Failed to save token to {:?}", self.token_path))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.token_path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.token_path, perms)?;
        }

        tracing::debug!("Token saved to {:?}", self.token_path);
        Ok(())
    }

    pub fn load_token(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.token_path) {
            Ok(token) => {
                let token = token.trim().to_string();
                if token.is_empty() {
                    Ok(None)
                } else {
                    tracing::debug!("Token loaded from {:?}", self.token_path);
                    Ok(Some(token))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Failed to read token file"),
        }
    }

    pub fn clear_token(&self) -> Result<bool> {
        if !self.token_path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.token_path)
            .with_context(|| format!("Failed to remove token file {:?}", self.token_path))?;
        Ok(true)
    }
}

/// First characters of a token, safe for short or multi-byte input.
pub fn preview(token: &str) -> String {
    let head: String = token.chars().take(20).collect();
    if head.len() < token.len() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_load_clear() {
        let dir = tempfile::tempdir().unwrap();
        let manager = TokenManager::new(Some(dir.path().join("token"))).unwrap();

        assert_eq!(manager.load_token().unwrap(), None);
        manager.save_token("jwt-abc\n").unwrap();
        assert_eq!(manager.load_token().unwrap().as_deref(), Some("jwt-abc"));
        assert!(manager.clear_token().unwrap());
        assert!(!manager.clear_token().unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn token_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let manager = TokenManager::new(Some(dir.path().join("token"))).unwrap();

        manager.save_token("jwt").unwrap();

        let mode = fs::metadata(manager.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn preview_handles_short_tokens() {
        assert_eq!(preview("abc"), "abc");
        assert_eq!(preview(&"x".repeat(30)), format!("{}...", "x".repeat(20)));
    }
}

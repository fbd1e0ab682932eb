pub mod password;
pub mod token;

use anyhow::Result;
use std::path::Path;
use uuid::Uuid;

/// Return the token-signing secret for this server instance.
///
/// On first call, generates a random 32-character hex secret and writes it to
/// `{data_dir}/token_secret` with user-only read/write permissions (mode 0600
/// on Unix). On subsequent calls, reads and returns the existing secret.
///
/// The secret file must be kept private — anyone holding it can mint valid
/// auth tokens for any account.
pub fn get_or_create_secret(data_dir: &Path) -> Result<String> {
    let path = data_dir.join("token_secret");

    if path.exists() {
        let secret = std::fs::read_to_string(&path)?.trim().to_string();
        if !secret.is_empty() {
            return Ok(secret);
        }
    }

    // UUID v4, hex without dashes = 32 chars / 128 bits of randomness.
    let secret = Uuid::new_v4().to_string().replace('-', "");

    std::fs::create_dir_all(data_dir)?;
    std::fs::write(&path, &secret)?;

    // Restrict to owner read/write only on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_is_created_once_and_reused() {
        let dir = tempfile::tempdir().unwrap();
        let first = get_or_create_secret(dir.path()).unwrap();
        let second = get_or_create_secret(dir.path()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 32);
    }

    #[cfg(unix)]
    #[test]
    fn secret_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        get_or_create_secret(dir.path()).unwrap();
        let mode = std::fs::metadata(dir.path().join("token_secret"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

//! Session persistence (`session.json` in the data directory).

use std::path::Path;

use comptes_core::fs::{read_optional, write_atomic};
use comptes_core::Session;

use crate::constants::SESSION_FILE;

/// Load the session, treating a missing or empty file as a fresh one.
pub fn load_session(data_dir: &Path) -> anyhow::Result<Session> {
    let path = data_dir.join(SESSION_FILE);
    let bytes = read_optional(&path)
        .map_err(|e| anyhow::anyhow!("Failed to read session {}: {}", path.display(), e))?;
    match bytes {
        Some(bytes) if !bytes.iter().all(u8::is_ascii_whitespace) => serde_json::from_slice(&bytes)
            .map_err(|e| anyhow::anyhow!("Failed to parse session {}: {}", path.display(), e)),
        _ => Ok(Session::default()),
    }
}

pub fn save_session(data_dir: &Path, session: &Session) -> anyhow::Result<()> {
    let path = data_dir.join(SESSION_FILE);
    std::fs::create_dir_all(data_dir).map_err(|e| {
        anyhow::anyhow!("Failed to create data directory {}: {}", data_dir.display(), e)
    })?;
    let contents = serde_json::to_vec_pretty(session)?;
    write_atomic(&path, &contents)
        .map_err(|e| anyhow::anyhow!("Failed to write session {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_session_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_session(dir.path()).unwrap(), Session::default());
    }

    #[test]
    fn test_session_survives_save() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = Session::default();
        session.begin("batch-1");
        session.defaults.account = Some("BANQUE".into());
        save_session(dir.path(), &session).unwrap();

        assert_eq!(load_session(dir.path()).unwrap(), session);
    }
}
